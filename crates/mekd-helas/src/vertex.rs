//! Three-point vertices in completing and propagating form.
//!
//! A vertex is a list of `(structure, coupling)` terms of one family. The
//! kinematic building blocks (fermion currents, vector-pair invariants) are
//! evaluated once per call and the terms are combined linearly, so a
//! multi-term vertex equals the sum of its single-term vertices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::lorentz::{
    ChiralCurrent, ChiralDensity, FfsStructure, FfvStructure, VectorPairInvariants, VvsStructure,
};
use crate::propagator::Propagator;
use crate::wavefunction::{FermionLine, FermionWf, ScalarWf, VectorWf};
use crate::C64;

const I: C64 = Complex64::new(0.0, 1.0);

/// One interaction term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term<S> {
    /// Lorentz structure.
    pub structure: S,
    /// Complex coupling constant, serialized as `[re, im]`.
    pub coupling: C64,
}

impl<S> Term<S> {
    /// Creates a term.
    pub const fn new(structure: S, coupling: C64) -> Self {
        Self {
            structure,
            coupling,
        }
    }

    /// Term with a real coupling.
    pub const fn real(structure: S, coupling: f64) -> Self {
        Self::new(structure, Complex64::new(coupling, 0.0))
    }
}

/// Linear combination of terms of one vertex family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexTerms<S> {
    terms: Vec<Term<S>>,
}

/// Fermion–fermion–vector vertex.
pub type FfvVertex = VertexTerms<FfvStructure>;
/// Fermion–fermion–scalar vertex.
pub type FfsVertex = VertexTerms<FfsStructure>;
/// Vector–vector–scalar vertex.
pub type VvsVertex = VertexTerms<VvsStructure>;

impl<S: Copy> VertexTerms<S> {
    /// Creates a vertex from its terms.
    pub fn new(terms: Vec<Term<S>>) -> Self {
        Self { terms }
    }

    /// Single-term vertex.
    pub fn single(structure: S, coupling: C64) -> Self {
        Self::new(vec![Term::new(structure, coupling)])
    }

    /// Terms of the vertex.
    pub fn terms(&self) -> &[Term<S>] {
        &self.terms
    }

    /// Whether the vertex has no terms (and therefore vanishes).
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Splits the vertex into its single-term vertices.
    pub fn split(&self) -> Vec<Self> {
        self.terms.iter().map(|t| Self::new(vec![*t])).collect()
    }

    fn combine<T, F>(&self, mut project: F) -> T
    where
        T: Default + std::ops::AddAssign<T>,
        F: FnMut(S, C64) -> T,
    {
        let mut acc = T::default();
        for term in &self.terms {
            acc += project(term.structure, term.coupling);
        }
        acc
    }
}

/// Capability set shared by every vertex family.
pub trait Vertex {
    /// First attached wavefunction.
    type Left;
    /// Second attached wavefunction.
    type Right;
    /// Wavefunction of the third leg.
    type Third;

    /// Closed amplitude with all three legs external or already propagated.
    fn amplitude(&self, left: &Self::Left, right: &Self::Right, third: &Self::Third) -> C64;

    /// Off-shell wavefunction of the third leg, including its propagator.
    fn propagate(
        &self,
        left: &Self::Left,
        right: &Self::Right,
        propagator: &Propagator,
    ) -> Self::Third;
}

#[derive(Default)]
struct Current([C64; 4]);

impl std::ops::AddAssign for Current {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl FfvVertex {
    fn weighted_current(&self, bra: &FermionWf, ket: &FermionWf) -> [C64; 4] {
        debug_assert_eq!(bra.line, FermionLine::Bra);
        debug_assert_eq!(ket.line, FermionLine::Ket);
        let chiral = ChiralCurrent::new(bra, ket);
        self.combine(|structure, coupling| {
            Current(chiral.project(structure).map(|c| c * coupling))
        })
        .0
    }
}

impl Vertex for FfvVertex {
    type Left = FermionWf;
    type Right = FermionWf;
    type Third = VectorWf;

    fn amplitude(&self, bra: &FermionWf, ket: &FermionWf, vector: &VectorWf) -> C64 {
        let j = self.weighted_current(bra, ket);
        let contraction: C64 = j.iter().zip(vector.pol.iter()).map(|(a, b)| a * b).sum();
        -I * contraction
    }

    fn propagate(&self, bra: &FermionWf, ket: &FermionWf, propagator: &Propagator) -> VectorWf {
        let j = self.weighted_current(bra, ket);
        let flow = bra.flow + ket.flow;
        let p = (-flow).to_array();
        let p2 = flow.mass_squared();
        let p_dot_j: C64 = j.iter().zip(p.iter()).map(|(a, b)| a * b).sum();
        let gauge = p_dot_j * propagator.inverse_mass_squared();
        let scale = propagator.divide(-I, p2);
        let upper = [j[0], -j[1], -j[2], -j[3]];
        let mut pol = [C64::default(); 4];
        for mu in 0..4 {
            pol[mu] = scale * (upper[mu] - gauge * p[mu]);
        }
        VectorWf { pol, flow }
    }
}

impl FfsVertex {
    fn weighted_density(&self, bra: &FermionWf, ket: &FermionWf) -> C64 {
        debug_assert_eq!(bra.line, FermionLine::Bra);
        debug_assert_eq!(ket.line, FermionLine::Ket);
        let chiral = ChiralDensity::new(bra, ket);
        self.combine(|structure, coupling| chiral.project(structure) * coupling)
    }
}

impl Vertex for FfsVertex {
    type Left = FermionWf;
    type Right = FermionWf;
    type Third = ScalarWf;

    fn amplitude(&self, bra: &FermionWf, ket: &FermionWf, scalar: &ScalarWf) -> C64 {
        -I * self.weighted_density(bra, ket) * scalar.amp
    }

    fn propagate(&self, bra: &FermionWf, ket: &FermionWf, propagator: &Propagator) -> ScalarWf {
        let flow = bra.flow + ket.flow;
        let amp = propagator.divide(I * self.weighted_density(bra, ket), flow.mass_squared());
        ScalarWf { amp, flow }
    }
}

impl VvsVertex {
    fn weighted_contraction(&self, v1: &VectorWf, v2: &VectorWf) -> C64 {
        let invariants = VectorPairInvariants::new(v1, v2);
        self.combine(|structure, coupling| invariants.project(structure) * coupling)
    }
}

impl Vertex for VvsVertex {
    type Left = VectorWf;
    type Right = VectorWf;
    type Third = ScalarWf;

    fn amplitude(&self, v1: &VectorWf, v2: &VectorWf, scalar: &ScalarWf) -> C64 {
        -I * self.weighted_contraction(v1, v2) * scalar.amp
    }

    fn propagate(&self, v1: &VectorWf, v2: &VectorWf, propagator: &Propagator) -> ScalarWf {
        let flow = v1.flow + v2.flow;
        let amp = propagator.divide(I * self.weighted_contraction(v1, v2), flow.mass_squared());
        ScalarWf { amp, flow }
    }
}
