//! Lorentz structures of the three vertex families and their shared
//! kinematic building blocks.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::wavefunction::{FermionWf, VectorWf};
use crate::C64;

const I: C64 = Complex64::new(0.0, 1.0);

/// Fermion–fermion–vector structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FfvStructure {
    /// `γ^μ`
    Vector,
    /// `γ^μ P_L`
    Left,
    /// `γ^μ P_R`
    Right,
    /// `γ^μ γ5`
    Axial,
}

/// Fermion–fermion–scalar structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FfsStructure {
    /// `1`
    Scalar,
    /// `γ5`
    Pseudoscalar,
    /// `P_L`
    Left,
    /// `P_R`
    Right,
}

/// Vector–vector–scalar structures; `p1`, `p2` are the vector momenta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VvsStructure {
    /// `g^{μν}`
    Metric,
    /// `(p1·p2) g^{μν} - p2^μ p1^ν`
    FieldStrength,
    /// `ε^{μνρσ} p1_ρ p2_σ`
    DualFieldStrength,
    /// `p2^μ p1^ν`
    MomentumCross,
    /// `(p1·p2) g^{μν}`
    MomentumDot,
}

/// Chirality-split vector current `ψ̄ γ^μ P_{L,R} ψ`, stored with lower indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiralCurrent {
    /// `ψ̄ γ_μ P_L ψ`
    pub left: [C64; 4],
    /// `ψ̄ γ_μ P_R ψ`
    pub right: [C64; 4],
}

impl ChiralCurrent {
    /// Evaluates both chiral currents for a bra/ket pair.
    pub fn new(bra: &FermionWf, ket: &FermionWf) -> Self {
        let b = &bra.spinor;
        let k = &ket.spinor;
        let left = [
            b[2] * k[0] + b[3] * k[1],
            b[2] * k[1] + b[3] * k[0],
            I * (b[3] * k[0] - b[2] * k[1]),
            b[2] * k[0] - b[3] * k[1],
        ];
        let right = [
            b[0] * k[2] + b[1] * k[3],
            -(b[0] * k[3]) - b[1] * k[2],
            I * (b[0] * k[3] - b[1] * k[2]),
            b[1] * k[3] - b[0] * k[2],
        ];
        Self { left, right }
    }

    /// Current of one structure.
    pub fn project(&self, structure: FfvStructure) -> [C64; 4] {
        let mut out = [C64::default(); 4];
        for mu in 0..4 {
            out[mu] = match structure {
                FfvStructure::Vector => self.left[mu] + self.right[mu],
                FfvStructure::Left => self.left[mu],
                FfvStructure::Right => self.right[mu],
                FfvStructure::Axial => self.right[mu] - self.left[mu],
            };
        }
        out
    }
}

/// Chirality-split scalar bilinear `ψ̄ P_{L,R} ψ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiralDensity {
    /// `ψ̄ P_L ψ`
    pub left: C64,
    /// `ψ̄ P_R ψ`
    pub right: C64,
}

impl ChiralDensity {
    /// Evaluates both chiral densities for a bra/ket pair.
    pub fn new(bra: &FermionWf, ket: &FermionWf) -> Self {
        let b = &bra.spinor;
        let k = &ket.spinor;
        Self {
            left: b[0] * k[0] + b[1] * k[1],
            right: b[2] * k[2] + b[3] * k[3],
        }
    }

    /// Density of one structure.
    pub fn project(&self, structure: FfsStructure) -> C64 {
        match structure {
            FfsStructure::Scalar => self.left + self.right,
            FfsStructure::Pseudoscalar => self.right - self.left,
            FfsStructure::Left => self.left,
            FfsStructure::Right => self.right,
        }
    }
}

/// Invariants of a vector pair shared by every VVS structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorPairInvariants {
    /// `ε1·ε2`
    pub pol_dot: C64,
    /// `p1·p2`
    pub mom_dot: f64,
    /// `(p1·ε2)(p2·ε1)`
    pub cross: C64,
    /// `ε_{μνρσ} ε1^μ ε2^ν p1^ρ p2^σ`
    pub dual: C64,
}

impl VectorPairInvariants {
    /// Evaluates the invariants; momenta are taken from the flow tags.
    pub fn new(v1: &VectorWf, v2: &VectorWf) -> Self {
        let p1 = v1.flow.to_array().map(|x| Complex64::new(x, 0.0));
        let p2 = v2.flow.to_array().map(|x| Complex64::new(x, 0.0));
        Self {
            pol_dot: minkowski(&v1.pol, &v2.pol),
            mom_dot: v1.flow.dot(&v2.flow),
            cross: minkowski(&p1, &v2.pol) * minkowski(&p2, &v1.pol),
            dual: levi_civita(&v1.pol, &v2.pol, &p1, &p2),
        }
    }

    /// Contraction for one structure.
    pub fn project(&self, structure: VvsStructure) -> C64 {
        match structure {
            VvsStructure::Metric => self.pol_dot,
            VvsStructure::FieldStrength => self.pol_dot * self.mom_dot - self.cross,
            VvsStructure::DualFieldStrength => self.dual,
            VvsStructure::MomentumCross => self.cross,
            VvsStructure::MomentumDot => self.pol_dot * self.mom_dot,
        }
    }
}

/// Minkowski product of two contravariant complex vectors.
pub fn minkowski(a: &[C64; 4], b: &[C64; 4]) -> C64 {
    a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3]
}

/// Full contraction with the Levi-Civita symbol, `ε_{0123} = +1`.
pub fn levi_civita(a: &[C64; 4], b: &[C64; 4], c: &[C64; 4], d: &[C64; 4]) -> C64 {
    // Expand along `a`; each minor is a 3x3 determinant of (b, c, d).
    let minor = |i: usize, j: usize, k: usize| {
        b[i] * (c[j] * d[k] - c[k] * d[j]) - b[j] * (c[i] * d[k] - c[k] * d[i])
            + b[k] * (c[i] * d[j] - c[j] * d[i])
    };
    a[0] * minor(1, 2, 3) - a[1] * minor(0, 2, 3) + a[2] * minor(0, 1, 3) - a[3] * minor(0, 1, 2)
}
