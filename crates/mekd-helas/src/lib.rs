#![deny(missing_docs)]
#![doc = "Helicity-amplitude building blocks: external wavefunctions, Lorentz structures, propagators and three-point vertices."]

pub mod lorentz;
/// Breit-Wigner propagators for internal lines.
pub mod propagator;
pub mod vertex;
pub mod wavefunction;

/// Complex scalar used throughout the amplitude algebra.
pub type C64 = num_complex::Complex64;

pub use lorentz::{FfsStructure, FfvStructure, VvsStructure};
pub use propagator::Propagator;
pub use vertex::{FfsVertex, FfvVertex, Term, Vertex, VertexTerms, VvsVertex};
pub use wavefunction::{FermionLine, FermionWf, ScalarWf, VectorWf, Wavefunction};
