use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::C64;

/// Mass and width of an internal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propagator {
    /// Pole mass.
    pub mass: f64,
    /// Total width; zero only for lines that can never go on shell.
    #[serde(default)]
    pub width: f64,
}

impl Propagator {
    /// Creates a propagator description.
    pub const fn new(mass: f64, width: f64) -> Self {
        Self { mass, width }
    }

    /// Breit-Wigner denominator `p² - M² + i M Γ`.
    pub fn denominator(&self, p2: f64) -> C64 {
        Complex64::new(p2 - self.mass * self.mass, self.mass * self.width)
    }

    /// `numerator / (p² - M² + i M Γ)`.
    ///
    /// A zero-width line exactly on its pole has no regulator; the result is
    /// then non-finite and is left for the caller to filter.
    pub fn divide(&self, numerator: C64, p2: f64) -> C64 {
        let denom = self.denominator(p2);
        if denom.norm_sqr() == 0.0 {
            debug!(mass = self.mass, p2, "unregulated on-shell propagator");
        }
        numerator / denom
    }

    /// `1/M²` for massive lines, zero for massless ones (drops the gauge term).
    pub fn inverse_mass_squared(&self) -> f64 {
        if self.mass == 0.0 {
            0.0
        } else {
            1.0 / (self.mass * self.mass)
        }
    }
}
