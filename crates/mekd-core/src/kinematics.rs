//! Relativistic four-momenta and Lorentz transformations.
//!
//! Components are ordered `(e, px, py, pz)` and the metric is `(+, -, -, -)`.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use nalgebra::{Matrix3, Matrix4, Rotation3, Unit, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MekdError};

/// Relativistic four-momentum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Energy component.
    pub e: f64,
    /// Momentum along x.
    pub px: f64,
    /// Momentum along y.
    pub py: f64,
    /// Momentum along z (beam axis).
    pub pz: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its components.
    pub const fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { e, px, py, pz }
    }

    /// Four-momentum of a particle of the given mass at rest.
    pub const fn at_rest(mass: f64) -> Self {
        Self::new(mass, 0.0, 0.0, 0.0)
    }

    /// On-shell four-momentum for the given mass and three-momentum.
    pub fn on_shell(mass: f64, px: f64, py: f64, pz: f64) -> Self {
        let e = (mass * mass + px * px + py * py + pz * pz).sqrt();
        Self::new(e, px, py, pz)
    }

    /// Builds a four-momentum from `[e, px, py, pz]`.
    pub const fn from_array(p: [f64; 4]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    /// Returns `[e, px, py, pz]`.
    pub const fn to_array(self) -> [f64; 4] {
        [self.e, self.px, self.py, self.pz]
    }

    /// Minkowski product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.e * other.e - self.px * other.px - self.py * other.py - self.pz * other.pz
    }

    /// Invariant mass squared.
    pub fn mass_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant mass; negative for space-like vectors.
    pub fn mass(&self) -> f64 {
        let m2 = self.mass_squared();
        m2.abs().sqrt().copysign(m2)
    }

    /// Squared transverse momentum.
    pub fn pt_squared(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.pt_squared().sqrt()
    }

    /// Squared magnitude of the three-momentum.
    pub fn p_abs_squared(&self) -> f64 {
        self.pt_squared() + self.pz * self.pz
    }

    /// Magnitude of the three-momentum.
    pub fn p_abs(&self) -> f64 {
        self.p_abs_squared().sqrt()
    }

    /// Cosine of the polar angle with respect to the beam axis.
    pub fn cos_theta(&self) -> f64 {
        let p = self.p_abs();
        if p == 0.0 {
            1.0
        } else {
            self.pz / p
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.e.is_finite() && self.px.is_finite() && self.py.is_finite() && self.pz.is_finite()
    }

    /// Parity image `(e, -p)`.
    pub fn spatial_reflection(&self) -> Self {
        Self::new(self.e, -self.px, -self.py, -self.pz)
    }

    /// Applies a Lorentz transformation.
    pub fn apply(&self, transform: &LorentzTransform) -> Self {
        let v = transform.matrix * Vector4::new(self.e, self.px, self.py, self.pz);
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// Velocity `p/e` of the frame in which this momentum is at rest.
    pub fn velocity(&self) -> [f64; 3] {
        [self.px / self.e, self.py / self.e, self.pz / self.e]
    }

    /// Largest absolute difference between components.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        let a = self.to_array();
        let b = other.to_array();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.e + rhs.e,
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
        )
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FourMomentum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.e - rhs.e,
            self.px - rhs.px,
            self.py - rhs.py,
            self.pz - rhs.pz,
        )
    }
}

impl Neg for FourMomentum {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.e, -self.px, -self.py, -self.pz)
    }
}

impl Mul<f64> for FourMomentum {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.e * rhs, self.px * rhs, self.py * rhs, self.pz * rhs)
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, p| acc + p)
    }
}

/// Proper orthochronous Lorentz transformation acting on `(e, px, py, pz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorentzTransform {
    matrix: Matrix4<f64>,
}

impl Default for LorentzTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl LorentzTransform {
    /// The identity transformation.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Pure boost with velocity `beta`; a particle at rest acquires velocity `beta`.
    pub fn boost(beta: [f64; 3]) -> Result<Self, MekdError> {
        let b = Vector3::new(beta[0], beta[1], beta[2]);
        let b2 = b.norm_squared();
        if !b2.is_finite() || b2 >= 1.0 {
            return Err(MekdError::Kinematics(
                ErrorInfo::new("superluminal-boost", "boost velocity must satisfy |beta| < 1")
                    .with_context("beta2", b2.to_string()),
            ));
        }
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let mut matrix = Matrix4::identity();
        matrix[(0, 0)] = gamma;
        for i in 0..3 {
            matrix[(0, i + 1)] = gamma * b[i];
            matrix[(i + 1, 0)] = gamma * b[i];
            if b2 > 0.0 {
                for j in 0..3 {
                    matrix[(i + 1, j + 1)] += (gamma - 1.0) * b[i] * b[j] / b2;
                }
            }
        }
        Ok(Self { matrix })
    }

    /// Boost into the rest frame of `p` (which must be time-like).
    pub fn to_rest_frame(p: &FourMomentum) -> Result<Self, MekdError> {
        let v = p.velocity();
        Self::boost([-v[0], -v[1], -v[2]])
    }

    /// Rotation by `angle` about `axis`.
    pub fn rotation(axis: [f64; 3], angle: f64) -> Self {
        let axis = Unit::new_normalize(Vector3::new(axis[0], axis[1], axis[2]));
        Self::from_spatial(*Rotation3::from_axis_angle(&axis, angle).matrix())
    }

    /// Rotation about the x axis.
    pub fn rotation_x(angle: f64) -> Self {
        Self::rotation([1.0, 0.0, 0.0], angle)
    }

    /// Rotation about the y axis.
    pub fn rotation_y(angle: f64) -> Self {
        Self::rotation([0.0, 1.0, 0.0], angle)
    }

    /// Rotation about the z axis.
    pub fn rotation_z(angle: f64) -> Self {
        Self::rotation([0.0, 0.0, 1.0], angle)
    }

    fn from_spatial(rot: Matrix3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(1, 1).copy_from(&rot);
        Self { matrix }
    }

    /// Composition: applies `self` first, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }
}
