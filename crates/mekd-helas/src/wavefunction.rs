//! External wavefunctions for scalars, Dirac fermions and vector bosons.
//!
//! Spinors use the chiral representation with `γ5 = diag(-1, -1, 1, 1)`, so
//! components `0..2` are left-handed and `2..4` right-handed. Every
//! wavefunction carries a momentum `flow`: the momentum its line carries away
//! from the vertex it attaches to. Flows of all lines meeting at a vertex sum
//! to zero.

use mekd_core::{Direction, External, FourMomentum, Spin};
use num_complex::Complex64;
use tracing::debug;

use crate::C64;

/// Relative `p_T² / |p|²` below which a momentum is treated as lying on the z axis.
pub const COLLINEAR_EPS: f64 = 1e-20;

const SQRT_HALF: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Which side of the Dirac bilinear a fermion wavefunction sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FermionLine {
    /// Column spinor entering the vertex (`u` for particles, `v` for antiparticles).
    Ket,
    /// Row spinor leaving the vertex (`ū` for particles, `v̄` for antiparticles).
    Bra,
}

/// Dirac spinor with its line orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FermionWf {
    /// Spinor components in the chiral basis.
    pub spinor: [C64; 4],
    /// Bilinear side.
    pub line: FermionLine,
    /// Momentum flow tag.
    pub flow: FourMomentum,
}

/// Polarisation vector (contravariant components).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorWf {
    /// `ε^μ` ordered `(0, 1, 2, 3)`.
    pub pol: [C64; 4],
    /// Momentum flow tag.
    pub flow: FourMomentum,
}

/// Scalar amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarWf {
    /// Amplitude (unity for external scalars).
    pub amp: C64,
    /// Momentum flow tag.
    pub flow: FourMomentum,
}

/// Wavefunction of any spin category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wavefunction {
    /// Spin-0.
    Scalar(ScalarWf),
    /// Spin-1/2.
    Fermion(FermionWf),
    /// Spin-1.
    Vector(VectorWf),
}

impl Wavefunction {
    /// Builds the external wavefunction of a leg for one helicity.
    ///
    /// Non-finite momenta or masses give a wavefunction whose components are
    /// all NaN, so the invalid input reaches every amplitude it feeds.
    pub fn build(momentum: &FourMomentum, mass: f64, helicity: i8, external: External) -> Self {
        if !(momentum.is_finite() && mass.is_finite()) {
            return Self::non_finite(external);
        }
        match external.spin {
            Spin::Scalar => Wavefunction::Scalar(ScalarWf::external(momentum, external.direction)),
            Spin::Fermion => Wavefunction::Fermion(FermionWf::external(
                momentum, mass, helicity, external,
            )),
            Spin::Vector => Wavefunction::Vector(VectorWf::external(
                momentum,
                mass,
                helicity,
                external.direction,
            )),
        }
    }

    fn non_finite(external: External) -> Self {
        let nan = Complex64::new(f64::NAN, f64::NAN);
        let flow = FourMomentum::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        match external.spin {
            Spin::Scalar => Wavefunction::Scalar(ScalarWf { amp: nan, flow }),
            Spin::Fermion => Wavefunction::Fermion(FermionWf {
                spinor: [nan; 4],
                line: fermion_orientation(external).0,
                flow,
            }),
            Spin::Vector => Wavefunction::Vector(VectorWf { pol: [nan; 4], flow }),
        }
    }

    /// Momentum flow tag.
    pub fn flow(&self) -> FourMomentum {
        match self {
            Wavefunction::Scalar(wf) => wf.flow,
            Wavefunction::Fermion(wf) => wf.flow,
            Wavefunction::Vector(wf) => wf.flow,
        }
    }

    /// Components as a flat list (one entry for scalars, four otherwise).
    pub fn components(&self) -> &[C64] {
        match self {
            Wavefunction::Scalar(wf) => std::slice::from_ref(&wf.amp),
            Wavefunction::Fermion(wf) => &wf.spinor,
            Wavefunction::Vector(wf) => &wf.pol,
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.components()
            .iter()
            .all(|c| c.re.is_finite() && c.im.is_finite())
    }
}

fn direction_sign(direction: Direction) -> f64 {
    match direction {
        Direction::Outgoing => 1.0,
        Direction::Incoming => -1.0,
    }
}

/// Line side and `nsf` (`+1` particle spinor, `-1` antiparticle spinor) of an external fermion.
fn fermion_orientation(external: External) -> (FermionLine, i8) {
    match (external.direction, external.antiparticle) {
        (Direction::Incoming, false) => (FermionLine::Ket, 1),
        (Direction::Outgoing, true) => (FermionLine::Ket, -1),
        (Direction::Outgoing, false) => (FermionLine::Bra, 1),
        (Direction::Incoming, true) => (FermionLine::Bra, -1),
    }
}

/// `|p| + p_z`, evaluated as `p_T² / (|p| - p_z)` for backward momenta.
pub fn light_cone_plus(p: &FourMomentum) -> f64 {
    let p_abs = p.p_abs();
    if p.pz >= 0.0 {
        p_abs + p.pz
    } else if p.pt_squared() <= COLLINEAR_EPS * p_abs * p_abs {
        0.0
    } else {
        p.pt_squared() / (p_abs - p.pz)
    }
}

impl ScalarWf {
    /// External scalar of unit amplitude.
    pub fn external(momentum: &FourMomentum, direction: Direction) -> Self {
        Self {
            amp: Complex64::new(1.0, 0.0),
            flow: *momentum * direction_sign(direction),
        }
    }
}

impl FermionWf {
    /// Builds the spinor for an external fermion leg.
    ///
    /// Incoming particles and outgoing antiparticles become kets; outgoing
    /// particles and incoming antiparticles become bras.
    pub fn external(momentum: &FourMomentum, mass: f64, helicity: i8, external: External) -> Self {
        let (line, nsf) = fermion_orientation(external);
        match line {
            FermionLine::Ket => Self::ket(momentum, mass, helicity, nsf),
            FermionLine::Bra => Self::bra(momentum, mass, helicity, nsf),
        }
    }

    /// Column spinor; `nsf` is `+1` for `u`, `-1` for `v`.
    pub fn ket(p: &FourMomentum, mass: f64, nhel: i8, nsf: i8) -> Self {
        let nh = i32::from(nhel) * i32::from(nsf);
        let nsf_f = f64::from(nsf);
        let flow = *p * -nsf_f;
        let zero = Complex64::new(0.0, 0.0);

        let spinor = if mass != 0.0 {
            let pp = p.p_abs();
            if pp == 0.0 {
                let sqm = rest_roots(mass);
                let ip = (1 + nh) / 2;
                let im = (1 - nh) / 2;
                [
                    re(f64::from(ip) * sqm[ip as usize]),
                    re(f64::from(im) * nsf_f * sqm[ip as usize]),
                    re(f64::from(ip) * nsf_f * sqm[im as usize]),
                    re(f64::from(im) * sqm[im as usize]),
                ]
            } else {
                let (sf, omega) = massive_weights(p, pp, mass, nh, nsf);
                let ip = ((1 + nh) / 2) as usize;
                let im = ((1 - nh) / 2) as usize;
                let sfomega = [sf[0] * omega[ip], sf[1] * omega[im]];
                let chi = massive_chi(p, pp, nh, 1.0);
                [
                    chi[im] * sfomega[0],
                    chi[ip] * sfomega[0],
                    chi[im] * sfomega[1],
                    chi[ip] * sfomega[1],
                ]
            }
        } else {
            let chi = massless_chi(p, nhel, nh, nsf_f, 1.0);
            if nh == 1 {
                [zero, zero, chi[0], chi[1]]
            } else {
                [chi[1], chi[0], zero, zero]
            }
        };

        Self {
            spinor,
            line: FermionLine::Ket,
            flow,
        }
    }

    /// Row spinor; `nsf` is `+1` for `ū`, `-1` for `v̄`.
    pub fn bra(p: &FourMomentum, mass: f64, nhel: i8, nsf: i8) -> Self {
        let nh = i32::from(nhel) * i32::from(nsf);
        let nsf_f = f64::from(nsf);
        let flow = *p * nsf_f;
        let zero = Complex64::new(0.0, 0.0);

        let spinor = if mass != 0.0 {
            let pp = p.p_abs();
            if pp == 0.0 {
                let sqm = rest_roots(mass);
                let ip = -((1 - nh) / 2) * i32::from(nhel);
                let im = ((1 + nh) / 2) * i32::from(nhel);
                let sq_ip = sqm[ip.unsigned_abs() as usize];
                let sq_im = sqm[im.unsigned_abs() as usize];
                [
                    re(f64::from(im) * sq_ip),
                    re(f64::from(ip) * nsf_f * sq_ip),
                    re(f64::from(im) * nsf_f * sq_im),
                    re(f64::from(ip) * sq_im),
                ]
            } else {
                let (sf, omega) = massive_weights(p, pp, mass, nh, nsf);
                let ip = ((1 + nh) / 2) as usize;
                let im = ((1 - nh) / 2) as usize;
                let sfomega = [sf[0] * omega[ip], sf[1] * omega[im]];
                let chi = massive_chi(p, pp, nh, -1.0);
                [
                    chi[im] * sfomega[1],
                    chi[ip] * sfomega[1],
                    chi[im] * sfomega[0],
                    chi[ip] * sfomega[0],
                ]
            }
        } else {
            let chi = massless_chi(p, nhel, nh, nsf_f, -1.0);
            if nh == 1 {
                [chi[0], chi[1], zero, zero]
            } else {
                [zero, zero, chi[1], chi[0]]
            }
        };

        Self {
            spinor,
            line: FermionLine::Bra,
            flow,
        }
    }
}

fn re(value: f64) -> C64 {
    Complex64::new(value, 0.0)
}

fn rest_roots(mass: f64) -> [f64; 2] {
    let root = mass.abs().sqrt();
    [root, root.copysign(mass)]
}

fn massive_weights(p: &FourMomentum, pp: f64, mass: f64, nh: i32, nsf: i8) -> ([f64; 2], [f64; 2]) {
    let nsf = i32::from(nsf);
    let sf = [
        f64::from(1 + nsf + (1 - nsf) * nh) * 0.5,
        f64::from(1 + nsf - (1 - nsf) * nh) * 0.5,
    ];
    let omega0 = (p.e + pp).sqrt();
    (sf, [omega0, mass / omega0])
}

/// Two-component helicity spinor of a massive fermion; `phase` is `+1` for kets, `-1` for bras.
fn massive_chi(p: &FourMomentum, pp: f64, nh: i32, phase: f64) -> [C64; 2] {
    let pp3 = light_cone_plus(p);
    let chi0 = re((pp3 * 0.5 / pp).sqrt());
    let chi1 = if pp3 == 0.0 {
        debug!(pz = p.pz, "fermion along -z, using collinear spinor");
        re(-f64::from(nh))
    } else {
        Complex64::new(f64::from(nh) * p.px, phase * p.py) / (2.0 * pp * pp3).sqrt()
    };
    [chi0, chi1]
}

fn massless_chi(p: &FourMomentum, nhel: i8, nh: i32, nsf: f64, phase: f64) -> [C64; 2] {
    let plus = light_cone_plus(p);
    let sqp0p3 = plus.sqrt() * nsf;
    let chi1 = if plus == 0.0 {
        debug!(pz = p.pz, "massless fermion along -z, using collinear spinor");
        re(-f64::from(nhel) * (2.0 * p.e).sqrt())
    } else {
        Complex64::new(f64::from(nh) * p.px, phase * p.py) / sqp0p3
    };
    [re(sqp0p3), chi1]
}

impl VectorWf {
    /// Builds the polarisation vector of an external vector boson.
    ///
    /// Helicity `0` is only meaningful for massive bosons.
    pub fn external(p: &FourMomentum, mass: f64, nhel: i8, direction: Direction) -> Self {
        let nsv = direction_sign(direction);
        let hel = f64::from(nhel);
        let nsvahl = nsv * hel.abs();
        let pt2 = p.pt_squared();
        let zero = Complex64::new(0.0, 0.0);

        let pol = if mass != 0.0 {
            let hel0 = 1.0 - hel.abs();
            let pp = p.e.min(p.p_abs());
            if pp == 0.0 {
                [
                    zero,
                    re(-hel * SQRT_HALF),
                    Complex64::new(0.0, nsvahl * SQRT_HALF),
                    re(hel0),
                ]
            } else {
                let pt = pp.min(pt2.sqrt());
                let emp = p.e / (mass * pp);
                let longitudinal = re(hel0 * pp / mass);
                let z = re(hel0 * p.pz * emp + hel * pt / pp * SQRT_HALF);
                if pt2 > COLLINEAR_EPS * pp * pp {
                    let pzpt = p.pz / (pp * pt) * SQRT_HALF * hel;
                    [
                        longitudinal,
                        Complex64::new(
                            hel0 * p.px * emp - p.px * pzpt,
                            -nsvahl * p.py / pt * SQRT_HALF,
                        ),
                        Complex64::new(
                            hel0 * p.py * emp - p.py * pzpt,
                            nsvahl * p.px / pt * SQRT_HALF,
                        ),
                        z,
                    ]
                } else {
                    [
                        longitudinal,
                        re(-hel * SQRT_HALF),
                        Complex64::new(0.0, nsvahl * SQRT_HALF.copysign(p.pz)),
                        z,
                    ]
                }
            }
        } else {
            let pp = p.e;
            let pt = pt2.sqrt();
            let z = re(hel * pt / pp * SQRT_HALF);
            if pt2 > COLLINEAR_EPS * pp * pp {
                let pzpt = p.pz / (pp * pt) * SQRT_HALF * hel;
                [
                    zero,
                    Complex64::new(-p.px * pzpt, -nsv * p.py / pt * SQRT_HALF),
                    Complex64::new(-p.py * pzpt, nsv * p.px / pt * SQRT_HALF),
                    z,
                ]
            } else {
                [
                    zero,
                    re(-hel * SQRT_HALF),
                    Complex64::new(0.0, nsv * SQRT_HALF.copysign(p.pz)),
                    z,
                ]
            }
        };

        Self {
            pol,
            flow: *p * nsv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minkowski(a: &[C64; 4], b: &[C64; 4]) -> C64 {
        a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3]
    }

    fn as_complex(p: &FourMomentum) -> [C64; 4] {
        p.to_array().map(re)
    }

    #[test]
    fn massless_polarisations_are_transverse_and_normalised() {
        let p = FourMomentum::new(50.0, 10.0, -20.0, 44.72135954999579);
        for hel in [-1, 1] {
            let wf = VectorWf::external(&p, 0.0, hel, Direction::Incoming);
            let conj = wf.pol.map(|c| c.conj());
            assert!(minkowski(&wf.pol, &as_complex(&p)).norm() < 1e-9);
            assert!((minkowski(&wf.pol, &conj) + 1.0).norm() < 1e-12);
        }
    }

    #[test]
    fn massive_longitudinal_is_transverse() {
        let p = FourMomentum::on_shell(91.1876, 12.0, 5.0, -30.0);
        let wf = VectorWf::external(&p, 91.1876, 0, Direction::Outgoing);
        let conj = wf.pol.map(|c| c.conj());
        assert!(minkowski(&wf.pol, &as_complex(&p)).norm() < 1e-9);
        assert!((minkowski(&wf.pol, &conj) + 1.0).norm() < 1e-9);
    }

    #[test]
    fn massive_spinor_normalisation() {
        let mass = 4.7;
        let p = FourMomentum::on_shell(mass, 3.0, -1.0, 8.0);
        for hel in [-1, 1] {
            let ket = FermionWf::ket(&p, mass, hel, 1);
            let bra = FermionWf::bra(&p, mass, hel, 1);
            let ubar_u: C64 = bra
                .spinor
                .iter()
                .zip(ket.spinor.iter())
                .map(|(b, k)| b * k)
                .sum();
            assert!((ubar_u.re - 2.0 * mass).abs() < 1e-9, "ubar u = {ubar_u}");
        }
    }

    #[test]
    fn backward_massless_spinor_is_finite() {
        let p = FourMomentum::new(40.0, 0.0, 0.0, -40.0);
        for hel in [-1, 1] {
            for nsf in [-1, 1] {
                let ket = FermionWf::ket(&p, 0.0, hel, nsf);
                let bra = FermionWf::bra(&p, 0.0, hel, nsf);
                assert!(Wavefunction::Fermion(ket).is_finite());
                assert!(Wavefunction::Fermion(bra).is_finite());
            }
        }
    }

    #[test]
    fn light_cone_plus_has_no_cancellation() {
        let p = FourMomentum::new(1.0e3, 1.0e-4, 0.0, -(1.0e6f64 - 1.0e-8).sqrt());
        let plus = light_cone_plus(&p);
        let expected = 1.0e-8 / (p.p_abs() - p.pz);
        assert!((plus - expected).abs() / expected < 1e-10);
    }

    #[test]
    fn non_finite_inputs_give_nan_components() {
        let good = FourMomentum::new(10.0, 0.0, 6.0, 8.0);
        let mut no_energy = good;
        no_energy.e = f64::NAN;
        let cases = [(no_energy, 0.0), (good, f64::INFINITY), (good * f64::NAN, 0.0)];
        for spin in [Spin::Scalar, Spin::Fermion, Spin::Vector] {
            for direction in [Direction::Incoming, Direction::Outgoing] {
                let external = External::new(spin, direction, false);
                for (p, mass) in cases {
                    let wf = Wavefunction::build(&p, mass, 1, external);
                    assert!(wf.components().iter().all(|c| c.re.is_nan() && c.im.is_nan()));
                }
                assert!(Wavefunction::build(&good, 0.0, 1, external).is_finite());
            }
        }
        let bra = Wavefunction::build(
            &no_energy,
            0.0,
            1,
            External::new(Spin::Fermion, Direction::Outgoing, false),
        );
        assert!(matches!(bra, Wavefunction::Fermion(FermionWf { line: FermionLine::Bra, .. })));
    }

    #[test]
    fn flows_follow_orientation() {
        let p = FourMomentum::new(10.0, 0.0, 6.0, 8.0);
        let ext_in = External::new(Spin::Fermion, Direction::Incoming, false);
        let ext_out_bar = External::new(Spin::Fermion, Direction::Outgoing, true);
        let a = FermionWf::external(&p, 0.0, 1, ext_in);
        let b = FermionWf::external(&p, 0.0, 1, ext_out_bar);
        assert_eq!(a.line, FermionLine::Ket);
        assert_eq!(b.line, FermionLine::Ket);
        assert_eq!(a.flow, -p);
        assert_eq!(b.flow, p);
    }
}
