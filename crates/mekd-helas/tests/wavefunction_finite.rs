use mekd_core::{Direction, External, FourMomentum, Spin};
use mekd_helas::Wavefunction;
use proptest::prelude::*;

fn external(spin: Spin, incoming: bool, antiparticle: bool) -> External {
    let direction = if incoming {
        Direction::Incoming
    } else {
        Direction::Outgoing
    };
    External::new(spin, direction, antiparticle)
}

proptest! {
    #[test]
    fn massless_wavefunctions_are_finite(
        px in -500.0f64..500.0,
        py in -500.0f64..500.0,
        pz in -500.0f64..500.0,
        incoming in any::<bool>(),
        antiparticle in any::<bool>(),
        hel in prop::sample::select(vec![-1i8, 1]),
    ) {
        let p = FourMomentum::on_shell(0.0, px, py, pz);
        prop_assume!(p.e > 1e-6);
        for spin in [Spin::Fermion, Spin::Vector] {
            let wf = Wavefunction::build(&p, 0.0, hel, external(spin, incoming, antiparticle));
            prop_assert!(wf.is_finite(), "{spin:?} at {p:?}");
        }
    }

    #[test]
    fn massive_wavefunctions_are_finite(
        mass in 0.1f64..200.0,
        px in -500.0f64..500.0,
        py in -500.0f64..500.0,
        pz in -500.0f64..500.0,
        incoming in any::<bool>(),
        hel in prop::sample::select(vec![-1i8, 0, 1]),
    ) {
        let p = FourMomentum::on_shell(mass, px, py, pz);
        let vector = Wavefunction::build(&p, mass, hel, external(Spin::Vector, incoming, false));
        prop_assert!(vector.is_finite());
        if hel != 0 {
            let fermion = Wavefunction::build(&p, mass, hel, external(Spin::Fermion, incoming, true));
            prop_assert!(fermion.is_finite());
        }
    }
}

#[test]
fn exactly_collinear_legs_are_finite() {
    for pz in [50.0, -50.0] {
        let p = FourMomentum::new(50.0, 0.0, 0.0, pz);
        for hel in [-1, 1] {
            for spin in [Spin::Fermion, Spin::Vector] {
                let wf = Wavefunction::build(&p, 0.0, hel, external(spin, true, false));
                assert!(wf.is_finite());
            }
        }
    }
}

#[test]
fn scalar_wavefunction_is_unit() {
    let p = FourMomentum::at_rest(125.0);
    let wf = Wavefunction::build(&p, 125.0, 0, external(Spin::Scalar, false, false));
    match wf {
        Wavefunction::Scalar(scalar) => assert_eq!((scalar.amp.re, scalar.amp.im), (1.0, 0.0)),
        other => panic!("expected a scalar, got {other:?}"),
    }
    assert_eq!(wf.flow(), p);
}
