use mekd_core::{generate_events, rambo_massless, Channel, GeneratorOpts, RngHandle};
use proptest::prelude::*;

#[test]
fn generated_events_match_channel_layout() {
    for channel in [Channel::TwoLepton, Channel::FourLepton] {
        let events = generate_events(channel, &GeneratorOpts::default(), 8, 11).expect("events");
        for event in &events {
            event.check_layout().expect("layout");
            assert!(event.momentum_imbalance() < 1e-9);
        }
    }
}

#[test]
fn event_k_is_independent_of_sample_size() {
    let opts = GeneratorOpts::default();
    let short = generate_events(Channel::FourLepton, &opts, 3, 99).expect("short");
    let long = generate_events(Channel::FourLepton, &opts, 10, 99).expect("long");
    assert_eq!(short[..], long[..3]);
}

#[test]
fn identical_flavour_is_flagged() {
    let opts = GeneratorOpts {
        identical_flavour: true,
        ..GeneratorOpts::default()
    };
    let events = generate_events(Channel::FourLepton, &opts, 1, 5).expect("events");
    assert!(events[0].has_identical_lepton_pairs());
    let mixed = generate_events(Channel::FourLepton, &GeneratorOpts::default(), 1, 5).unwrap();
    assert!(!mixed[0].has_identical_lepton_pairs());
}

#[test]
fn rejects_degenerate_requests() {
    let mut rng = RngHandle::from_seed(1);
    assert!(rambo_massless(100.0, 1, &mut rng).is_err());
    assert!(rambo_massless(-1.0, 3, &mut rng).is_err());
}

proptest! {
    #[test]
    fn rambo_momenta_are_massless_and_conserving(seed in any::<u64>(), n in 2usize..6, sqrt_s in 10.0f64..1000.0) {
        let mut rng = RngHandle::from_seed(seed);
        let momenta = rambo_massless(sqrt_s, n, &mut rng).unwrap();
        let total: mekd_core::FourMomentum = momenta.iter().copied().sum();
        prop_assert!((total.e - sqrt_s).abs() < 1e-9 * sqrt_s);
        prop_assert!(total.p_abs() < 1e-9 * sqrt_s);
        for p in &momenta {
            prop_assert!(p.mass_squared().abs() < 1e-9 * sqrt_s * sqrt_s);
            prop_assert!(p.e > 0.0);
        }
    }

    #[test]
    fn boosted_events_still_conserve_momentum(seed in any::<u64>(), rapidity in 0.0f64..2.5) {
        let opts = GeneratorOpts { max_rapidity: rapidity, ..GeneratorOpts::default() };
        let events = generate_events(Channel::TwoLepton, &opts, 1, seed).unwrap();
        prop_assert!(events[0].momentum_imbalance() < 1e-8 * opts.sqrt_s * (1.0 + rapidity.cosh()));
    }
}
