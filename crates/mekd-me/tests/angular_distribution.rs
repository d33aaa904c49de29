use mekd_core::{
    Channel, Direction, Event, External, FourMomentum, LorentzTransform, Particle, Spin,
};
use mekd_me::{Engine, MekdConfig};

const MASS: f64 = 125.0;

fn rest_frame_event(theta: f64, phi: f64) -> Event {
    let half = 0.5 * MASS;
    let layout = Channel::TwoLepton.layout();
    let lepton = FourMomentum::new(half, 0.0, 0.0, half);
    let antilepton = FourMomentum::new(half, 0.0, 0.0, -half);
    let rotation = LorentzTransform::rotation_y(theta).then(&LorentzTransform::rotation_z(phi));
    let momenta = [
        FourMomentum::new(half, 0.0, 0.0, half),
        FourMomentum::new(half, 0.0, 0.0, -half),
        lepton.apply(&rotation),
        antilepton.apply(&rotation),
    ];
    let pdg = [2, -2, 13, -13];
    let legs = momenta
        .iter()
        .zip(layout.iter())
        .zip(pdg)
        .map(|((p, ext), code)| Particle::new(*p, 0.0, *ext, code))
        .collect();
    Event::new(0, Channel::TwoLepton, legs)
}

fn squared(engine: &Engine, name: &str, event: &Event) -> f64 {
    engine
        .hypothesis(name)
        .expect("hypothesis")
        .squared(event)
        .expect("squared")
}

fn relative(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs())
}

#[test]
fn spin0_is_isotropic_spin1_is_not() {
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let angles = [(0.0, 0.0), (0.4, 1.0), (1.1, -2.0), (std::f64::consts::FRAC_PI_2, 0.3), (2.5, 4.0)];

    let spin0: Vec<f64> = angles
        .iter()
        .map(|&(t, p)| squared(&engine, "spin0_qq", &rest_frame_event(t, p)))
        .collect();
    let spin1: Vec<f64> = angles
        .iter()
        .map(|&(t, p)| squared(&engine, "spin1_qq", &rest_frame_event(t, p)))
        .collect();

    for value in &spin0 {
        assert!(value.is_finite() && *value > 0.0);
        assert!(relative(*value, spin0[0]) < 1e-10, "spin-0 varies: {spin0:?}");
    }
    let spread = spin1.iter().cloned().fold(f64::MIN, f64::max)
        / spin1.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread > 1.2, "spin-1 should vary with angle: {spin1:?}");
}

#[test]
fn vector_mediator_follows_one_plus_cos_squared() {
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let forward = squared(&engine, "spin1_qq", &rest_frame_event(0.0, 0.0));
    let transverse = squared(&engine, "spin1_qq", &rest_frame_event(std::f64::consts::FRAC_PI_2, 0.0));
    assert!(relative(forward / transverse, 2.0) < 1e-9, "ratio {}", forward / transverse);

    let theta = 0.8f64;
    let tilted = squared(&engine, "spin1_qq", &rest_frame_event(theta, 0.7));
    let expected = (1.0 + theta.cos().powi(2)) / 2.0;
    assert!(relative(tilted / forward, expected) < 1e-9);
}

#[test]
fn backward_leptons_are_continuous() {
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let pi = std::f64::consts::PI;
    for name in ["spin0_qq", "spin1_qq"] {
        let exact = squared(&engine, name, &rest_frame_event(pi, 0.0));
        let near = squared(&engine, name, &rest_frame_event(pi - 1e-9, 0.0));
        assert!(exact.is_finite());
        assert!(relative(exact, near) < 1e-6, "{name}: {exact} vs {near}");
    }
}

#[test]
fn discriminant_is_a_probability_on_resonance() {
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let features = engine.evaluate(&rest_frame_event(0.9, 0.1)).expect("features");
    assert_eq!(features.me.len(), 2);
    assert!((0.0..=1.0).contains(&features.discriminant));
    let (a, b) = (features.me["spin0_qq"], features.me["spin1_qq"]);
    assert!((features.discriminant - a / (a + b)).abs() < 1e-12);
}

#[test]
fn per_helicity_amplitudes_reproduce_the_sum() {
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let event = rest_frame_event(0.6, 2.2);
    for hypothesis in engine.hypotheses().iter().filter(|h| h.channel() == Channel::TwoLepton) {
        let table = hypothesis.helicity_table();
        let sum: f64 = (0..table.len())
            .filter_map(|i| table.helicities(i))
            .map(|hel| hypothesis.amplitude(&event, &hel).expect("amplitude").norm_sqr())
            .sum();
        let expected = sum * hypothesis.topology().colour_factor() / table.spin_average();
        let value = hypothesis.squared(&event).expect("squared");
        assert!(relative(value, expected) < 1e-12);
    }
}

#[test]
fn wrong_layout_is_a_layout_error() {
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let mut event = rest_frame_event(0.3, 0.0);
    event.legs[0] = Particle::new(
        event.legs[0].momentum,
        0.0,
        External::new(Spin::Vector, Direction::Incoming, false),
        21,
    );
    let err = engine.evaluate(&event).expect_err("layout");
    assert_eq!(err.info().code, "leg-kind");

    event.legs.pop();
    let err = engine.evaluate(&event).expect_err("layout");
    assert_eq!(err.info().code, "leg-count");

    let hypothesis = engine.hypothesis("scalar_gg_zz").expect("hypothesis");
    let err = hypothesis.squared(&rest_frame_event(0.3, 0.0)).expect_err("channel");
    assert_eq!(err.info().code, "channel-mismatch");
}

#[test]
fn out_of_range_helicity_labels_are_layout_errors() {
    const TAU_MASS: f64 = 1.77686;
    let engine = Engine::new(MekdConfig::default()).expect("engine");
    let hypothesis = engine.hypothesis("spin1_qq").expect("hypothesis");
    let mut event = rest_frame_event(0.7, 0.4);
    for idx in [2, 3] {
        let leg = event.legs[idx];
        let p = leg.momentum;
        let momentum = FourMomentum::on_shell(TAU_MASS, p.px, p.py, p.pz);
        event.legs[idx] = Particle::new(momentum, TAU_MASS, leg.external(), leg.pdg_id);
    }

    let amp = hypothesis.amplitude(&event, &[1, -1, 1, 1]).expect("amplitude");
    assert!(amp.norm().is_finite());
    for labels in [[1, -1, 3, 1], [0, 1, 1, -1], [1, 1, -1, -2]] {
        let err = hypothesis.amplitude(&event, &labels).expect_err("label");
        assert_eq!(err.info().code, "helicity-label");
        assert!(err.info().context.contains_key("leg"));
    }
}
