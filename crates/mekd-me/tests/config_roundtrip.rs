use mekd_helas::{FfsStructure, Term, VertexTerms};
use mekd_me::{DiscriminantForm, Engine, MekdConfig, Topology};
use tempfile::tempdir;

#[test]
fn yaml_round_trip_preserves_config_and_hash() {
    let config = MekdConfig::default();
    let yaml = config.to_yaml_string().expect("yaml");
    let restored = MekdConfig::from_yaml_str(&yaml).expect("parse");
    assert_eq!(restored, config);
    assert_eq!(
        restored.config_hash().expect("hash"),
        config.config_hash().expect("hash")
    );
}

#[test]
fn empty_document_takes_defaults() {
    let config = MekdConfig::from_yaml_str("{}").expect("parse");
    assert_eq!(config, MekdConfig::default());
}

#[test]
fn hash_tracks_couplings() {
    let config = MekdConfig::default();
    let mut changed = config.clone();
    if let Topology::QqbarSpin0TwoLepton { decay, .. } = &mut changed.hypotheses[0].topology {
        *decay = VertexTerms::new(vec![Term::real(FfsStructure::Pseudoscalar, 1.0)]);
    }
    assert_ne!(
        config.config_hash().expect("hash"),
        changed.config_hash().expect("hash")
    );
}

#[test]
fn loads_custom_yaml_from_disk() {
    let yaml = r#"
hypotheses:
  - name: scalar
    topology:
      kind: qqbar_spin0_two_lepton
      resonance: { mass: 200.0, width: 5.0 }
      production:
        - { structure: scalar, coupling: [1.0, 0.0] }
      decay:
        - { structure: left, coupling: [0.5, 0.0] }
        - { structure: right, coupling: [0.0, 0.5] }
  - name: vector
    topology:
      kind: qqbar_spin1_two_lepton
      resonance: { mass: 200.0 }
      production:
        - { structure: vector, coupling: [1.0, 0.0] }
      decay:
        - { structure: axial, coupling: [1.0, 0.0] }
discriminant:
  degenerate: -5.0
  pairs:
    - { channel: two_lepton, numerator: scalar, denominator: vector, form: log_ratio }
"#;
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("mekd.yaml");
    std::fs::write(&path, yaml).expect("write");

    let config = MekdConfig::from_path(&path).expect("load");
    assert_eq!(config.hypotheses.len(), 2);
    assert_eq!(config.discriminant.degenerate, -5.0);
    let pair = &config.discriminant.pairs[0];
    assert_eq!(pair.form, DiscriminantForm::LogRatio);
    assert_eq!(pair.weight, 1.0);
    match &config.hypotheses[1].topology {
        Topology::QqbarSpin1TwoLepton { resonance, .. } => assert_eq!(resonance.width, 0.0),
        other => panic!("unexpected topology {other:?}"),
    }

    let engine = Engine::new(config).expect("zero width is allowed");
    assert_eq!(engine.hypotheses().len(), 2);
}

#[test]
fn invalid_documents_are_serde_errors() {
    let err = MekdConfig::from_yaml_str("hypotheses: 3").expect_err("invalid");
    assert_eq!(err.info().code, "yaml-decode");

    let err = MekdConfig::from_path("/nonexistent/mekd.yaml").expect_err("missing");
    assert_eq!(err.info().code, "config-read");
}

#[test]
fn engine_rejects_invalid_config() {
    let mut config = MekdConfig::default();
    config.hypotheses.clear();
    let err = Engine::new(config).expect_err("invalid");
    assert_eq!(err.info().code, "no-hypotheses");
}
