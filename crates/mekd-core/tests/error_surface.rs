use mekd_core::errors::{ErrorInfo, MekdError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_leg(2)
        .with_context("channel", "two_lepton")
}

#[test]
fn layout_error_surface() {
    let err = MekdError::Layout(sample_info("L001", "leg count mismatch"));
    assert_eq!(err.info().code, "L001");
    assert!(err.info().context.contains_key("leg"));
}

#[test]
fn config_error_surface() {
    let err = MekdError::Config(sample_info("C001", "negative width").with_hint("use width >= 0"));
    assert_eq!(err.info().hint.as_deref(), Some("use width >= 0"));
    assert!(err.to_string().contains("hint: use width >= 0"));
}

#[test]
fn kinematics_error_surface() {
    let err = MekdError::Kinematics(sample_info("K001", "superluminal boost"));
    assert_eq!(err.info().code, "K001");
}

#[test]
fn serde_error_roundtrip() {
    let err = MekdError::Serde(sample_info("S001", "schema mismatch"));
    let json = serde_json::to_string(&err).expect("encode");
    let back: MekdError = serde_json::from_str(&json).expect("decode");
    assert_eq!(err, back);
}

#[test]
fn family_matches_the_serialized_tag() {
    let errors = [
        MekdError::Kinematics(sample_info("K001", "superluminal boost")),
        MekdError::Layout(sample_info("L001", "leg count mismatch")),
        MekdError::Config(sample_info("C001", "negative width")),
        MekdError::Serde(sample_info("S001", "schema mismatch")),
    ];
    for err in errors {
        let json = serde_json::to_value(&err).expect("encode");
        assert_eq!(json["family"], err.family());
        assert_eq!(json["detail"]["context"]["leg"], "2");
    }
}

#[test]
fn display_lists_code_context_and_hint() {
    let err = MekdError::Layout(
        ErrorInfo::new("leg-kind", "leg does not match the channel layout")
            .with_leg(0)
            .with_hint("expected a quark"),
    );
    assert_eq!(
        err.to_string(),
        "layout: leg-kind: leg does not match the channel layout (leg=0); hint: expected a quark"
    );
}
