//! Engine configuration: hypotheses, propagator parameters and discriminants.
//!
//! The configuration is fixed when an [`crate::Engine`] is built and never
//! mutated afterwards.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use mekd_core::{stable_hash_string, Channel, ErrorInfo, MekdError};
use mekd_helas::{FfsStructure, FfvStructure, Propagator, Term, VertexTerms, VvsStructure};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::discriminant::{DiscriminantConfig, DiscriminantSpec};
use crate::hypothesis::{HypothesisSpec, Topology};

/// Z boson pole mass in GeV.
pub const Z_MASS: f64 = 91.1876;
/// Z boson total width in GeV.
pub const Z_WIDTH: f64 = 2.4952;
/// Default mediator mass in GeV.
pub const RESONANCE_MASS: f64 = 125.0;
/// Default mediator width in GeV.
pub const RESONANCE_WIDTH: f64 = 0.00407;

// Z couplings to charged leptons: g/cos(θ_W) · (T3 - Q sin²θ_W) per chirality.
const SIN2_THETA_W: f64 = 0.2312;
const GZ: f64 = 0.743_4;

fn config_error(code: &str, message: impl Into<String>) -> MekdError {
    MekdError::Config(ErrorInfo::new(code, message.into()))
}

fn serde_error(code: &str, err: impl ToString) -> MekdError {
    MekdError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn default_z() -> Propagator {
    Propagator::new(Z_MASS, Z_WIDTH)
}

fn default_resonance() -> Propagator {
    Propagator::new(RESONANCE_MASS, RESONANCE_WIDTH)
}

fn z_lepton_vertex() -> VertexTerms<FfvStructure> {
    VertexTerms::new(vec![
        Term::real(FfvStructure::Left, GZ * (-0.5 + SIN2_THETA_W)),
        Term::real(FfvStructure::Right, GZ * SIN2_THETA_W),
    ])
}

fn default_hypotheses() -> Vec<HypothesisSpec> {
    let resonance = default_resonance();
    vec![
        HypothesisSpec {
            name: "spin0_qq".to_string(),
            topology: Topology::QqbarSpin0TwoLepton {
                resonance,
                production: VertexTerms::new(vec![Term::real(FfsStructure::Scalar, 1.0)]),
                decay: VertexTerms::new(vec![Term::real(FfsStructure::Scalar, 1.0)]),
            },
        },
        HypothesisSpec {
            name: "spin1_qq".to_string(),
            topology: Topology::QqbarSpin1TwoLepton {
                resonance,
                production: VertexTerms::new(vec![Term::real(FfvStructure::Vector, 1.0)]),
                decay: VertexTerms::new(vec![Term::real(FfvStructure::Vector, 1.0)]),
            },
        },
        HypothesisSpec {
            name: "scalar_gg_zz".to_string(),
            topology: Topology::GluonSpin0FourLepton {
                resonance,
                z: default_z(),
                gluon: VertexTerms::new(vec![Term::real(VvsStructure::FieldStrength, 1.0)]),
                zz: VertexTerms::new(vec![Term::real(VvsStructure::Metric, 1.0)]),
                z_lepton: z_lepton_vertex(),
            },
        },
        HypothesisSpec {
            name: "pseudoscalar_gg_zz".to_string(),
            topology: Topology::GluonSpin0FourLepton {
                resonance,
                z: default_z(),
                gluon: VertexTerms::new(vec![Term::real(VvsStructure::DualFieldStrength, 1.0)]),
                zz: VertexTerms::new(vec![Term::real(
                    VvsStructure::DualFieldStrength,
                    1.0 / (Z_MASS * Z_MASS),
                )]),
                z_lepton: z_lepton_vertex(),
            },
        },
    ]
}

fn default_discriminant() -> DiscriminantConfig {
    DiscriminantConfig {
        pairs: vec![
            DiscriminantSpec::ratio(Channel::TwoLepton, "spin0_qq", "spin1_qq"),
            DiscriminantSpec::ratio(Channel::FourLepton, "scalar_gg_zz", "pseudoscalar_gg_zz"),
        ],
        ..DiscriminantConfig::default()
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MekdConfig {
    /// Hypotheses evaluated for every event of their channel.
    #[serde(default = "default_hypotheses")]
    pub hypotheses: Vec<HypothesisSpec>,
    /// Discriminant settings.
    #[serde(default = "default_discriminant")]
    pub discriminant: DiscriminantConfig,
}

impl Default for MekdConfig {
    fn default() -> Self {
        Self {
            hypotheses: default_hypotheses(),
            discriminant: default_discriminant(),
        }
    }
}

impl MekdConfig {
    /// Parses a YAML document; omitted sections take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, MekdError> {
        from_yaml_slice(text.as_bytes())
    }

    /// Loads a YAML configuration from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MekdError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            MekdError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        from_yaml_slice(&bytes)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, MekdError> {
        serde_yaml::to_string(self).map_err(|err| serde_error("yaml-encode", err))
    }

    /// Stable hash of the canonical JSON form.
    pub fn config_hash(&self) -> Result<String, MekdError> {
        stable_hash_string(self)
    }

    /// Hypothesis description by name.
    pub fn hypothesis(&self, name: &str) -> Option<&HypothesisSpec> {
        self.hypotheses.iter().find(|spec| spec.name == name)
    }

    /// Checks masses, widths, couplings and discriminant references.
    pub fn validate(&self) -> Result<(), MekdError> {
        if self.hypotheses.is_empty() {
            return Err(config_error("no-hypotheses", "at least one hypothesis is required"));
        }
        let mut names = BTreeSet::new();
        for spec in &self.hypotheses {
            if spec.name.is_empty() {
                return Err(config_error("hypothesis-name", "hypothesis names must be non-empty"));
            }
            if !names.insert(spec.name.as_str()) {
                return Err(MekdError::Config(
                    ErrorInfo::new("duplicate-hypothesis", "hypothesis names must be unique")
                        .with_context("name", spec.name.clone()),
                ));
            }
            validate_topology(spec)?;
        }

        let degenerate = self.discriminant.degenerate;
        if !degenerate.is_finite() {
            return Err(config_error("degenerate-value", "degenerate sentinel must be finite"));
        }
        if (0.0..=1.0).contains(&degenerate) {
            warn!(degenerate, "degenerate sentinel lies inside the ratio range");
        }
        let mut channels = BTreeSet::new();
        for pair in &self.discriminant.pairs {
            if !channels.insert(pair.channel) {
                return Err(MekdError::Config(
                    ErrorInfo::new("duplicate-discriminant", "one discriminant per channel")
                        .with_context("channel", pair.channel.label()),
                ));
            }
            if !(pair.weight.is_finite() && pair.weight > 0.0) {
                return Err(MekdError::Config(
                    ErrorInfo::new("discriminant-weight", "weight must be finite and positive")
                        .with_context("channel", pair.channel.label()),
                ));
            }
            for name in pair.hypotheses() {
                match self.hypothesis(name) {
                    Some(spec) if spec.topology.channel() == pair.channel => {}
                    Some(_) => {
                        return Err(MekdError::Config(
                            ErrorInfo::new(
                                "discriminant-channel",
                                "discriminant hypothesis belongs to another channel",
                            )
                            .with_context("hypothesis", name.clone())
                            .with_context("channel", pair.channel.label()),
                        ))
                    }
                    None => {
                        return Err(MekdError::Config(
                            ErrorInfo::new(
                                "unknown-hypothesis",
                                "discriminant refers to an unknown hypothesis",
                            )
                            .with_context("hypothesis", name.clone())
                            .with_hint("declare it under `hypotheses`"),
                        ))
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_topology(spec: &HypothesisSpec) -> Result<(), MekdError> {
    for (line, propagator) in spec.topology.propagators() {
        let valid = propagator.mass.is_finite()
            && propagator.width.is_finite()
            && propagator.mass >= 0.0
            && propagator.width >= 0.0;
        if !valid {
            return Err(MekdError::Config(
                ErrorInfo::new("propagator", "masses and widths must be finite and non-negative")
                    .with_context("hypothesis", spec.name.clone())
                    .with_context("line", line),
            ));
        }
        if propagator.width == 0.0 {
            warn!(
                hypothesis = %spec.name,
                line,
                mass = propagator.mass,
                "zero width on an s-channel line; on-shell events give non-finite results"
            );
        }
    }
    if let Some(vertex) = spec.topology.empty_vertex() {
        return Err(MekdError::Config(
            ErrorInfo::new("empty-vertex", "every vertex needs at least one coupling")
                .with_context("hypothesis", spec.name.clone())
                .with_context("vertex", vertex),
        ));
    }
    Ok(())
}

fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, MekdError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml-decode", err))
}
