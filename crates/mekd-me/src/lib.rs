#![deny(missing_docs)]
#![doc = "Matrix-element hypotheses, helicity summation, discriminants and batch evaluation for the MEKD engine."]

pub mod batch;
pub mod config;
pub mod discriminant;
/// Engine wiring a configuration into prepared hypotheses.
pub mod engine;
pub mod helicity;
pub mod hypothesis;

pub use batch::{evaluate_batch, BatchOpts, BatchReport, BatchSummary, EventOutcome};
pub use config::MekdConfig;
pub use discriminant::{
    log_ratio, normalized, ratio, DiscriminantConfig, DiscriminantForm, DiscriminantSpec,
    DEFAULT_DEGENERATE,
};
pub use engine::{Engine, EventFeatures};
pub use helicity::{ExternalStates, HelicityTable};
pub use hypothesis::{Hypothesis, HypothesisSpec, Topology};
