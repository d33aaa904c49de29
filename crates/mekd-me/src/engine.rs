use std::collections::BTreeMap;

use mekd_core::{Channel, Event, MekdError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::MekdConfig;
use crate::hypothesis::Hypothesis;

/// Features computed for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFeatures {
    /// Event identifier.
    pub id: u64,
    /// Channel of the event.
    pub channel: Channel,
    /// Squared matrix element per hypothesis of the channel.
    pub me: BTreeMap<String, f64>,
    /// Discriminant of the channel, or the degenerate sentinel.
    pub discriminant: f64,
}

impl EventFeatures {
    /// Whether every matrix element and the discriminant are finite.
    pub fn is_finite(&self) -> bool {
        self.discriminant.is_finite() && self.me.values().all(|me| me.is_finite())
    }
}

/// Immutable evaluator built from a validated configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    config: MekdConfig,
    hypotheses: Vec<Hypothesis>,
}

impl Engine {
    /// Validates the configuration and prepares every hypothesis.
    pub fn new(config: MekdConfig) -> Result<Self, MekdError> {
        config.validate()?;
        let hypotheses: Vec<Hypothesis> = config
            .hypotheses
            .iter()
            .cloned()
            .map(Hypothesis::new)
            .collect();
        info!(
            hypotheses = hypotheses.len(),
            discriminants = config.discriminant.pairs.len(),
            "engine ready"
        );
        Ok(Self { config, hypotheses })
    }

    /// Configuration the engine was built from.
    pub fn config(&self) -> &MekdConfig {
        &self.config
    }

    /// Prepared hypotheses in configuration order.
    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Hypothesis by name.
    pub fn hypothesis(&self, name: &str) -> Option<&Hypothesis> {
        self.hypotheses.iter().find(|h| h.name() == name)
    }

    /// Squared matrix elements for every hypothesis of the event's channel
    /// and the channel discriminant.
    pub fn evaluate(&self, event: &Event) -> Result<EventFeatures, MekdError> {
        event.check_layout()?;
        let mut me = BTreeMap::new();
        for hypothesis in self.hypotheses.iter().filter(|h| h.channel() == event.channel) {
            me.insert(hypothesis.name().to_string(), hypothesis.squared(event)?);
        }
        let discriminant = self.config.discriminant.evaluate(event.channel, &me);
        Ok(EventFeatures {
            id: event.id,
            channel: event.channel,
            me,
            discriminant,
        })
    }
}
