//! Combination of per-hypothesis matrix elements into a single feature.
//!
//! Degenerate denominators map to a configurable sentinel instead of
//! dividing by zero. NaN inputs propagate unchanged.

use std::collections::BTreeMap;

use mekd_core::Channel;
use serde::{Deserialize, Serialize};

/// Sentinel returned for degenerate inputs; outside `[0, 1]`.
pub const DEFAULT_DEGENERATE: f64 = -1.0;

fn default_degenerate() -> f64 {
    DEFAULT_DEGENERATE
}

fn default_weight() -> f64 {
    1.0
}

/// `me_a / (me_a + weight_b · me_b)`, in `[0, 1]` for non-negative inputs.
pub fn ratio(me_a: f64, me_b: f64, weight_b: f64, degenerate: f64) -> f64 {
    if me_a.is_nan() || me_b.is_nan() {
        return f64::NAN;
    }
    let denominator = me_a + weight_b * me_b;
    if denominator == 0.0 {
        return degenerate;
    }
    me_a / denominator
}

/// `ln(me_a / me_b)`; degenerate unless both operands are positive.
pub fn log_ratio(me_a: f64, me_b: f64, degenerate: f64) -> f64 {
    if me_a.is_nan() || me_b.is_nan() {
        return f64::NAN;
    }
    if me_a <= 0.0 || me_b <= 0.0 {
        return degenerate;
    }
    (me_a / me_b).ln()
}

/// Multi-way form `me_i / Σ_j me_j`.
pub fn normalized(mes: &[f64], index: usize, degenerate: f64) -> f64 {
    if mes.iter().any(|me| me.is_nan()) {
        return f64::NAN;
    }
    let total: f64 = mes.iter().sum();
    match mes.get(index) {
        Some(me) if total != 0.0 => me / total,
        _ => degenerate,
    }
}

/// Functional form of a discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscriminantForm {
    /// [`ratio`].
    #[default]
    Ratio,
    /// [`log_ratio`].
    LogRatio,
    /// [`normalized`] over the numerator, the denominator and the alternatives.
    Normalized,
}

/// Discriminant between two hypotheses of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscriminantSpec {
    /// Channel whose events the discriminant applies to.
    pub channel: Channel,
    /// Hypothesis in the numerator (signal).
    pub numerator: String,
    /// Competing hypothesis.
    pub denominator: String,
    /// Relative weight of the competing hypothesis.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Functional form.
    #[serde(default)]
    pub form: DiscriminantForm,
    /// Further competing hypotheses; only read by the normalized form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl DiscriminantSpec {
    /// Creates a ratio discriminant with unit weight.
    pub fn ratio(channel: Channel, numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self {
            channel,
            numerator: numerator.into(),
            denominator: denominator.into(),
            weight: default_weight(),
            form: DiscriminantForm::Ratio,
            alternatives: Vec::new(),
        }
    }

    /// Creates a multi-way discriminant `me_numerator / Σ me` over every named hypothesis.
    pub fn normalized(
        channel: Channel,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
        alternatives: Vec<String>,
    ) -> Self {
        Self {
            form: DiscriminantForm::Normalized,
            alternatives,
            ..Self::ratio(channel, numerator, denominator)
        }
    }

    pub(crate) fn hypotheses(&self) -> impl Iterator<Item = &String> {
        [&self.numerator, &self.denominator]
            .into_iter()
            .chain(&self.alternatives)
    }
}

/// Discriminant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscriminantConfig {
    /// Value reported when the discriminant is undefined.
    #[serde(default = "default_degenerate")]
    pub degenerate: f64,
    /// One discriminant per channel.
    #[serde(default)]
    pub pairs: Vec<DiscriminantSpec>,
}

impl Default for DiscriminantConfig {
    fn default() -> Self {
        Self {
            degenerate: default_degenerate(),
            pairs: Vec::new(),
        }
    }
}

impl DiscriminantConfig {
    /// Discriminant configured for `channel`, if any.
    pub fn for_channel(&self, channel: Channel) -> Option<&DiscriminantSpec> {
        self.pairs.iter().find(|spec| spec.channel == channel)
    }

    /// Evaluates the discriminant of `channel` from named matrix elements.
    ///
    /// Returns the sentinel when the channel has no discriminant or a
    /// hypothesis is missing from `me`.
    pub fn evaluate(&self, channel: Channel, me: &BTreeMap<String, f64>) -> f64 {
        let Some(spec) = self.for_channel(channel) else {
            return self.degenerate;
        };
        let Some(values) = spec
            .hypotheses()
            .map(|name| me.get(name).copied())
            .collect::<Option<Vec<f64>>>()
        else {
            return self.degenerate;
        };
        match spec.form {
            DiscriminantForm::Ratio => ratio(values[0], values[1], spec.weight, self.degenerate),
            DiscriminantForm::LogRatio => log_ratio(values[0], values[1], self.degenerate),
            DiscriminantForm::Normalized => normalized(&values, 0, self.degenerate),
        }
    }
}
