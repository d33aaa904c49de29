//! Parallel evaluation of event batches.
//!
//! Events are independent, so they are spread over a rayon pool and the
//! results are returned in input order. A failing or non-finite event is
//! recorded and never aborts the rest of the batch.

use mekd_core::{ErrorInfo, Event, MekdError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{Engine, EventFeatures};

/// Options for batch evaluation.
#[derive(Debug, Clone, Default)]
pub struct BatchOpts {
    /// Worker threads; zero lets rayon choose.
    pub threads: usize,
}

/// Outcome of one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum EventOutcome {
    /// Features were computed (possibly non-finite).
    Evaluated(EventFeatures),
    /// The event was rejected.
    Failed {
        /// Event identifier.
        id: u64,
        /// Reason for the rejection.
        error: MekdError,
    },
}

impl EventOutcome {
    /// Event identifier.
    pub fn id(&self) -> u64 {
        match self {
            EventOutcome::Evaluated(features) => features.id,
            EventOutcome::Failed { id, .. } => *id,
        }
    }

    /// Features when the event was evaluated.
    pub fn features(&self) -> Option<&EventFeatures> {
        match self {
            EventOutcome::Evaluated(features) => Some(features),
            EventOutcome::Failed { .. } => None,
        }
    }
}

/// Counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Events submitted.
    pub total: usize,
    /// Events with finite features.
    pub finite: usize,
    /// Events evaluated with a non-finite matrix element or discriminant.
    pub non_finite: usize,
    /// Events rejected with an error.
    pub failed: usize,
}

/// Ordered outcomes and their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One outcome per input event, in input order.
    pub outcomes: Vec<EventOutcome>,
    /// Aggregate counts.
    pub summary: BatchSummary,
}

/// Evaluates every event on a dedicated thread pool.
///
/// Only a failure to build the pool is returned as an error.
pub fn evaluate_batch(
    engine: &Engine,
    events: &[Event],
    opts: &BatchOpts,
) -> Result<BatchReport, MekdError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .build()
        .map_err(|err| MekdError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;

    let outcomes: Vec<EventOutcome> = pool.install(|| {
        events
            .par_iter()
            .map(|event| match engine.evaluate(event) {
                Ok(features) => EventOutcome::Evaluated(features),
                Err(error) => {
                    debug!(
                        event = event.id,
                        family = error.family(),
                        code = %error.info().code,
                        "event rejected"
                    );
                    EventOutcome::Failed {
                        id: event.id,
                        error,
                    }
                }
            })
            .collect()
    });

    let summary = summarize(&outcomes);
    info!(
        total = summary.total,
        finite = summary.finite,
        non_finite = summary.non_finite,
        failed = summary.failed,
        "batch evaluated"
    );
    Ok(BatchReport { outcomes, summary })
}

fn summarize(outcomes: &[EventOutcome]) -> BatchSummary {
    outcomes
        .iter()
        .fold(BatchSummary { total: outcomes.len(), ..BatchSummary::default() }, |mut acc, outcome| {
            match outcome {
                EventOutcome::Evaluated(features) if features.is_finite() => acc.finite += 1,
                EventOutcome::Evaluated(_) => acc.non_finite += 1,
                EventOutcome::Failed { .. } => acc.failed += 1,
            }
            acc
        })
}
