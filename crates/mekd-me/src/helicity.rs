//! Helicity bookkeeping: the configuration table of a leg layout and the
//! per-event cache of external wavefunctions.

use itertools::Itertools;
use mekd_core::{Direction, ErrorInfo, Event, External, MekdError, Spin};
use mekd_helas::Wavefunction;

/// Helicity labels of a leg in a layout. External vectors of the supported
/// channels are gluons, so vectors take the two transverse states.
fn layout_helicities(external: &External) -> &'static [i8] {
    match external.spin {
        Spin::Scalar => &[0],
        Spin::Fermion | Spin::Vector => &[-1, 1],
    }
}

/// Every helicity configuration of a leg layout.
#[derive(Debug, Clone, PartialEq)]
pub struct HelicityTable {
    per_leg: Vec<&'static [i8]>,
    configurations: Vec<Vec<usize>>,
    spin_states: usize,
}

impl HelicityTable {
    /// Builds the table for an ordered leg layout.
    pub fn for_layout(layout: &[External]) -> Self {
        let per_leg: Vec<&'static [i8]> = layout.iter().map(layout_helicities).collect();
        let configurations = per_leg
            .iter()
            .map(|states| 0..states.len())
            .multi_cartesian_product()
            .collect();
        let spin_states = layout
            .iter()
            .zip(per_leg.iter())
            .filter(|(external, _)| external.direction == Direction::Incoming)
            .map(|(_, states)| states.len())
            .product();
        Self {
            per_leg,
            configurations,
            spin_states,
        }
    }

    /// Number of legs.
    pub fn legs(&self) -> usize {
        self.per_leg.len()
    }

    /// Number of helicity configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Whether the table has no configurations.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Helicity labels of configuration `index`.
    pub fn helicities(&self, index: usize) -> Option<Vec<i8>> {
        self.configurations.get(index).map(|config| {
            config
                .iter()
                .zip(self.per_leg.iter())
                .map(|(&k, states)| states[k])
                .collect()
        })
    }

    /// Number of spin states averaged over (product over incoming legs).
    pub fn spin_average(&self) -> f64 {
        self.spin_states as f64
    }

    /// Rejects events whose legs admit different helicity states than the
    /// table, e.g. a massive external vector.
    pub fn check(&self, event: &Event) -> Result<(), MekdError> {
        for (idx, (leg, states)) in event.legs.iter().zip(self.per_leg.iter()).enumerate() {
            if leg.helicities() != *states {
                return Err(MekdError::Layout(
                    ErrorInfo::new("helicity-states", "leg helicity states differ from the layout")
                        .with_leg(idx)
                        .with_context("found", leg.helicity_count().to_string())
                        .with_context("expected", states.len().to_string()),
                ));
            }
        }
        Ok(())
    }

    fn configurations(&self) -> impl Iterator<Item = &[usize]> {
        self.configurations.iter().map(Vec::as_slice)
    }
}

/// External wavefunctions of one event for every leg and helicity.
#[derive(Debug, Clone)]
pub struct ExternalStates {
    per_leg: Vec<Vec<Wavefunction>>,
}

impl ExternalStates {
    /// Builds all external wavefunctions once; the helicity loop only indexes.
    pub fn build(event: &Event, table: &HelicityTable) -> Self {
        let per_leg = event
            .legs
            .iter()
            .zip(table.per_leg.iter())
            .map(|(leg, states)| {
                states
                    .iter()
                    .map(|&hel| Wavefunction::build(&leg.momentum, leg.mass, hel, leg.external()))
                    .collect()
            })
            .collect();
        Self { per_leg }
    }

    /// Wavefunctions of one configuration, in leg order.
    pub fn select(&self, config: &[usize]) -> Vec<&Wavefunction> {
        self.per_leg
            .iter()
            .zip(config.iter())
            .map(|(states, &k)| &states[k])
            .collect()
    }
}

/// `Σ_configs |amplitude|²` over every configuration of the table.
pub fn sum_squared<F>(table: &HelicityTable, states: &ExternalStates, mut amplitude: F) -> f64
where
    F: FnMut(&[&Wavefunction]) -> mekd_helas::C64,
{
    table
        .configurations()
        .map(|config| amplitude(&states.select(config)).norm_sqr())
        .sum()
}
