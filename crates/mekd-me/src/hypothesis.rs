//! Mediator hypotheses and their fixed amplitude topologies.
//!
//! Each topology wires external wavefunctions through a fixed sequence of
//! vertices. Leg order follows [`Channel::layout`]: incoming partons first,
//! then each charged lepton followed by its antilepton.

use mekd_core::{Channel, ErrorInfo, Event, MekdError};
use mekd_helas::{
    FermionWf, FfsVertex, FfvVertex, Propagator, Vertex, VvsVertex, Wavefunction, C64,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::helicity::{sum_squared, ExternalStates, HelicityTable};

/// Colour average times colour sum for `q q̄` initial states.
pub const QQBAR_COLOUR_FACTOR: f64 = 1.0 / 3.0;
/// Colour average times colour sum for `g g` initial states.
pub const GLUON_COLOUR_FACTOR: f64 = 1.0 / 8.0;

/// Closed set of amplitude topologies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// `q q̄ → X₀ → ℓ⁻ ℓ⁺` with scalar-type vertices.
    QqbarSpin0TwoLepton {
        /// Mediator line.
        resonance: Propagator,
        /// `q q̄ X` vertex.
        production: FfsVertex,
        /// `ℓ⁻ ℓ⁺ X` vertex.
        decay: FfsVertex,
    },
    /// `q q̄ → X₁ → ℓ⁻ ℓ⁺` with vector-type vertices.
    QqbarSpin1TwoLepton {
        /// Mediator line.
        resonance: Propagator,
        /// `q q̄ X` vertex.
        production: FfvVertex,
        /// `ℓ⁻ ℓ⁺ X` vertex.
        decay: FfvVertex,
    },
    /// `g g → X₀ → Z Z → ℓ₁⁻ ℓ₁⁺ ℓ₂⁻ ℓ₂⁺`.
    GluonSpin0FourLepton {
        /// Mediator line.
        resonance: Propagator,
        /// Z boson line.
        z: Propagator,
        /// Effective `g g X` vertex.
        gluon: VvsVertex,
        /// `Z Z X` vertex.
        zz: VvsVertex,
        /// `ℓ⁻ ℓ⁺ Z` vertex.
        z_lepton: FfvVertex,
    },
}

impl Topology {
    /// Channel the topology applies to.
    pub fn channel(&self) -> Channel {
        match self {
            Topology::QqbarSpin0TwoLepton { .. } | Topology::QqbarSpin1TwoLepton { .. } => {
                Channel::TwoLepton
            }
            Topology::GluonSpin0FourLepton { .. } => Channel::FourLepton,
        }
    }

    /// Colour factor of the initial state.
    pub fn colour_factor(&self) -> f64 {
        match self {
            Topology::QqbarSpin0TwoLepton { .. } | Topology::QqbarSpin1TwoLepton { .. } => {
                QQBAR_COLOUR_FACTOR
            }
            Topology::GluonSpin0FourLepton { .. } => GLUON_COLOUR_FACTOR,
        }
    }

    /// Propagators of every internal line.
    pub fn propagators(&self) -> Vec<(&'static str, Propagator)> {
        match self {
            Topology::QqbarSpin0TwoLepton { resonance, .. }
            | Topology::QqbarSpin1TwoLepton { resonance, .. } => vec![("resonance", *resonance)],
            Topology::GluonSpin0FourLepton { resonance, z, .. } => {
                vec![("resonance", *resonance), ("z", *z)]
            }
        }
    }

    /// Name of the first vertex without terms, if any.
    pub fn empty_vertex(&self) -> Option<&'static str> {
        match self {
            Topology::QqbarSpin0TwoLepton {
                production, decay, ..
            } => first_empty(&[("production", production.is_empty()), ("decay", decay.is_empty())]),
            Topology::QqbarSpin1TwoLepton {
                production, decay, ..
            } => first_empty(&[("production", production.is_empty()), ("decay", decay.is_empty())]),
            Topology::GluonSpin0FourLepton {
                gluon,
                zz,
                z_lepton,
                ..
            } => first_empty(&[
                ("gluon", gluon.is_empty()),
                ("zz", zz.is_empty()),
                ("z_lepton", z_lepton.is_empty()),
            ]),
        }
    }
}

fn first_empty(vertices: &[(&'static str, bool)]) -> Option<&'static str> {
    vertices
        .iter()
        .find(|(_, empty)| *empty)
        .map(|(name, _)| *name)
}

/// Serializable description of one hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSpec {
    /// Unique name, used as the feature key.
    pub name: String,
    /// Amplitude topology with its couplings and propagators.
    pub topology: Topology,
}

/// A hypothesis ready for evaluation.
#[derive(Debug, Clone)]
pub struct Hypothesis {
    spec: HypothesisSpec,
    table: HelicityTable,
}

impl Hypothesis {
    /// Prepares a hypothesis, precomputing its helicity table.
    pub fn new(spec: HypothesisSpec) -> Self {
        let table = HelicityTable::for_layout(spec.topology.channel().layout());
        Self { spec, table }
    }

    /// Hypothesis name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Topology and couplings.
    pub fn topology(&self) -> &Topology {
        &self.spec.topology
    }

    /// Channel the hypothesis applies to.
    pub fn channel(&self) -> Channel {
        self.spec.topology.channel()
    }

    /// Helicity configurations summed by [`Hypothesis::squared`].
    pub fn helicity_table(&self) -> &HelicityTable {
        &self.table
    }

    /// Amplitude for one helicity configuration (one label per leg).
    pub fn amplitude(&self, event: &Event, helicities: &[i8]) -> Result<C64, MekdError> {
        self.check_event(event)?;
        if helicities.len() != event.legs.len() {
            return Err(MekdError::Layout(
                ErrorInfo::new("helicity-count", "one helicity label per leg is required")
                    .with_context("legs", event.legs.len().to_string())
                    .with_context("found", helicities.len().to_string()),
            ));
        }
        for (idx, (leg, hel)) in event.legs.iter().zip(helicities.iter()).enumerate() {
            if !leg.helicities().contains(hel) {
                return Err(MekdError::Layout(
                    ErrorInfo::new("helicity-label", "helicity label not allowed for this leg")
                        .with_leg(idx)
                        .with_context("found", hel.to_string())
                        .with_hint(format!("expected one of {:?}", leg.helicities())),
                ));
            }
        }
        let wavefunctions: Vec<Wavefunction> = event
            .legs
            .iter()
            .zip(helicities.iter())
            .map(|(leg, &hel)| Wavefunction::build(&leg.momentum, leg.mass, hel, leg.external()))
            .collect();
        let refs: Vec<&Wavefunction> = wavefunctions.iter().collect();
        Ok(self.assemble(&refs, event.has_identical_lepton_pairs()))
    }

    /// Spin-summed, spin- and colour-averaged `|M|²`.
    ///
    /// Non-finite kinematics yield NaN rather than an error.
    pub fn squared(&self, event: &Event) -> Result<f64, MekdError> {
        self.check_event(event)?;
        let identical = event.has_identical_lepton_pairs();
        let states = ExternalStates::build(event, &self.table);
        let sum = sum_squared(&self.table, &states, |wfs| self.assemble(wfs, identical));
        let value = sum * self.topology().colour_factor()
            / (self.table.spin_average() * self.identical_factor(identical));
        if !value.is_finite() {
            debug!(hypothesis = %self.name(), event = event.id, "non-finite squared amplitude");
        }
        Ok(value)
    }

    fn identical_factor(&self, identical: bool) -> f64 {
        match self.topology() {
            Topology::GluonSpin0FourLepton { .. } if identical => 4.0,
            _ => 1.0,
        }
    }

    fn check_event(&self, event: &Event) -> Result<(), MekdError> {
        if event.channel != self.channel() {
            return Err(MekdError::Layout(
                ErrorInfo::new("channel-mismatch", "event channel differs from the hypothesis")
                    .with_context("hypothesis", self.name())
                    .with_context("expected", self.channel().label())
                    .with_context("found", event.channel.label()),
            ));
        }
        event.check_layout()?;
        self.table.check(event)
    }

    fn assemble(&self, wfs: &[&Wavefunction], identical: bool) -> C64 {
        use Wavefunction::{Fermion, Vector};

        match (self.topology(), wfs) {
            (
                Topology::QqbarSpin0TwoLepton {
                    resonance,
                    production,
                    decay,
                },
                [Fermion(q), Fermion(qbar), Fermion(lep), Fermion(antilep)],
            ) => {
                let x = production.propagate(qbar, q, resonance);
                decay.amplitude(lep, antilep, &x)
            }
            (
                Topology::QqbarSpin1TwoLepton {
                    resonance,
                    production,
                    decay,
                },
                [Fermion(q), Fermion(qbar), Fermion(lep), Fermion(antilep)],
            ) => {
                let x = production.propagate(qbar, q, resonance);
                decay.amplitude(lep, antilep, &x)
            }
            (
                Topology::GluonSpin0FourLepton {
                    resonance,
                    z,
                    gluon,
                    zz,
                    z_lepton,
                },
                [Vector(g1), Vector(g2), Fermion(l1), Fermion(a1), Fermion(l2), Fermion(a2)],
            ) => {
                let diagram = |bra1: &FermionWf, ket1: &FermionWf, bra2: &FermionWf, ket2: &FermionWf| {
                    let z1 = z_lepton.propagate(bra1, ket1, z);
                    let z2 = z_lepton.propagate(bra2, ket2, z);
                    let x = zz.propagate(&z1, &z2, resonance);
                    gluon.amplitude(g1, g2, &x)
                };
                let direct = diagram(l1, a1, l2, a2);
                if identical {
                    direct - diagram(l1, a2, l2, a1)
                } else {
                    direct
                }
            }
            // Unreachable once the layout has been checked.
            _ => C64::new(f64::NAN, f64::NAN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mekd_helas::{FfsStructure, Term, VertexTerms};

    fn scalar_spec() -> HypothesisSpec {
        HypothesisSpec {
            name: "scalar".into(),
            topology: Topology::QqbarSpin0TwoLepton {
                resonance: Propagator::new(125.0, 0.00407),
                production: VertexTerms::new(vec![Term::real(FfsStructure::Scalar, 1.0)]),
                decay: VertexTerms::new(vec![]),
            },
        }
    }

    #[test]
    fn reports_empty_vertices() {
        assert_eq!(scalar_spec().topology.empty_vertex(), Some("decay"));
    }

    #[test]
    fn topology_serializes_with_kind_tag() {
        let json = serde_json::to_value(&scalar_spec()).expect("serialize");
        assert_eq!(json["topology"]["kind"], "qqbar_spin0_two_lepton");
        assert_eq!(json["topology"]["resonance"]["mass"], 125.0);
    }

    #[test]
    fn colour_factors_follow_initial_state() {
        let spec = scalar_spec();
        assert_eq!(spec.topology.channel(), Channel::TwoLepton);
        assert!((spec.topology.colour_factor() - 1.0 / 3.0).abs() < 1e-15);
    }
}
