//! Particle records and event layouts.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MekdError};
use crate::kinematics::{FourMomentum, LorentzTransform};

/// PDG code of the up quark.
pub const PDG_UP: i32 = 2;
/// PDG code of the electron.
pub const PDG_ELECTRON: i32 = 11;
/// PDG code of the muon.
pub const PDG_MUON: i32 = 13;
/// PDG code of the gluon.
pub const PDG_GLUON: i32 = 21;

/// Spin category of an external leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spin {
    /// Spin-0 particle.
    Scalar,
    /// Spin-1/2 Dirac particle.
    Fermion,
    /// Spin-1 boson.
    Vector,
}

/// Whether a leg enters or leaves the hard process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Initial-state leg.
    Incoming,
    /// Final-state leg.
    Outgoing,
}

/// Static description of an external leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct External {
    /// Spin category.
    pub spin: Spin,
    /// Incoming or outgoing.
    pub direction: Direction,
    /// Whether the leg is an antiparticle (relevant for fermions only).
    #[serde(default)]
    pub antiparticle: bool,
}

impl External {
    /// Creates a leg descriptor.
    pub const fn new(spin: Spin, direction: Direction, antiparticle: bool) -> Self {
        Self {
            spin,
            direction,
            antiparticle,
        }
    }

    /// Whether the leg is incoming.
    pub fn is_incoming(&self) -> bool {
        self.direction == Direction::Incoming
    }
}

/// Measured external particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Four-momentum in the lab frame.
    pub momentum: FourMomentum,
    /// Pole mass used to build the wavefunction.
    #[serde(default)]
    pub mass: f64,
    /// Spin category.
    pub spin: Spin,
    /// Incoming or outgoing.
    pub direction: Direction,
    /// Whether the particle is an antiparticle.
    #[serde(default)]
    pub antiparticle: bool,
    /// PDG identifier; zero when unknown.
    #[serde(default)]
    pub pdg_id: i32,
}

impl Particle {
    /// Creates a particle record.
    pub fn new(momentum: FourMomentum, mass: f64, external: External, pdg_id: i32) -> Self {
        Self {
            momentum,
            mass,
            spin: external.spin,
            direction: external.direction,
            antiparticle: external.antiparticle,
            pdg_id,
        }
    }

    /// Static descriptor of this leg.
    pub fn external(&self) -> External {
        External::new(self.spin, self.direction, self.antiparticle)
    }

    /// Number of helicity states the leg can take.
    pub fn helicity_count(&self) -> usize {
        match self.spin {
            Spin::Scalar => 1,
            Spin::Fermion => 2,
            Spin::Vector if self.mass == 0.0 => 2,
            Spin::Vector => 3,
        }
    }

    /// Allowed helicity labels (fermions use twice the spin projection).
    pub fn helicities(&self) -> &'static [i8] {
        match self.spin {
            Spin::Scalar => &[0],
            Spin::Fermion => &[-1, 1],
            Spin::Vector if self.mass == 0.0 => &[-1, 1],
            Spin::Vector => &[-1, 0, 1],
        }
    }
}

/// Final-state channel handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// `q q̄ → ℓ⁻ ℓ⁺`.
    TwoLepton,
    /// `g g → ℓ₁⁻ ℓ₁⁺ ℓ₂⁻ ℓ₂⁺`.
    FourLepton,
}

impl Channel {
    /// Ordered leg layout expected for the channel.
    pub fn layout(&self) -> &'static [External] {
        const IN: Direction = Direction::Incoming;
        const OUT: Direction = Direction::Outgoing;
        const TWO: [External; 4] = [
            External::new(Spin::Fermion, IN, false),
            External::new(Spin::Fermion, IN, true),
            External::new(Spin::Fermion, OUT, false),
            External::new(Spin::Fermion, OUT, true),
        ];
        const FOUR: [External; 6] = [
            External::new(Spin::Vector, IN, false),
            External::new(Spin::Vector, IN, false),
            External::new(Spin::Fermion, OUT, false),
            External::new(Spin::Fermion, OUT, true),
            External::new(Spin::Fermion, OUT, false),
            External::new(Spin::Fermion, OUT, true),
        ];
        match self {
            Channel::TwoLepton => &TWO,
            Channel::FourLepton => &FOUR,
        }
    }

    /// Stable lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::TwoLepton => "two_lepton",
            Channel::FourLepton => "four_lepton",
        }
    }
}

/// One event: an ordered list of external legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Caller supplied identifier.
    #[serde(default)]
    pub id: u64,
    /// Channel the legs are laid out for.
    pub channel: Channel,
    /// External legs ordered as in [`Channel::layout`].
    pub legs: Vec<Particle>,
}

impl Event {
    /// Creates an event.
    pub fn new(id: u64, channel: Channel, legs: Vec<Particle>) -> Self {
        Self { id, channel, legs }
    }

    /// Sum of the incoming four-momenta.
    pub fn incoming_momentum(&self) -> FourMomentum {
        self.legs
            .iter()
            .filter(|leg| leg.direction == Direction::Incoming)
            .map(|leg| leg.momentum)
            .sum()
    }

    /// Sum of the outgoing four-momenta.
    pub fn outgoing_momentum(&self) -> FourMomentum {
        self.legs
            .iter()
            .filter(|leg| leg.direction == Direction::Outgoing)
            .map(|leg| leg.momentum)
            .sum()
    }

    /// Largest component of `incoming - outgoing`.
    pub fn momentum_imbalance(&self) -> f64 {
        self.incoming_momentum()
            .max_abs_diff(&self.outgoing_momentum())
    }

    /// Checks the legs against the channel layout.
    pub fn check_layout(&self) -> Result<(), MekdError> {
        let expected = self.channel.layout();
        if self.legs.len() != expected.len() {
            return Err(MekdError::Layout(
                ErrorInfo::new("leg-count", "event has the wrong number of legs")
                    .with_context("channel", self.channel.label())
                    .with_context("expected", expected.len().to_string())
                    .with_context("found", self.legs.len().to_string()),
            ));
        }
        for (idx, (leg, want)) in self.legs.iter().zip(expected.iter()).enumerate() {
            if leg.external() != *want {
                return Err(MekdError::Layout(
                    ErrorInfo::new("leg-kind", "leg does not match the channel layout")
                        .with_context("channel", self.channel.label())
                        .with_leg(idx)
                        .with_hint(format!("expected {:?}", want)),
                ));
            }
        }
        Ok(())
    }

    /// Copy of the event with every momentum transformed.
    pub fn transformed(&self, transform: &LorentzTransform) -> Self {
        let mut out = self.clone();
        for leg in &mut out.legs {
            leg.momentum = leg.momentum.apply(transform);
        }
        out
    }

    /// Parity image of the event.
    pub fn reflected(&self) -> Self {
        let mut out = self.clone();
        for leg in &mut out.legs {
            leg.momentum = leg.momentum.spatial_reflection();
        }
        out
    }

    /// Whether the two charged leptons of each pair share a flavour with the other pair.
    pub fn has_identical_lepton_pairs(&self) -> bool {
        match self.channel {
            Channel::TwoLepton => false,
            Channel::FourLepton => {
                self.legs.len() == 6
                    && self.legs[2].pdg_id != 0
                    && self.legs[2].pdg_id == self.legs[4].pdg_id
            }
        }
    }
}
