//! Flat phase-space event generation used to validate the engine.
//!
//! Final-state momenta are drawn with the RAMBO algorithm for massless
//! particles in the partonic centre-of-mass frame; the incoming partons run
//! along the beam axis. An optional longitudinal boost moves the event into a
//! lab-like frame.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MekdError};
use crate::kinematics::{FourMomentum, LorentzTransform};
use crate::particle::{Channel, Event, Particle, PDG_ELECTRON, PDG_GLUON, PDG_MUON, PDG_UP};
use crate::rng::RngHandle;

fn default_sqrt_s() -> f64 {
    125.0
}

fn generator_error(code: &str, message: impl Into<String>) -> MekdError {
    MekdError::Kinematics(ErrorInfo::new(code, message.into()))
}

/// Options controlling event generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOpts {
    /// Partonic centre-of-mass energy.
    #[serde(default = "default_sqrt_s")]
    pub sqrt_s: f64,
    /// Generate identical-flavour lepton pairs in the four-lepton channel.
    #[serde(default)]
    pub identical_flavour: bool,
    /// Events are boosted along z with a rapidity drawn from `[-max, max]`.
    #[serde(default)]
    pub max_rapidity: f64,
}

impl Default for GeneratorOpts {
    fn default() -> Self {
        Self {
            sqrt_s: default_sqrt_s(),
            identical_flavour: false,
            max_rapidity: 0.0,
        }
    }
}

/// Draws `n` massless momenta summing to `(sqrt_s, 0, 0, 0)`.
pub fn rambo_massless(
    sqrt_s: f64,
    n: usize,
    rng: &mut RngHandle,
) -> Result<Vec<FourMomentum>, MekdError> {
    if n < 2 {
        return Err(generator_error(
            "too-few-particles",
            "phase space needs at least two final-state particles",
        ));
    }
    if !sqrt_s.is_finite() || sqrt_s <= 0.0 {
        return Err(generator_error(
            "invalid-energy",
            "centre-of-mass energy must be positive and finite",
        ));
    }

    let mut q = Vec::with_capacity(n);
    for _ in 0..n {
        let cos = rng.uniform(-1.0, 1.0);
        let sin = (1.0 - cos * cos).max(0.0).sqrt();
        let phi = rng.uniform(0.0, 2.0 * std::f64::consts::PI);
        let energy = -(rng.unit_open_below() * rng.unit_open_below()).ln();
        q.push(FourMomentum::new(
            energy,
            energy * sin * phi.cos(),
            energy * sin * phi.sin(),
            energy * cos,
        ));
    }

    let total: FourMomentum = q.iter().copied().sum();
    let mass = total.mass();
    let b = [-total.px / mass, -total.py / mass, -total.pz / mass];
    let gamma = total.e / mass;
    let a = 1.0 / (1.0 + gamma);
    let x = sqrt_s / mass;

    Ok(q.into_iter()
        .map(|qi| {
            let bq = b[0] * qi.px + b[1] * qi.py + b[2] * qi.pz;
            let scale = qi.e + a * bq;
            FourMomentum::new(
                x * (gamma * qi.e + bq),
                x * (qi.px + b[0] * scale),
                x * (qi.py + b[1] * scale),
                x * (qi.pz + b[2] * scale),
            )
        })
        .collect())
}

/// Generates one event of the given channel.
pub fn generate_event(
    channel: Channel,
    opts: &GeneratorOpts,
    id: u64,
    rng: &mut RngHandle,
) -> Result<Event, MekdError> {
    let layout = channel.layout();
    let half = 0.5 * opts.sqrt_s;
    let beams = [
        FourMomentum::new(half, 0.0, 0.0, half),
        FourMomentum::new(half, 0.0, 0.0, -half),
    ];
    let finals = rambo_massless(opts.sqrt_s, layout.len() - 2, rng)?;
    let pdg = pdg_codes(channel, opts.identical_flavour);

    let boost = if opts.max_rapidity > 0.0 {
        let y = rng.uniform(-opts.max_rapidity, opts.max_rapidity);
        LorentzTransform::boost([0.0, 0.0, y.tanh()])?
    } else {
        LorentzTransform::identity()
    };

    let legs = beams
        .iter()
        .chain(finals.iter())
        .zip(layout.iter())
        .zip(pdg.iter())
        .map(|((p, ext), &code)| Particle::new(p.apply(&boost), 0.0, *ext, code))
        .collect();
    Ok(Event::new(id, channel, legs))
}

/// Generates `count` events; event `k` depends only on `(seed, k)`.
pub fn generate_events(
    channel: Channel,
    opts: &GeneratorOpts,
    count: usize,
    seed: u64,
) -> Result<Vec<Event>, MekdError> {
    (0..count as u64)
        .map(|idx| {
            let mut rng = RngHandle::substream(seed, idx);
            generate_event(channel, opts, idx, &mut rng)
        })
        .collect()
}

fn pdg_codes(channel: Channel, identical: bool) -> Vec<i32> {
    match channel {
        Channel::TwoLepton => vec![PDG_UP, -PDG_UP, PDG_MUON, -PDG_MUON],
        Channel::FourLepton => {
            let first = if identical { PDG_MUON } else { PDG_ELECTRON };
            vec![
                PDG_GLUON, PDG_GLUON, first, -first, PDG_MUON, -PDG_MUON,
            ]
        }
    }
}
