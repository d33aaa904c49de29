#![deny(missing_docs)]
#![doc = "Core kinematics, particle records, deterministic randomness and the shared error surface for the MEKD engine."]

pub mod errors;
/// Canonical hashing helpers.
pub mod hash;
pub mod kinematics;
pub mod particle;
pub mod phase_space;
pub mod rng;
/// Canonical JSON serde helpers.
pub mod serde;

pub use errors::{ErrorInfo, MekdError};
pub use hash::stable_hash_string;
pub use kinematics::{FourMomentum, LorentzTransform};
pub use particle::{Channel, Direction, Event, External, Particle, Spin};
pub use phase_space::{generate_event, generate_events, rambo_massless, GeneratorOpts};
pub use rng::{derive_substream_seed, RngHandle};
pub use serde::{from_json_slice, to_canonical_json_bytes};
