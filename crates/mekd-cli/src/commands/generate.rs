use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use mekd_core::{generate_events, Channel, GeneratorOpts};
use tracing::info;

use crate::write_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelArg {
    /// `q q̄ → ℓ⁻ ℓ⁺`.
    TwoLepton,
    /// `g g → 4ℓ`.
    FourLepton,
}

impl From<ChannelArg> for Channel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::TwoLepton => Channel::TwoLepton,
            ChannelArg::FourLepton => Channel::FourLepton,
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Final-state channel.
    #[arg(long, value_enum)]
    pub channel: ChannelArg,
    /// Number of events.
    #[arg(long, default_value_t = 100)]
    pub count: usize,
    /// Master seed; event k depends only on (seed, k).
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Partonic centre-of-mass energy in GeV.
    #[arg(long = "sqrt-s", default_value_t = 125.0)]
    pub sqrt_s: f64,
    /// Use the same lepton flavour for both pairs (four-lepton only).
    #[arg(long)]
    pub identical: bool,
    /// Maximum rapidity of the longitudinal boost.
    #[arg(long, default_value_t = 0.0)]
    pub max_rapidity: f64,
    /// Output JSON file.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let opts = GeneratorOpts {
        sqrt_s: args.sqrt_s,
        identical_flavour: args.identical,
        max_rapidity: args.max_rapidity,
    };
    let channel = Channel::from(args.channel);
    let events = generate_events(channel, &opts, args.count, args.seed)?;
    write_json(&args.out, &events)?;
    info!(
        channel = channel.label(),
        count = events.len(),
        out = %args.out.display(),
        "events generated"
    );
    Ok(())
}
