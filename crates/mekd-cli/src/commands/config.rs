use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use mekd_me::MekdConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Validate this YAML file instead of printing the defaults.
    #[arg(long)]
    pub check: Option<PathBuf>,
}

pub fn run(args: &ConfigArgs) -> Result<(), Box<dyn Error>> {
    match &args.check {
        Some(path) => {
            let config = MekdConfig::from_path(path)?;
            config.validate()?;
            println!("{}", config.config_hash()?);
        }
        None => print!("{}", MekdConfig::default().to_yaml_string()?),
    }
    Ok(())
}
