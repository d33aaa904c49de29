use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use csv::WriterBuilder;
use mekd_core::{from_json_slice, Event};
use mekd_me::{evaluate_batch, BatchOpts, BatchReport, Engine, EventOutcome, MekdConfig};
use serde_json::json;
use tracing::info;

use crate::write_json;

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// YAML configuration; the built-in defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// JSON array of events.
    #[arg(long)]
    pub events: PathBuf,
    /// Output directory for features and the run report.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker threads; zero uses every available core.
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

pub fn run(args: &EvalArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => MekdConfig::from_path(path)?,
        None => MekdConfig::default(),
    };
    let config_hash = config.config_hash()?;
    let events: Vec<Event> = from_json_slice(&fs::read(&args.events)?)?;
    let engine = Engine::new(config)?;

    let report = evaluate_batch(
        &engine,
        &events,
        &BatchOpts {
            threads: args.threads,
        },
    )?;

    fs::create_dir_all(&args.out)?;
    write_json(args.out.join("features.json"), &report.outcomes)?;
    let names: Vec<String> = engine
        .hypotheses()
        .iter()
        .map(|h| h.name().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    write_features_csv(&args.out.join("features.csv"), &names, &report)?;

    let summary = json!({
        "events": args.events.display().to_string(),
        "config_hash": config_hash,
        "hypotheses": names,
        "summary": report.summary,
    });
    write_json(args.out.join("report.json"), &summary)?;
    info!(
        out = %args.out.display(),
        total = report.summary.total,
        failed = report.summary.failed,
        "evaluation written"
    );
    Ok(())
}

fn write_features_csv(
    path: &Path,
    names: &[String],
    report: &BatchReport,
) -> Result<(), Box<dyn Error>> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    let mut header = vec![
        "id".to_string(),
        "channel".to_string(),
        "status".to_string(),
        "discriminant".to_string(),
    ];
    header.extend(names.iter().map(|name| format!("me_{name}")));
    header.push("error".to_string());
    writer.write_record(&header)?;

    for outcome in &report.outcomes {
        let mut record = Vec::with_capacity(header.len());
        match outcome {
            EventOutcome::Evaluated(features) => {
                record.push(features.id.to_string());
                record.push(features.channel.label().to_string());
                record.push("evaluated".to_string());
                record.push(features.discriminant.to_string());
                for name in names {
                    record.push(
                        features
                            .me
                            .get(name)
                            .map(|me| me.to_string())
                            .unwrap_or_default(),
                    );
                }
                record.push(String::new());
            }
            EventOutcome::Failed { id, error } => {
                record.push(id.to_string());
                record.push(String::new());
                record.push("failed".to_string());
                record.push(String::new());
                record.extend(names.iter().map(|_| String::new()));
                record.push(error.info().code.clone());
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
