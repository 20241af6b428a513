//! Stream Triage pipeline runner.
//!
//! Loads a YAML pipeline config, opens the CSV batch source it names,
//! runs the pipeline, and prints one line (or one JSON document) per
//! delivered explanation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use st_common::Result;
use st_config::PipelineConfig;
use st_core::{CsvBatchSource, JsonDirSink, StreamingPipeline};

#[derive(Parser)]
#[command(name = "st-core", version, about = "Streaming anomaly triage pipeline runner")]
struct Cli {
    /// Pipeline config file (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Directory per-batch artifacts are written into
    #[arg(short, long, default_value = "artifacts")]
    output_dir: PathBuf,

    /// Print each explanation as a JSON document instead of a summary line
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error [{}]: {err}", err.code());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(&cli.config)?;
    let mut pipeline = StreamingPipeline::new(config)?;

    let input = pipeline.config().input.clone();
    let mut source = CsvBatchSource::open(&input.uri, pipeline.source_schema(), input.batch_size)?;
    let mut sink = JsonDirSink::new(&cli.output_dir)?;

    let json = cli.json;
    let summary = pipeline.run(&mut source, &mut sink, |explanation| {
        if json {
            println!("{}", serde_json::to_string(&explanation)?);
        } else {
            println!(
                "{} outliers, {} inliers, {} ranked groups",
                explanation.num_outliers,
                explanation.num_inliers,
                explanation.items.len()
            );
        }
        Ok(())
    })?;

    println!(
        "run {}: {} batches ({} delivered, {} failed), classification {} ms, summarization {} ms",
        summary.run_id,
        summary.batches_received,
        summary.batches_delivered,
        summary.batches_failed,
        summary.totals.classification_ms,
        summary.totals.summarization_ms
    );
    Ok(())
}
