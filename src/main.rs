use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lele_counter::imaging::save_annotated;
use lele_counter::{
    load_templates_with, DecodeFailurePolicy, Detector, DetectorConfig, FryCountError, HistoryLog, LoadOptions,
    Result,
};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with_target(true)
        .init();

    tracing::info!("lele-count v{}", env!("CARGO_PKG_VERSION"));

    let history = HistoryLog::new(&cli.history);

    match cli.command {
        Command::Detect {
            input,
            templates,
            threshold,
            output,
            skip_bad_templates,
            no_history,
        } => {
            let policy = if skip_bad_templates {
                DecodeFailurePolicy::Skip
            } else {
                DecodeFailurePolicy::Abort
            };
            let bank = load_templates_with(&templates, &LoadOptions::default().with_decode_policy(policy))?;
            if bank.is_empty() {
                tracing::warn!(dir = %templates.display(), "template bank is empty; nothing can match");
            }

            let photo = image::open(&input)
                .map_err(|e| FryCountError::InvalidImage(format!("{}: {}", input.display(), e)))?
                .to_rgb8();

            let detector = Detector::new(&bank, DetectorConfig::default().with_threshold(threshold))?;
            let start = Instant::now();
            let result = detector.detect(&photo)?;
            let elapsed = start.elapsed();

            save_annotated(&result.annotated, &output, result.count, elapsed)?;

            if !no_history {
                history.append(result.count)?;
            }

            println!(
                "Total bibit lele terdeteksi: {} (threshold {:.2})",
                result.count,
                detector.config().threshold
            );
            for m in &result.matches {
                println!(
                    "  #{:<3} x={:<5} y={:<5} {}x{}  template {} @ {:>3.0}°  score {:.3}",
                    m.label,
                    m.bbox.left(),
                    m.bbox.top(),
                    m.bbox.width(),
                    m.bbox.height(),
                    m.template.template_index,
                    m.template.rotation_degrees,
                    m.template.score(),
                );
            }
        }
        Command::History => {
            let rows = history.read()?;
            if rows.is_empty() {
                println!("No detections logged in {}", history.path().display());
            } else {
                println!("{:>4}  {:<19}  {}", "ID", "Timestamp", "Detected Lele Count");
                for row in rows {
                    println!("{:>4}  {:<19}  {}", row.id, row.timestamp.format("%Y-%m-%d %H:%M:%S"), row.count);
                }
            }
        }
    }

    Ok(())
}
