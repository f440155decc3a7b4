use anyhow::Result;
use smardmerge::{run_pipeline, PipelineConfig, PipelineError, PipelineSummary};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const CONFIG_FILE: &str = "smardmerge.yaml";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure paths ──────────────────────────────────────────
    let config = if Path::new(CONFIG_FILE).exists() {
        info!("config ← {}", CONFIG_FILE);
        PipelineConfig::from_yaml_file(CONFIG_FILE)?
    } else {
        PipelineConfig::default()
    };

    // ─── 3) load, normalize, merge, write ────────────────────────────
    match run_pipeline(&config) {
        Ok(summary) => print_summary(&summary),
        Err(PipelineError::NoDataAvailable) => {
            error!("no data processed, nothing written");
        }
        Err(e) => {
            error!("pipeline failed: {}", e);
        }
    }

    Ok(())
}

fn print_summary(summary: &PipelineSummary) {
    println!("Saved master dataset to {}", summary.output.display());
    println!(
        "{} rows × {} columns (sources: {})",
        summary.rows,
        summary.columns.len(),
        summary.sources.join(", ")
    );
    if let (Some(first), Some(last)) = (summary.first, summary.last) {
        println!("range: {} → {}", first, last);
    }
    println!("{:<4} {:<32} {:>10}", "#", "column", "non-null");
    for (i, (name, count)) in summary.columns.iter().zip(&summary.non_null).enumerate() {
        println!("{:<4} {:<32} {:>10}", i, name, count);
    }
    println!("\nColumn names:\n{:?}", summary.columns);
}
