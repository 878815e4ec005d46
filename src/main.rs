use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{error, info};

use json_zip_flattener::archive::ensure_archive_extension;
use json_zip_flattener::log::init_tracing;
use json_zip_flattener::{
    load_settings, unique_output_path, BadEntryPolicy, FlattenMode, OutputFormat, Pipeline,
    PipelineError, Settings,
};

/// Flatten the JSON documents of a zip archive into one spreadsheet.
#[derive(Debug, Parser)]
#[command(name = "json_zip_flattener", version)]
struct Cli {
    /// Zip archive to process.
    archive: PathBuf,

    /// Settings file (defaults to ./flattener.toml when present).
    #[arg(long, env = "FLATTENER_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<FlattenMode>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep going when an entry is not valid JSON.
    #[arg(long)]
    skip_bad_entries: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if self.skip_bad_entries {
            settings.on_bad_entry = BadEntryPolicy::Skip;
        }
    }
}

fn run(settings: &Settings, bytes: &[u8], stem: &str) -> Result<serde_json::Value, PipelineError> {
    let report = Pipeline::from_settings(settings).process(bytes)?;

    let dest = unique_output_path(&settings.output_dir, stem, settings.output_format);
    settings
        .output_format
        .writer(&settings.sheet_name)
        .write(&report.table, &dest)?;

    Ok(json!({
        "message": "archive processed",
        "output": dest.display().to_string(),
        "rows": report.table.row_count(),
        "columns": report.table.column_count(),
        "entries": report.entries,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    cli.apply(&mut settings);
    let _guard = init_tracing(settings.log_dir.as_deref());

    info!(archive = %cli.archive.display(), mode = ?settings.mode, "starting");

    ensure_archive_extension(&cli.archive)?;
    let bytes = tokio::fs::read(&cli.archive)
        .await
        .with_context(|| format!("failed to read {}", cli.archive.display()))?;
    let stem = cli
        .archive
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("processed")
        .to_string();

    // CPU-bound and synchronous; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || run(&settings, &bytes, &stem))
        .await
        .context("processing task panicked")?;

    match outcome {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(err) => {
            error!(kind = ?err.kind(), error = %err, "processing failed");
            Err(err.into())
        }
    }
}
