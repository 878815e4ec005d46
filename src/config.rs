use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::archive::DEFAULT_SUFFIX;
use crate::flattener::{FlattenMode, DEFAULT_SEPARATOR};
use crate::pipeline::BadEntryPolicy;
use crate::writer::{OutputFormat, DEFAULT_SHEET_NAME};

pub const DEFAULT_CONFIG_FILE: &str = "flattener";
pub const ENV_PREFIX: &str = "FLATTENER";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: FlattenMode,
    pub separator: String,
    pub match_suffixes: Vec<String>,
    pub on_bad_entry: BadEntryPolicy,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub sheet_name: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: FlattenMode::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            match_suffixes: vec![DEFAULT_SUFFIX.to_string()],
            on_bad_entry: BadEntryPolicy::default(),
            output_dir: PathBuf::from("processed"),
            output_format: OutputFormat::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            log_dir: None,
        }
    }
}

/// `flattener.toml` (optional) or an explicit file (required), then
/// `FLATTENER_*` environment variables on top.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let cfg = Config::builder()
        .add_source(file)
        .add_source(environment())
        .build()?;
    Ok(cfg.try_deserialize()?)
}

/// `FLATTENER_MATCH_SUFFIXES` takes a comma-separated list.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("match_suffixes")
}
