//! Utility functions for CLI commands.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use rollcall_roster::{RedbStore, Roster, RosterConfig};

use crate::Cli;

/// Optional overrides applied on top of [`RosterConfig::default`].
///
/// Absent fields keep their defaults, so a config file only needs the knobs
/// being tuned.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    dim: Option<usize>,

    #[serde(default)]
    register_threshold: Option<f32>,

    #[serde(default)]
    identify_threshold: Option<f32>,

    #[serde(default)]
    dedup_window_secs: Option<i64>,
}

/// Resolves the roster configuration from the --config file, if given.
pub fn get_roster_config(cli: &Cli) -> anyhow::Result<RosterConfig> {
    let mut cfg = RosterConfig::default();
    let Some(path) = cli.config.as_deref() else {
        return Ok(cfg);
    };

    let file: ConfigFile = load_request(path)?;
    if let Some(dim) = file.dim {
        cfg.dim = dim;
    }
    if let Some(t) = file.register_threshold {
        cfg.register_threshold = t;
    }
    if let Some(t) = file.identify_threshold {
        cfg.identify_threshold = t;
    }
    if let Some(secs) = file.dedup_window_secs {
        cfg.dedup_window = chrono::Duration::seconds(secs);
    }
    Ok(cfg)
}

/// Opens the roster over the database file named by --db.
pub async fn open_roster(cli: &Cli) -> anyhow::Result<Roster> {
    let cfg = get_roster_config(cli)?;
    print_verbose(cli, &format!("Opening roster database: {}", cli.db));

    let store = Arc::new(RedbStore::open(&cli.db)?);
    Ok(Roster::open(store, cfg).await?)
}

/// Loads a request from a YAML or JSON file.
pub fn load_request<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(result)
}

/// Requires input file to be provided.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("input file is required, use -f flag"))
}

/// Loads a raw descriptor vector from the -f file (a bare array of numbers).
pub fn load_embedding(cli: &Cli) -> anyhow::Result<Vec<f32>> {
    let path = require_input_file(cli)?;
    let raw: Vec<f32> = load_request(path)?;
    print_verbose(cli, &format!("Loaded {}-d embedding from {}", raw.len(), path));
    Ok(raw)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)?
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}
