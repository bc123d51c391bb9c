// src/registry/loader.rs
use crate::check::Check;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct ChecksFile {
    #[serde(default)]
    checks: Vec<Check>,
}

/// Load seed checks from a file (YAML or JSON). Invalid checks are skipped.
pub async fn load_checks<P: AsRef<Path>>(path: P) -> Result<Vec<Check>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read checks file {}", path.display()))?;

    let file: ChecksFile = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).context("Failed to parse YAML checks file")?
        }
        _ => serde_json::from_str(&contents).context("Failed to parse JSON checks file")?,
    };

    let total = file.checks.len();
    let checks: Vec<Check> = file
        .checks
        .into_iter()
        .filter(|check| match check.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping invalid check: {}", e);
                false
            }
        })
        .collect();

    info!(
        "Loaded {}/{} checks from {}",
        checks.len(),
        total,
        path.display()
    );
    Ok(checks)
}
