//! Service config loader (strict parsing, environment overrides).

pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use goalkeeper_core::error::{GoalError, Result};

pub use schema::{AccessLogSection, ServerSection, ServiceConfig, StoreSection};

/// Optional path to a YAML config file.
pub const CONFIG_PATH_ENV: &str = "GOALKEEPER_CONFIG";

/// Load `.env` from the working directory or one of its parents into the
/// process environment. Variables already set win. A missing file is fine.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(GoalError::Config(format!("read .env failed: {e}"))),
    }
}

/// Like `load_dotenv`, for an explicit file. Returns whether it was read.
pub fn load_dotenv_from(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(GoalError::Config(format!(
            "read {} failed: {e}",
            path.display()
        ))),
    }
}

/// Load config from the process environment.
pub fn load() -> Result<ServiceConfig> {
    load_with(|k| std::env::var(k).ok())
}

/// Load config using `lookup` for environment variables.
///
/// Starts from the file named by `GOALKEEPER_CONFIG` (or built-in defaults),
/// applies `PORT`/`MONGO_URL`, then validates the result.
pub fn load_with<F>(lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match lookup(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => load_from_file(&path)?,
        _ => ServiceConfig::default(),
    };
    let cfg = base.with_env(lookup)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GoalError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

/// Parse YAML without environment overrides or the final validation pass.
pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    serde_yaml::from_str(s).map_err(|e| GoalError::Config(format!("invalid yaml: {e}")))
}
