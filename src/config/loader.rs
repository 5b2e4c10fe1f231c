//! Bootstrap input loader
//!
//! Reads init and join inputs from YAML or JSON files. Files ending in
//! `.json` are parsed as JSON, everything else as YAML.

use crate::BootstrapError;
use crate::userdata::{InitInput, JoinInput};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Load an init input from a file
pub async fn load_init_input(path: impl AsRef<Path>) -> Result<InitInput, BootstrapError> {
    load_input(path.as_ref()).await
}

/// Load a join input from a file
pub async fn load_join_input(path: impl AsRef<Path>) -> Result<JoinInput, BootstrapError> {
    load_input(path.as_ref()).await
}

async fn load_input<T: DeserializeOwned>(path: &Path) -> Result<T, BootstrapError> {
    let content = fs::read_to_string(path).await?;
    debug!("Loaded bootstrap input from {}", path.display());
    parse_input(path, &content)
}

/// Parse input content, picking the format from the file extension
pub fn parse_input<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, BootstrapError> {
    if path.extension().is_some_and(|e| e == "json") {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}
