//! Config and state loading.
//!
//! The config file is a single JSON object holding the Asana credentials and
//! the projects to replicate. The state file is a sequence of checkpoint
//! snapshots, one JSON object per line; only the final snapshot is
//! authoritative, so loading keeps the last successfully parsed line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, TapError};

/// Keys that must be present in the config file before any extraction runs.
const REQUIRED_CONFIG_KEYS: [&str; 2] = ["access_token", "projects"];

/// Tap configuration: credentials plus the projects to replicate.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Asana personal access token, sent as a bearer token.
    pub access_token: String,
    /// Project identifiers, processed in the order given.
    pub projects: Vec<String>,
}

/// Incoming/outgoing checkpoint state. Opaque to callers; the one key this
/// tap reads and writes is `"tasks"`, a timestamp string.
pub type State = Map<String, Value>;

/// Load and validate the config file.
///
/// All missing required keys are collected before failing so the operator
/// sees them in a single message.
///
/// # Errors
/// * `MissingConfigKeys` - if `access_token` or `projects` is absent
/// * `InvalidJson` - if the file is not a JSON object of the expected shape
pub fn load_config(path: &Path) -> Result<Config> {
    let file = File::open(path)?;
    let raw: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        TapError::InvalidJson(format!("config file {}: {}", path.display(), e))
    })?;

    let missing: Vec<String> = REQUIRED_CONFIG_KEYS
        .iter()
        .filter(|key| raw.get(**key).is_none())
        .map(|key| (*key).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TapError::MissingConfigKeys(missing));
    }

    serde_json::from_value(raw).map_err(|e| {
        TapError::InvalidJson(format!("config file {}: {}", path.display(), e))
    })
}

/// Load state from a file of newline-delimited checkpoint snapshots.
///
/// Each non-empty line must parse as a JSON object and replaces the running
/// state, so the last line wins. A malformed line is a hard error, not
/// skipped.
pub fn load_state(path: &Path) -> Result<State> {
    let file = File::open(path)?;
    let mut state = State::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        state = serde_json::from_str(trimmed).map_err(|e| {
            TapError::InvalidJson(format!("state file {}: {}", path.display(), e))
        })?;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_config_valid() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "config.json",
            r#"{"access_token": "tok", "projects": ["1", "2"]}"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.access_token, "tok");
        assert_eq!(config.projects, vec!["1", "2"]);
    }

    #[test]
    fn test_load_config_missing_access_token() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "config.json", r#"{"projects": []}"#);

        match load_config(&path) {
            Err(TapError::MissingConfigKeys(keys)) => {
                assert_eq!(keys, vec!["access_token"]);
            }
            other => panic!("expected MissingConfigKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_missing_projects() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "config.json", r#"{"access_token": "tok"}"#);

        match load_config(&path) {
            Err(TapError::MissingConfigKeys(keys)) => {
                assert_eq!(keys, vec!["projects"]);
            }
            other => panic!("expected MissingConfigKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_missing_both_keys_reported_together() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "config.json", r#"{"other": 1}"#);

        match load_config(&path) {
            Err(TapError::MissingConfigKeys(keys)) => {
                assert_eq!(keys, vec!["access_token", "projects"]);
            }
            other => panic!("expected MissingConfigKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_load_state_last_line_wins() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "state.json", "{\"tasks\": \"A\"}\n{\"tasks\": \"B\"}\n");

        let state = load_state(&path).unwrap();
        assert_eq!(state.get("tasks").unwrap(), "B");
    }

    #[test]
    fn test_load_state_single_line() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "state.json", "{\"tasks\": \"2024-01-01T00:00:00Z\"}");

        let state = load_state(&path).unwrap();
        assert_eq!(state.get("tasks").unwrap(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_load_state_empty_file_is_empty_state() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "state.json", "");

        let state = load_state(&path).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_load_state_malformed_line_is_error() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "state.json", "{\"tasks\": \"A\"}\nnot json\n");

        assert!(matches!(load_state(&path), Err(TapError::InvalidJson(_))));
    }
}
