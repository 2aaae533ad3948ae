//! JSON run configuration for the demo and for batch tools.
//!
//! ```json
//! {
//!   "perspective": [0.0, 0.0],
//!   "trajector": [0.05, 1.5],
//!   "samples": 200,
//!   "seed": 7,
//!   "json_out": "out/report.json",
//!   "params": { "max_level": 2, "grid_step": 0.05 }
//! }
//! ```
//!
//! Every field except `trajector` has a default; `params` accepts any subset
//! of [`GroundingParams`].

use crate::error::GroundingError;
use crate::selection::GroundingParams;
use crate::types::{vec2, Vec2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GroundingConfig {
    /// Speaker position, `[x, y]`.
    #[serde(default = "default_perspective")]
    pub perspective: Vec2,
    /// Point trajector to describe, `[x, y]`.
    pub trajector: Vec2,
    /// Number of meanings to draw; the report covers the first one.
    #[serde(default = "default_samples")]
    pub samples: usize,
    pub seed: Option<u64>,
    pub json_out: Option<PathBuf>,
    #[serde(default)]
    pub params: GroundingParams,
}

fn default_perspective() -> Vec2 {
    vec2(0.0, 0.0)
}

fn default_samples() -> usize {
    1
}

pub fn load_config(path: &Path) -> Result<GroundingConfig, GroundingError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        GroundingError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;
    parse_config(&contents)
        .map_err(|e| GroundingError::Config(format!("Failed to parse config {}: {e}", path.display())))
}

/// Parses a configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<GroundingConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

/// Pretty-prints `value` as JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), GroundingError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                GroundingError::Config(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        GroundingError::Config(format!("Failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json)
        .map_err(|e| GroundingError::Config(format!("Failed to write JSON {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionMode;

    #[test]
    fn partial_params_fall_back_to_defaults() {
        let cfg = parse_config(
            r#"{ "trajector": [0.1, 1.5], "seed": 3,
                 "params": { "max_level": -1, "mode": "best" } }"#,
        )
        .expect("valid config");
        assert_eq!(cfg.trajector, vec2(0.1, 1.5));
        assert_eq!(cfg.perspective, vec2(0.0, 0.0));
        assert_eq!(cfg.samples, 1);
        assert_eq!(cfg.seed, Some(3));
        assert!(cfg.json_out.is_none());
        assert_eq!(cfg.params.max_level, -1);
        assert_eq!(cfg.params.mode, SelectionMode::Best);
        assert_eq!(cfg.params.grid_step, 0.1);
        assert_eq!(cfg.params.relations.kappa, 6.66);
    }

    #[test]
    fn missing_trajector_is_rejected() {
        assert!(parse_config(r#"{ "perspective": [0.0, 0.0] }"#).is_err());
    }

    #[test]
    fn load_errors_name_the_path() {
        let path = Path::new("definitely/not/here/grounding.json");
        match load_config(path) {
            Err(GroundingError::Config(msg)) => {
                assert!(msg.contains("Failed to read config"));
                assert!(msg.contains("grounding.json"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn written_reports_can_be_loaded_back() {
        let dir = std::env::temp_dir().join(format!("spatial_grounding_cfg_{}", std::process::id()));
        let path = dir.join("nested").join("cfg.json");
        let value = serde_json::json!({ "trajector": [0.5, 0.5], "samples": 4 });
        write_json_file(&path, &value).expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.samples, 4);
        let _ = fs::remove_dir_all(&dir);
    }
}
