use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

const DEFAULT_ROUGHNESS: f64 = 0.45;

// Tunable generation settings, loadable from a JSON file.
// Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    // Base of the per-level jitter weight, usually in (0, 1); smaller is smoother
    pub roughness: f64,
    // Fixed seed for reproducible output; None draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            roughness: DEFAULT_ROUGHNESS,
            seed: None,
        }
    }
}

impl GeneratorParams {
    pub fn from_json_str(text: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
