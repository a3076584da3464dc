//! Interaction configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) is a valid configuration.
//!
//! ```toml
//! [grab]
//! max_contacts = 2
//! min_span = 0.0001
//!
//! [poses]
//! base_url = "https://assets.example.com/hand-poses"
//! template_handedness = "right"
//!
//! [[poses.library]]
//! name = "fist"
//! path = "fist.bin"
//!
//! [profiles]
//! supported = ["generic-hand", "generic-trigger"]
//! default = "generic-trigger"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{InteractionError, Result};
use crate::grab::MAX_CONTACTS;
use crate::hand::Handedness;

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "xr-interact.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub grab: GrabConfig,
    pub poses: PoseConfig,
    pub profiles: ProfileConfig,
}

/// Grab solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Contacts a grabbable accepts at once (1 or 2)
    pub max_contacts: usize,
    /// Shortest two-contact span the solver will divide by
    pub min_span: f32,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            max_contacts: MAX_CONTACTS,
            min_span: 1e-4,
        }
    }
}

/// A named pose in the matcher's candidate list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseEntry {
    pub name: String,
    /// Template path relative to `base_url`
    pub path: String,
}

/// Pose template and matcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Where template paths are resolved from
    pub base_url: String,
    /// Hand the templates were recorded with; the other hand is mirrored
    pub template_handedness: Handedness,
    /// Added to the weight sum so all-zero weights cannot divide by zero
    pub weight_epsilon: f32,
    /// HTTP timeout for template fetches
    pub request_timeout_ms: u64,
    /// Candidates in scan order
    pub library: Vec<PoseEntry>,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            template_handedness: Handedness::Right,
            weight_epsilon: 1e-5,
            request_timeout_ms: 10_000,
            library: Vec::new(),
        }
    }
}

/// Input profile settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub supported: Vec<String>,
    pub default: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            supported: vec!["generic-hand".to_string(), "generic-trigger".to_string()],
            default: "generic-trigger".to_string(),
        }
    }
}

impl InteractionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| InteractionError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| InteractionError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from an explicit path, else the platform config file, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading interaction config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Platform config file location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "xr-interact").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CONTACTS).contains(&self.grab.max_contacts) {
            return Err(InteractionError::InvalidConfig(format!(
                "grab.max_contacts must be 1 or 2, got {}",
                self.grab.max_contacts
            )));
        }
        if !(self.grab.min_span.is_finite() && self.grab.min_span > 0.0) {
            return Err(InteractionError::InvalidConfig(
                "grab.min_span must be a positive number".to_string(),
            ));
        }
        if !(self.poses.weight_epsilon.is_finite() && self.poses.weight_epsilon > 0.0) {
            return Err(InteractionError::InvalidConfig(
                "poses.weight_epsilon must be a positive number".to_string(),
            ));
        }
        if self.poses.request_timeout_ms == 0 {
            return Err(InteractionError::InvalidConfig(
                "poses.request_timeout_ms must be greater than 0".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.poses.library {
            if !seen.insert(entry.name.as_str()) {
                return Err(InteractionError::InvalidConfig(format!(
                    "duplicate pose name '{}'",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}
