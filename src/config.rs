//! Page configuration module.
//!
//! Handles loading and validating `litebox.toml`. Every key is optional; a
//! missing file means stock defaults. Per-element options (see
//! [`crate::options`]) override the `[defaults]` table element by element.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! marker = "litebox"        # Class that marks lightbox sources
//! id_prefix = "litebox"     # Prefix for ids given to sources without one
//!
//! [defaults]
//! duration = 500            # Animation length in milliseconds
//! scale = 1.0               # Thumbnail scale (1.0 = natural size)
//!
//! [classes]
//! pane = "litebox-pane"         # Shared overlay container
//! modal = "litebox-modal-pane"  # Backdrop inside the overlay
//! active = "active"             # Added to an expanded clone once settled
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::options::{DEFAULT_DURATION_MS, DEFAULT_SCALE};

pub const CONFIG_FILE: &str = "litebox.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Page configuration loaded from `litebox.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// Class that marks an element as a lightbox source.
    pub marker: String,
    /// Prefix for generated element ids (`litebox0`, `litebox1`, ...).
    pub id_prefix: String,
    /// Fallback values for per-element options.
    pub defaults: DefaultsConfig,
    /// Class names used on generated and toggled elements.
    pub classes: ClassesConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            marker: "litebox".to_string(),
            id_prefix: "litebox".to_string(),
            defaults: DefaultsConfig::default(),
            classes: ClassesConfig::default(),
        }
    }
}

impl PageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.defaults.duration.is_finite() && self.defaults.duration > 0.0) {
            return Err(ConfigError::Validation(
                "defaults.duration must be a positive number of milliseconds".into(),
            ));
        }
        if !(self.defaults.scale.is_finite() && self.defaults.scale > 0.0) {
            return Err(ConfigError::Validation(
                "defaults.scale must be positive".into(),
            ));
        }
        if self.marker.trim().is_empty() {
            return Err(ConfigError::Validation("marker must not be empty".into()));
        }
        if self.id_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "id_prefix must not be empty".into(),
            ));
        }
        let classes = &self.classes;
        for (name, value) in [
            ("pane", &classes.pane),
            ("modal", &classes.modal),
            ("active", &classes.active),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "classes.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Fallback values for per-element options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Animation duration in milliseconds.
    pub duration: f64,
    /// Thumbnail scale factor.
    pub scale: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_MS,
            scale: DEFAULT_SCALE,
        }
    }
}

/// Class names the page controller reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassesConfig {
    pub pane: String,
    pub modal: String,
    pub active: String,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        Self {
            pane: "litebox-pane".to_string(),
            modal: "litebox-modal-pane".to_string(),
            active: "active".to_string(),
        }
    }
}

/// Load `litebox.toml` from a directory.
///
/// Returns stock defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<PageConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(PageConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: PageConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// A documented `litebox.toml` with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r##"# Litebox Configuration
# All options are optional. Remove any you don't need to change.

# Class that marks an element as a lightbox source. Each marked element
# must contain a single <img>.
marker = "litebox"

# Elements without an id get one: <id_prefix>0, <id_prefix>1, ...
id_prefix = "litebox"

# ---------------------------------------------------------------------------
# Fallbacks for per-element options. An element's own duration/scale wins
# when it parses; otherwise these apply.
# ---------------------------------------------------------------------------
[defaults]
# Animation length in milliseconds.
duration = 500.0
# Thumbnail scale relative to the natural image size.
scale = 1.0

# ---------------------------------------------------------------------------
# Class names
# ---------------------------------------------------------------------------
[classes]
# Shared overlay holding expanded clones.
pane = "litebox-pane"
# Backdrop inside the overlay. Its authored opacity is the fade-in target.
modal = "litebox-modal-pane"
# Added to an expanded clone once its entry animation settles.
active = "active"
"##
}
