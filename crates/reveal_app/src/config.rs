//! Reveal configuration
//!
//! Every value has a default, so an empty file (or no file at all) gives the
//! stock page behaviour. Configuration can be written in TOML or JSON:
//!
//! ```toml
//! [observer]
//! threshold = 0.25
//! root_margin = "0px 0px -80px 0px"
//!
//! [stagger]
//! nested_delay = "compounded"
//!
//! [interaction]
//! progress_debounce_ms = 16
//! ```

use std::fs;
use std::path::Path;

use reveal_animation::StaggerTimings;
use reveal_sequencer::ObserverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RevealError};

// =============================================================================
// RevealConfig
// =============================================================================

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visibility watcher settings
    #[serde(default)]
    pub observer: ObserverConfig,
    /// Reveal stagger step sizes
    #[serde(default)]
    pub stagger: StaggerTimings,
    /// Ambient interaction handler settings
    #[serde(default)]
    pub interaction: InteractionConfig,
}

impl RevealConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: RevealConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: RevealConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RevealError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(RevealError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| RevealError::InvalidConfig(format!("cannot serialize config: {err}")))
    }

    /// Reject values the handlers cannot work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.observer.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RevealError::InvalidConfig(format!(
                "observer.threshold must be within [0, 1], got {threshold}"
            )));
        }

        let interaction = &self.interaction;
        for (name, value) in [
            ("interaction.press_scale", interaction.press_scale),
            ("interaction.hover_scale", interaction.hover_scale),
            ("interaction.parallax_rate", interaction.parallax_rate),
        ] {
            if !value.is_finite() {
                return Err(RevealError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if interaction.press_scale <= 0.0 || interaction.hover_scale <= 0.0 {
            return Err(RevealError::InvalidConfig(
                "interaction scales must be positive".to_string(),
            ));
        }
        if interaction.focus_outline.trim().is_empty() {
            return Err(RevealError::InvalidConfig(
                "interaction.focus_outline must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// InteractionConfig
// =============================================================================

/// Settings for the ambient interaction handlers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Scale applied while a nav item is pressed
    #[serde(default = "default_press_scale")]
    pub press_scale: f32,
    /// How long the press scale stays on, in milliseconds
    #[serde(default = "default_press_duration_ms")]
    pub press_duration_ms: u32,
    /// Scale applied to hovered image frames
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f32,
    /// Hero translation per pixel scrolled
    #[serde(default = "default_parallax_rate")]
    pub parallax_rate: f32,
    /// Quiet window before scroll progress is recomputed
    #[serde(default = "default_progress_debounce_ms")]
    pub progress_debounce_ms: u32,
    /// Outline drawn around focused elements
    #[serde(default = "default_focus_outline")]
    pub focus_outline: String,
    /// Offset of the focus outline
    #[serde(default = "default_focus_outline_offset")]
    pub focus_outline_offset: String,
    /// How long entrance animations stay suppressed after page-ready
    #[serde(default = "default_preload_duration_ms")]
    pub preload_duration_ms: u32,
}

fn default_press_scale() -> f32 {
    0.95
}

fn default_press_duration_ms() -> u32 {
    150
}

fn default_hover_scale() -> f32 {
    1.02
}

fn default_parallax_rate() -> f32 {
    -0.3
}

fn default_progress_debounce_ms() -> u32 {
    10
}

fn default_focus_outline() -> String {
    "2px solid #eb5757".to_string()
}

fn default_focus_outline_offset() -> String {
    "2px".to_string()
}

fn default_preload_duration_ms() -> u32 {
    100
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            press_scale: default_press_scale(),
            press_duration_ms: default_press_duration_ms(),
            hover_scale: default_hover_scale(),
            parallax_rate: default_parallax_rate(),
            progress_debounce_ms: default_progress_debounce_ms(),
            focus_outline: default_focus_outline(),
            focus_outline_offset: default_focus_outline_offset(),
            preload_duration_ms: default_preload_duration_ms(),
        }
    }
}
