//! Pager configuration
//!
//! [`PageConfig`] is read once at construction and never changes afterwards.
//! Keys use the option names page authors already write in their JSON/TOML
//! (`isCycle`, `translateThreshold`, ...); every key is optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither `.json` nor `.toml`
    #[error("Unknown configuration format: {0}")]
    UnknownFormat(PathBuf),

    /// An option is out of range
    #[error("Invalid option `{option}`: {reason}")]
    Invalid {
        option: &'static str,
        reason: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Pager configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Bind input listeners at construction
    #[serde(rename = "isStart")]
    pub start_enabled: bool,
    /// Enable mouse input
    #[serde(rename = "isMouse")]
    pub mouse: bool,
    /// Enable touch input
    #[serde(rename = "isTouch")]
    pub touch: bool,
    /// Enable MS-style pointer input
    #[serde(rename = "isPointerTouch")]
    pub pointer_touch: bool,
    /// Suppress native image dragging when a gesture starts on an image
    #[serde(rename = "isImgTouch")]
    pub img_touch: bool,
    /// Wrap around past the last slide
    #[serde(rename = "isCycle")]
    pub cycle: bool,
    /// Allow wrapping backward from the first slide (needs `cycle`)
    #[serde(rename = "isFirstChange")]
    pub first_change: bool,
    /// Keep the outgoing slide static; only the incoming slide moves
    #[serde(rename = "isSingle")]
    pub single: bool,

    /// Extra inline styles applied to every slide
    pub page_style: BTreeMap<String, String>,
    /// Slide shown at construction
    pub current: usize,

    /// How much the outgoing slide shrinks over a full-height drag
    pub scale: f32,
    /// Divisor applied to the outgoing slide's offset
    pub move_y: f32,

    /// Use CSS transitions when available
    pub use_transition: bool,
    /// Use CSS transforms when available (falls back to left/top)
    pub use_transform: bool,
    /// CSS easing function for settle animations
    pub easing_type: String,
    /// Settle animation duration, in milliseconds
    pub transition_time: u32,
    /// Transition-property list; derived from the transform name when absent
    pub transition_property: Option<String>,
    /// Drag distance (px) at which a release commits
    pub translate_threshold: f32,

    /// Resize debounce interval, in milliseconds
    pub resize_polling: u64,

    /// Fixed width; falls back to the container's rendered width
    pub width: Option<f32>,
    /// Fixed height; falls back to the container's rendered height
    pub height: Option<f32>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            start_enabled: true,
            mouse: true,
            touch: true,
            pointer_touch: true,
            img_touch: false,
            cycle: true,
            first_change: false,
            single: true,
            page_style: BTreeMap::new(),
            current: 0,
            scale: 0.0,
            move_y: 1.0,
            use_transition: true,
            use_transform: true,
            easing_type: "linear".to_string(),
            transition_time: 400,
            transition_property: None,
            translate_threshold: 100.0,
            resize_polling: 60,
            width: None,
            height: None,
        }
    }
}

impl PageConfig {
    /// Parse from JSON and validate
    pub fn from_json(source: &str) -> Result<Self> {
        let config: PageConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from TOML and validate
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: PageConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&source),
            Some("toml") => Self::from_toml(&source),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Check numeric options
    pub fn validate(&self) -> Result<()> {
        if !self.move_y.is_finite() || self.move_y <= 0.0 {
            return Err(invalid("moveY", format!("must be > 0, got {}", self.move_y)));
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(invalid("scale", format!("must be >= 0, got {}", self.scale)));
        }
        if !self.translate_threshold.is_finite() || self.translate_threshold < 0.0 {
            return Err(invalid(
                "translateThreshold",
                format!("must be >= 0, got {}", self.translate_threshold),
            ));
        }
        for (option, value) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid(option, format!("must be > 0, got {v}")));
                }
            }
        }
        Ok(())
    }

    /// Resize debounce interval
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_polling)
    }
}

fn invalid(option: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { option, reason }
}
