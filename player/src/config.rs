//! Engine configuration.
//!
//! Small TOML-loadable knob set. Hosts that don't care pass
//! `PlayerConfig::default()`; everything has a default and unknown fields are
//! ignored. The resize filter is kept as a string in the file format and
//! validated into [`ResizeFilter`] at activation.

use anyhow::{Context, Result};
use fast_image_resize as fr;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for a playback session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Resize filter name: "nearest", "bilinear" or "lanczos3".
    #[serde(default = "default_resize_filter")]
    pub resize_filter: String,

    /// Minimum seconds between playback stat log lines; 0 disables them.
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            resize_filter: default_resize_filter(),
            stats_interval_secs: default_stats_interval(),
        }
    }
}

fn default_resize_filter() -> String {
    "lanczos3".to_string()
}

fn default_stats_interval() -> u64 {
    3
}

impl PlayerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse player config")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs)
    }
}

/// Validated resize filter choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    Nearest,
    Bilinear,
    Lanczos3,
}

impl ResizeFilter {
    /// Parse a filter name from config.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nearest" => Some(Self::Nearest),
            "bilinear" => Some(Self::Bilinear),
            "lanczos3" | "lanczos" => Some(Self::Lanczos3),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub(crate) fn resize_alg(self) -> fr::ResizeAlg {
        match self {
            Self::Nearest => fr::ResizeAlg::Nearest,
            Self::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Self::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}
