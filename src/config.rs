//! View configuration
//!
//! Tunables for one graph view. Loaded from YAML or built in code; missing
//! keys take their defaults.
//!
//! ```yaml
//! threshold: 0.15
//! top_k: 6
//! clustering: true
//! top_terms: 8
//! max_postings: 500
//! louvain:
//!   resolution: 1.0
//!   seed: 7
//! ```

use crate::similarity::DEFAULT_TOP_TERMS;
use labscape_graph_algorithms::LouvainConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Louvain tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainSettings {
    /// Resolution gamma; above 1 favours smaller communities
    pub resolution: f64,
    /// Seed for node-order shuffling (None = corpus order)
    pub seed: Option<u64>,
    pub max_levels: usize,
    pub max_passes: usize,
}

impl Default for LouvainSettings {
    fn default() -> Self {
        let defaults = LouvainConfig::default();
        Self {
            resolution: defaults.resolution,
            seed: defaults.seed,
            max_levels: defaults.max_levels,
            max_passes: defaults.max_passes,
        }
    }
}

impl LouvainSettings {
    pub fn to_algo_config(&self) -> LouvainConfig {
        LouvainConfig {
            resolution: self.resolution,
            seed: self.seed,
            max_levels: self.max_levels,
            max_passes: self.max_passes,
            ..LouvainConfig::default()
        }
    }
}

/// Parameters of a graph view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Minimum cosine similarity for an edge, in [0, 1]
    pub threshold: f64,
    /// Neighbors each node keeps for itself
    pub top_k: usize,
    /// Run community detection
    pub clustering: bool,
    /// Shared terms kept per edge
    pub top_terms: usize,
    /// Skip terms whose active posting list is longer than this
    pub max_postings: Option<usize>,
    pub louvain: LouvainSettings,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            top_k: 6,
            clustering: true,
            top_terms: DEFAULT_TOP_TERMS,
            max_postings: None,
            louvain: LouvainSettings::default(),
        }
    }
}

impl GraphConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: GraphConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Reject values that cannot be clamped meaningfully
    pub fn validate(&self) -> ConfigResult<()> {
        if self.threshold.is_nan() {
            return Err(ConfigError::Invalid {
                field: "threshold",
                reason: "must be a number".to_string(),
            });
        }
        if !(self.louvain.resolution > 0.0) {
            return Err(ConfigError::Invalid {
                field: "louvain.resolution",
                reason: format!("must be positive, got {}", self.louvain.resolution),
            });
        }
        Ok(())
    }

    /// Copy with threshold forced into [0, 1] and a usable resolution
    ///
    /// The engine itself never re-validates; callers clamp here first.
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        config.threshold = if self.threshold.is_nan() {
            0.0
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        if !(config.louvain.resolution > 0.0) {
            config.louvain.resolution = LouvainSettings::default().resolution;
        }
        config
    }
}
