//! Decoder configuration
//!
//! Loaded from YAML. Lets deployments register hash algorithms that newer
//! firmware reports and choose how unknown algorithms are treated.
//!
//! ```yaml
//! strict_algorithms: false
//! algorithms:
//!   - name: crc16
//!     family: checksum
//!     width_bits: 16
//!   - name: sha512
//!     family: digest
//!     length: 64
//! ```

use crate::decode::{AlgorithmFamily, AlgorithmRegistry};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// Decoder Config
// ============================================================================

/// Complete decoder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Reject hash responses whose `type` is not registered
    #[serde(default)]
    pub strict_algorithms: bool,

    /// Algorithms added on top of the built-in set
    #[serde(default)]
    pub algorithms: Vec<AlgorithmDefinition>,
}

/// One algorithm registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmDefinition {
    /// Exact wire identifier (e.g., "sha512")
    pub name: String,

    #[serde(flatten)]
    pub family: AlgorithmFamily,
}

impl DecoderConfig {
    /// Built-in algorithms plus the configured ones
    pub fn registry(&self) -> AlgorithmRegistry {
        let mut registry = AlgorithmRegistry::builtin();
        for def in &self.algorithms {
            registry.register(def.name.clone(), def.family);
        }
        registry
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a decoder configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<DecoderConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load a decoder configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<DecoderConfig> {
    let config: DecoderConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate a decoder configuration
fn validate_config(config: &DecoderConfig) -> Result<()> {
    let mut seen = HashSet::new();

    for def in &config.algorithms {
        if def.name.is_empty() {
            return Err(Error::config("Algorithm name cannot be empty"));
        }

        if !seen.insert(def.name.as_str()) {
            return Err(Error::config(format!(
                "Duplicate algorithm name: {}",
                def.name
            )));
        }

        match def.family {
            AlgorithmFamily::Checksum { width_bits } if !(1..=64).contains(&width_bits) => {
                return Err(Error::config(format!(
                    "Algorithm '{}' has invalid checksum width {width_bits} (expected 1-64)",
                    def.name
                )));
            }
            AlgorithmFamily::Digest { length: Some(0) } => {
                return Err(Error::config(format!(
                    "Algorithm '{}' has zero digest length",
                    def.name
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
