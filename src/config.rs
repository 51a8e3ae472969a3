//! Evaluation settings, loadable from JSON.

use crate::error::{IaaError, Result};
use crate::threshold::{generate_threshold_range, validate_threshold, DEFAULT_IOU_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Range of thresholds offered to reviewers when varying the flag threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSweep {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

impl Default for ThresholdSweep {
    fn default() -> Self {
        Self {
            start: 0.3,
            end: 0.9,
            steps: 13,
        }
    }
}

impl ThresholdSweep {
    /// Expand into the list of thresholds.
    pub fn thresholds(&self) -> Result<Vec<f64>> {
        generate_threshold_range(self.start, self.end, self.steps)
    }
}

/// Settings for an agreement evaluation.
///
/// Every field has a default, so `{}` is a valid configuration.
///
/// ```
/// use iaa_eval::config::IaaConfig;
///
/// let config = IaaConfig::from_json_str(r#"{"iou_threshold": 0.7}"#).unwrap();
/// assert_eq!(config.iou_threshold, 0.7);
/// assert!(config.resolve_modifications);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IaaConfig {
    /// Images with a mean IoU strictly below this value are flagged.
    pub iou_threshold: f64,
    /// Evaluate reviewers' modifications in place of the records they replace.
    pub resolve_modifications: bool,
    pub sweep: ThresholdSweep,
}

impl Default for IaaConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            resolve_modifications: true,
            sweep: ThresholdSweep::default(),
        }
    }
}

impl IaaConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: IaaConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let config: IaaConfig = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Copy of this configuration with another flag threshold.
    pub fn with_threshold(&self, iou_threshold: f64) -> Result<Self> {
        validate_threshold(iou_threshold)?;
        Ok(Self {
            iou_threshold,
            ..self.clone()
        })
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold)?;
        self.sweep.thresholds().map_err(|err| {
            IaaError::InvalidConfig(format!("sweep {:?}: {}", self.sweep, err))
        })?;
        Ok(())
    }
}
