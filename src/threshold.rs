//! IoU threshold validation and threshold sweeps.

use crate::agreement::DatasetAgreement;
use crate::error::{IaaError, Result};

/// Threshold below which an image's mean IoU is flagged as a conflict.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(IaaError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Generate a range of threshold values.
///
/// # Arguments
///
/// * `start` - Starting threshold value (inclusive)
/// * `end` - Ending threshold value (inclusive)
/// * `steps` - Number of threshold values to generate
///
/// # Example
///
/// ```
/// use iaa_eval::threshold::generate_threshold_range;
///
/// let thresholds = generate_threshold_range(0.3, 0.9, 13).unwrap();
/// assert_eq!(thresholds.len(), 13);
/// assert!((thresholds[1] - 0.35).abs() < 1e-10);
/// ```
pub fn generate_threshold_range(start: f64, end: f64, steps: usize) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(IaaError::InvalidThreshold(
            "Number of steps must be greater than 0".to_string(),
        ));
    }

    validate_threshold(start)?;
    validate_threshold(end)?;

    if start > end {
        return Err(IaaError::InvalidThreshold(format!(
            "Start threshold ({}) must be <= end threshold ({})",
            start, end
        )));
    }

    if steps == 1 {
        return Ok(vec![start]);
    }

    let step_size = (end - start) / (steps - 1) as f64;
    Ok((0..steps).map(|i| start + step_size * i as f64).collect())
}

/// Count flagged images for each threshold, reusing the already computed means.
///
/// Returns `(threshold, flagged_images)` pairs in the order given.
pub fn flag_sweep(agreement: &DatasetAgreement, thresholds: &[f64]) -> Vec<(f64, usize)> {
    thresholds
        .iter()
        .map(|&threshold| {
            let flagged = agreement
                .per_image
                .values()
                .filter(|image| image.mean_iou.is_some_and(|mean| mean < threshold))
                .count();
            (threshold, flagged)
        })
        .collect()
}
