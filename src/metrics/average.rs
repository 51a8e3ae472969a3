//! Arithmetic means over agreement scores.

/// Mean of a list of scores, or `None` when the list is empty.
///
/// # Example
///
/// ```
/// use iaa_eval::metrics::average::mean;
///
/// assert_eq!(mean(&[0.5, 1.0]), Some(0.75));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the defined scores only; undefined entries are skipped, not counted as zero.
///
/// Returns `None` when no score is defined.
///
/// ```
/// use iaa_eval::metrics::average::mean_defined;
///
/// assert_eq!(mean_defined([Some(0.8), None]), Some(0.8));
/// assert_eq!(mean_defined([None, None]), None);
/// ```
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let defined: Vec<f64> = values.into_iter().flatten().collect();
    mean(&defined)
}
