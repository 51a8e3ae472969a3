//! Descriptive statistics over annotation records
//!
//! Counts annotation progress per image and workload per annotator, the
//! figures shown next to the agreement report.

use crate::types::AnnotationRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Workload of a single annotator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorStats {
    /// Number of records submitted
    pub total_annotations: usize,

    /// Number of rectangles drawn across all records
    pub total_rectangles: usize,

    /// Number of distinct images annotated
    pub images: usize,
}

/// Statistics collected over a set of annotation records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStats {
    /// Total number of records
    pub total_annotations: usize,

    /// Total number of rectangles across all records
    pub total_rectangles: usize,

    /// Number of records per image
    pub per_image: BTreeMap<String, usize>,

    /// Workload per annotator
    pub per_annotator: BTreeMap<String, AnnotatorStats>,
}

impl AnnotationStats {
    /// Create a new `AnnotationStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over a set of records
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AnnotationRecord>,
    {
        let mut stats = Self::new();
        let mut images_by_annotator: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

        for record in records {
            stats.add_record(record);
            images_by_annotator
                .entry(record.annotator.as_str())
                .or_default()
                .insert(record.image.as_str());
        }

        for (annotator, images) in images_by_annotator {
            if let Some(entry) = stats.per_annotator.get_mut(annotator) {
                entry.images = images.len();
            }
        }

        stats
    }

    fn add_record(&mut self, record: &AnnotationRecord) {
        let rectangles = record.rectangles.len();
        self.total_annotations += 1;
        self.total_rectangles += rectangles;
        *self.per_image.entry(record.image.clone()).or_insert(0) += 1;

        let annotator = self.per_annotator.entry(record.annotator.clone()).or_default();
        annotator.total_annotations += 1;
        annotator.total_rectangles += rectangles;
    }

    /// Number of distinct images with at least one record
    pub fn images_annotated(&self) -> usize {
        self.per_image.len()
    }

    /// Records per image over a full image list, 0 for images nobody annotated
    ///
    /// Images in the records but missing from `images` are not reported.
    pub fn progress(&self, images: &[String]) -> Vec<(String, usize)> {
        images
            .iter()
            .map(|image| (image.clone(), self.per_image.get(image).copied().unwrap_or(0)))
            .collect()
    }

    /// Records per annotator, busiest first (ties by name)
    pub fn by_annotator_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .per_annotator
            .iter()
            .map(|(annotator, stats)| (annotator.clone(), stats.total_annotations))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Log a summary of the statistics at info level
    pub fn log_summary(&self) {
        log::info!("{}", self.summary_string());
        for (annotator, stats) in &self.per_annotator {
            log::info!(
                "  {}: {} annotations, {} rectangles, {} images",
                annotator,
                stats.total_annotations,
                stats.total_rectangles,
                stats.images
            );
        }
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "AnnotationStats {{ annotations: {}, rectangles: {}, images: {}, annotators: {} }}",
            self.total_annotations,
            self.total_rectangles,
            self.images_annotated(),
            self.per_annotator.len()
        )
    }
}
