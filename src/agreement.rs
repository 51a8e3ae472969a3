//! Inter-annotator agreement per image and across a dataset.

use crate::config::IaaConfig;
use crate::error::Result;
use crate::matching::{greedy_match_iou, group_by_image};
use crate::metrics::average::{mean, mean_defined};
use crate::types::{AnnotationStore, AnnotatorRectangles, ImageAnnotations};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Matched-IoU score between two annotators on one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAgreement {
    pub annotator_a: String,
    pub annotator_b: String,
    /// `None` when either annotator drew no rectangles.
    pub mean_iou: Option<f64>,
}

/// Agreement between all annotators of one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAgreement {
    /// Mean of the defined pairwise scores; `None` when there is not enough data.
    pub mean_iou: Option<f64>,
    /// Whether `mean_iou` is strictly below the threshold.
    pub flag: bool,
    pub annotator_count: usize,
    pub pairs: Vec<PairAgreement>,
}

impl ImageAgreement {
    /// An image without a usable score; never flagged.
    pub fn undefined(annotator_count: usize) -> Self {
        Self {
            mean_iou: None,
            flag: false,
            annotator_count,
            pairs: Vec::new(),
        }
    }

    /// An image with a defined score, flagged against `threshold`.
    pub fn scored(mean_iou: f64, annotator_count: usize, pairs: Vec<PairAgreement>, threshold: f64) -> Self {
        Self {
            mean_iou: Some(mean_iou),
            flag: mean_iou < threshold,
            annotator_count,
            pairs,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.mean_iou.is_some()
    }

    /// Same result with the flag recomputed for another threshold.
    pub fn with_threshold(&self, threshold: f64) -> Self {
        Self {
            flag: self.mean_iou.is_some_and(|mean| mean < threshold),
            ..self.clone()
        }
    }
}

/// A flagged image, as listed for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub image: String,
    pub mean_iou: f64,
}

/// Agreement over every image of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetAgreement {
    /// Mean of the defined per-image means; `None` if no image has one.
    pub mean_iou: Option<f64>,
    /// Every image, including the ones without a defined score.
    pub per_image: BTreeMap<String, ImageAgreement>,
}

impl DatasetAgreement {
    /// Flagged images, lowest agreement first (ties by image id).
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut conflicts: Vec<Conflict> = self
            .per_image
            .iter()
            .filter(|(_, image)| image.flag)
            .filter_map(|(id, image)| {
                image.mean_iou.map(|mean_iou| Conflict {
                    image: id.clone(),
                    mean_iou,
                })
            })
            .collect();

        conflicts.sort_by(|a, b| {
            a.mean_iou
                .partial_cmp(&b.mean_iou)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.image.cmp(&b.image))
        });
        conflicts
    }

    /// Re-flag every image for another threshold without re-matching.
    pub fn with_threshold(&self, threshold: f64) -> Self {
        Self {
            mean_iou: self.mean_iou,
            per_image: self
                .per_image
                .iter()
                .map(|(id, image)| (id.clone(), image.with_threshold(threshold)))
                .collect(),
        }
    }

    /// Number of images with a defined mean IoU.
    pub fn defined_count(&self) -> usize {
        self.per_image.values().filter(|image| image.is_defined()).count()
    }

    pub fn flagged_count(&self) -> usize {
        self.per_image.values().filter(|image| image.flag).count()
    }
}

/// Compute the agreement between all annotators of one image.
///
/// Every unordered pair of annotators is matched with
/// [`greedy_match_iou`]; the annotator inserted first drives the matching.
/// Pairs where one side drew nothing are left out of the mean rather than
/// counted as zero.
///
/// # Example
///
/// ```
/// use iaa_eval::agreement::image_agreement;
/// use iaa_eval::types::{AnnotatorRectangles, Rectangle};
///
/// let mut rects = AnnotatorRectangles::new();
/// rects.insert("leslie".to_string(), vec![Rectangle::new(10.0, 10.0, 110.0, 110.0)]);
/// rects.insert("remi".to_string(), vec![Rectangle::new(20.0, 20.0, 120.0, 120.0)]);
///
/// let result = image_agreement(&rects, 0.9);
/// assert!((result.mean_iou.unwrap() - 8100.0 / 11900.0).abs() < 1e-12);
/// assert!(result.flag);
/// ```
pub fn image_agreement(annotator_rectangles: &AnnotatorRectangles, threshold: f64) -> ImageAgreement {
    let annotator_count = annotator_rectangles.len();
    if annotator_count < 2 {
        return ImageAgreement::undefined(annotator_count);
    }

    let annotators: Vec<(&String, &Vec<_>)> = annotator_rectangles.iter().collect();
    let mut pairs = Vec::with_capacity(annotator_count * (annotator_count - 1) / 2);

    for (i, (annotator_a, set_a)) in annotators.iter().enumerate() {
        for (annotator_b, set_b) in &annotators[i + 1..] {
            pairs.push(PairAgreement {
                annotator_a: (*annotator_a).clone(),
                annotator_b: (*annotator_b).clone(),
                mean_iou: greedy_match_iou(set_a, set_b),
            });
        }
    }

    let scores: Vec<f64> = pairs.iter().filter_map(|pair| pair.mean_iou).collect();
    match mean(&scores) {
        Some(mean_iou) => ImageAgreement::scored(mean_iou, annotator_count, pairs, threshold),
        None => ImageAgreement {
            pairs,
            ..ImageAgreement::undefined(annotator_count)
        },
    }
}

/// Compute the agreement for every image of a dataset.
///
/// Images without a defined score stay in `per_image` and are left out of
/// the overall mean.
pub fn dataset_agreement(images: &ImageAnnotations, threshold: f64) -> DatasetAgreement {
    let per_image: BTreeMap<String, ImageAgreement> = images
        .iter()
        .map(|(image, annotator_rectangles)| {
            (image.clone(), image_agreement(annotator_rectangles, threshold))
        })
        .collect();

    DatasetAgreement {
        mean_iou: mean_defined(per_image.values().map(|image| image.mean_iou)),
        per_image,
    }
}

/// Evaluate the agreement of a loaded annotation store.
///
/// Validates the configuration, resolves reviewer modifications when
/// configured to, groups the records by image and runs
/// [`dataset_agreement`].
pub fn evaluate(store: &AnnotationStore, config: &IaaConfig) -> Result<DatasetAgreement> {
    config.validate()?;

    let images = if config.resolve_modifications {
        group_by_image(store.final_annotations())
    } else {
        group_by_image(&store.annotations)
    };

    let agreement = dataset_agreement(&images, config.iou_threshold);

    match agreement.mean_iou {
        Some(mean_iou) => log::info!(
            "IAA over {} images ({} scored): mean IoU {:.4}, {} below {}",
            agreement.per_image.len(),
            agreement.defined_count(),
            mean_iou,
            agreement.flagged_count(),
            config.iou_threshold
        ),
        None => log::info!(
            "IAA over {} images: no image has two annotators with rectangles",
            agreement.per_image.len()
        ),
    }
    for conflict in agreement.conflicts() {
        log::debug!("conflict on {}: mean IoU {:.4}", conflict.image, conflict.mean_iou);
    }

    Ok(agreement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rectangle;

    fn annotators(entries: &[(&str, Vec<Rectangle>)]) -> AnnotatorRectangles {
        entries
            .iter()
            .map(|(name, rects)| (name.to_string(), rects.clone()))
            .collect()
    }

    fn square(x: f64, y: f64, size: f64) -> Rectangle {
        Rectangle::new(x, y, x + size, y + size)
    }

    #[test]
    fn test_single_annotator_undefined() {
        let rects = annotators(&[("leslie", vec![square(0.0, 0.0, 10.0)])]);
        let result = image_agreement(&rects, 0.5);
        assert_eq!(result.mean_iou, None);
        assert!(!result.flag);
        assert_eq!(result.annotator_count, 1);
    }

    #[test]
    fn test_no_annotators_undefined() {
        let result = image_agreement(&AnnotatorRectangles::new(), 0.5);
        assert_eq!(result, ImageAgreement::undefined(0));
    }

    #[test]
    fn test_identical_annotations() {
        let rects = annotators(&[
            ("leslie", vec![square(0.0, 0.0, 10.0)]),
            ("remi", vec![square(0.0, 0.0, 10.0)]),
        ]);
        let result = image_agreement(&rects, 1.0);
        assert_eq!(result.mean_iou, Some(1.0));
        assert!(!result.flag);
    }

    #[test]
    fn test_threshold_equal_not_flagged() {
        let rects = annotators(&[
            ("leslie", vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)]),
            ("remi", vec![Rectangle::new(0.0, 0.0, 10.0, 5.0)]),
        ]);
        let result = image_agreement(&rects, 0.5);
        assert_eq!(result.mean_iou, Some(0.5));
        assert!(!result.flag);
    }

    #[test]
    fn test_empty_side_skipped_not_zero() {
        let rects = annotators(&[
            ("leslie", vec![square(0.0, 0.0, 10.0)]),
            ("remi", vec![square(0.0, 0.0, 10.0)]),
            ("yvab", vec![]),
        ]);
        let result = image_agreement(&rects, 0.5);
        assert_eq!(result.mean_iou, Some(1.0));
        assert_eq!(result.pairs.len(), 3);
        assert_eq!(result.pairs.iter().filter(|p| p.mean_iou.is_none()).count(), 2);
    }

    #[test]
    fn test_all_but_one_empty_undefined() {
        let rects = annotators(&[
            ("leslie", vec![square(0.0, 0.0, 10.0)]),
            ("remi", vec![]),
            ("yvab", vec![]),
        ]);
        let result = image_agreement(&rects, 0.5);
        assert_eq!(result.mean_iou, None);
        assert!(!result.flag);
        assert_eq!(result.pairs.len(), 3);
    }

    #[test]
    fn test_first_inserted_annotator_drives_matching() {
        let rects = annotators(&[
            ("remi", vec![square(0.0, 0.0, 10.0)]),
            ("leslie", vec![Rectangle::new(5.0, 0.0, 15.0, 10.0), square(0.0, 0.0, 10.0)]),
        ]);
        let result = image_agreement(&rects, 0.5);
        assert_eq!(result.mean_iou, Some(1.0));
        assert_eq!(result.pairs[0].annotator_a, "remi");
        assert_eq!(result.pairs[0].annotator_b, "leslie");

        // Driven by leslie instead, the first box takes the only candidate.
        let swapped = annotators(&[
            ("leslie", vec![Rectangle::new(5.0, 0.0, 15.0, 10.0), square(0.0, 0.0, 10.0)]),
            ("remi", vec![square(0.0, 0.0, 10.0)]),
        ]);
        let result = image_agreement(&swapped, 0.5);
        assert!((result.mean_iou.unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_dataset_excludes_undefined() {
        let mut images = ImageAnnotations::new();
        images.insert(
            "A".to_string(),
            annotators(&[
                ("leslie", vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)]),
                ("remi", vec![Rectangle::new(0.0, 0.0, 10.0, 8.0)]),
            ]),
        );
        images.insert("B".to_string(), annotators(&[("leslie", vec![square(0.0, 0.0, 10.0)])]));

        let result = dataset_agreement(&images, 0.5);
        assert!((result.mean_iou.unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(result.per_image["B"].mean_iou, None);
        assert_eq!(result.per_image.len(), 2);
    }

    #[test]
    fn test_dataset_all_undefined() {
        let mut images = ImageAnnotations::new();
        images.insert("B".to_string(), annotators(&[("leslie", vec![square(0.0, 0.0, 10.0)])]));
        let result = dataset_agreement(&images, 0.5);
        assert_eq!(result.mean_iou, None);
        assert!(result.conflicts().is_empty());
    }

    #[test]
    fn test_conflicts_sorted_and_rethresholded() {
        let mut images = ImageAnnotations::new();
        images.insert(
            "high.jpg".to_string(),
            annotators(&[
                ("leslie", vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)]),
                ("remi", vec![Rectangle::new(0.0, 0.0, 10.0, 8.0)]),
            ]),
        );
        images.insert(
            "low.jpg".to_string(),
            annotators(&[
                ("leslie", vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)]),
                ("remi", vec![Rectangle::new(0.0, 0.0, 10.0, 2.0)]),
            ]),
        );

        let result = dataset_agreement(&images, 0.9);
        let conflicts = result.conflicts();
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].image, "low.jpg");
        assert_eq!(conflicts[1].image, "high.jpg");

        let relaxed = result.with_threshold(0.5);
        assert_eq!(relaxed.flagged_count(), 1);
        assert_eq!(relaxed.conflicts()[0].image, "low.jpg");
        assert_eq!(relaxed.mean_iou, result.mean_iou);
    }
}
