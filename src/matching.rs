//! Greedy one-to-one matching of rectangles drawn by two annotators.

use crate::metrics::iou::iou;
use crate::types::{AnnotationRecord, ImageAnnotations, Rectangle};

/// A pair of rectangles committed to each other by the matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectMatch {
    pub index_a: usize,
    pub index_b: usize,
    pub iou: f64,
}

/// Result of greedily matching two rectangle sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GreedyMatching {
    /// Matches in the order they were made (the order of `set_a`).
    pub matches: Vec<RectMatch>,
    /// Indices into `set_a` that found no overlapping partner.
    pub unmatched_a: Vec<usize>,
    /// Indices into `set_b` that were never consumed.
    pub unmatched_b: Vec<usize>,
}

impl GreedyMatching {
    /// Mean IoU over the matched pairs, 0.0 when nothing matched.
    pub fn mean_iou(&self) -> f64 {
        if self.matches.is_empty() {
            return 0.0;
        }
        let total: f64 = self.matches.iter().map(|m| m.iou).sum();
        total / self.matches.len() as f64
    }
}

/// Greedily match `set_a` against `set_b`.
///
/// Each rectangle of `set_a`, in order, takes the unused rectangle of `set_b`
/// with the strictly greatest positive IoU. Ties go to the lowest index in
/// `set_b`. A pairing is never revisited, so the result is not a globally
/// optimal assignment.
pub fn greedy_match(set_a: &[Rectangle], set_b: &[Rectangle]) -> GreedyMatching {
    let mut used_b = vec![false; set_b.len()];
    let mut matching = GreedyMatching::default();

    for (index_a, a) in set_a.iter().enumerate() {
        let mut best_iou = 0.0;
        let mut best_b: Option<usize> = None;

        for (index_b, b) in set_b.iter().enumerate() {
            if used_b[index_b] {
                continue;
            }

            let score = iou(a, b);
            if score > best_iou {
                best_iou = score;
                best_b = Some(index_b);
            }
        }

        match best_b {
            Some(index_b) => {
                used_b[index_b] = true;
                matching.matches.push(RectMatch {
                    index_a,
                    index_b,
                    iou: best_iou,
                });
            }
            None => matching.unmatched_a.push(index_a),
        }
    }

    matching.unmatched_b = used_b
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(index_b, _)| index_b)
        .collect();

    matching
}

/// Mean IoU of the greedy one-to-one matching between two rectangle sets.
///
/// Returns `None` when either set is empty. When both sets are non-empty but
/// nothing overlaps, the score is a genuine `Some(0.0)`.
///
/// # Example
///
/// ```
/// use iaa_eval::matching::greedy_match_iou;
/// use iaa_eval::types::Rectangle;
///
/// let a = vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)];
/// let b = vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)];
/// assert_eq!(greedy_match_iou(&a, &b), Some(1.0));
/// assert_eq!(greedy_match_iou(&a, &[]), None);
/// ```
pub fn greedy_match_iou(set_a: &[Rectangle], set_b: &[Rectangle]) -> Option<f64> {
    if set_a.is_empty() || set_b.is_empty() {
        return None;
    }
    Some(greedy_match(set_a, set_b).mean_iou())
}

/// Group records into `image -> annotator -> rectangles`.
///
/// Annotators of an image keep the order of their first record. A later
/// record from the same annotator on the same image replaces the earlier
/// rectangles without moving the annotator. Records without rectangles
/// still register their annotator.
pub fn group_by_image<'a, I>(records: I) -> ImageAnnotations
where
    I: IntoIterator<Item = &'a AnnotationRecord>,
{
    let mut groups = ImageAnnotations::new();

    for record in records {
        groups
            .entry(record.image.clone())
            .or_default()
            .insert(record.annotator.clone(), record.to_rectangles());
    }

    groups
}
