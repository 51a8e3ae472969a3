//! Intersection over Union (IoU) calculation.

use crate::types::Rectangle;

/// Calculate the Intersection over Union (IoU) between two rectangles.
///
/// IoU is defined as the area of intersection divided by the area of union.
/// Rectangles that do not overlap, or that only touch along an edge, score
/// exactly 0.0. A zero-area rectangle scores 0.0 against anything, itself
/// included.
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap).
///
/// # Example
///
/// ```
/// use iaa_eval::metrics::iou::iou;
/// use iaa_eval::types::Rectangle;
///
/// let a = Rectangle::new(10.0, 10.0, 110.0, 110.0);
/// let b = Rectangle::new(20.0, 20.0, 120.0, 120.0);
/// let score = iou(&a, &b);
/// assert!((score - 8100.0 / 11900.0).abs() < 1e-12);
/// ```
pub fn iou(a: &Rectangle, b: &Rectangle) -> f64 {
    let inter_w = (a.x2.min(b.x2) - a.x1.max(b.x1)).max(0.0);
    let inter_h = (a.y2.min(b.y2) - a.y1.max(b.y1)).max(0.0);

    if inter_w <= 0.0 || inter_h <= 0.0 {
        return 0.0;
    }

    let intersection_area = inter_w * inter_h;
    let union_area = a.area() + b.area() - intersection_area;

    if union_area <= 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Calculate the IoU matrix between two sets of rectangles.
///
/// `result[i][j]` is the IoU between `set_a[i]` and `set_b[j]`.
///
/// # Example
///
/// ```
/// use iaa_eval::metrics::iou::iou_matrix;
/// use iaa_eval::types::Rectangle;
///
/// let set_a = vec![Rectangle::new(0.0, 0.0, 10.0, 10.0)];
/// let set_b = vec![Rectangle::new(5.0, 5.0, 15.0, 15.0)];
/// let matrix = iou_matrix(&set_a, &set_b);
/// assert_eq!(matrix.len(), 1);
/// assert_eq!(matrix[0].len(), 1);
/// ```
pub fn iou_matrix(set_a: &[Rectangle], set_b: &[Rectangle]) -> Vec<Vec<f64>> {
    set_a
        .iter()
        .map(|a| set_b.iter().map(|b| iou(a, b)).collect())
        .collect()
}
