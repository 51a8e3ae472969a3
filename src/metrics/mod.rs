//! Metric primitives for agreement computation.

pub mod iou;
pub mod average;

pub use iou::{iou, iou_matrix};
pub use average::{mean, mean_defined};
