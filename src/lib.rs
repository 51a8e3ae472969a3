//! # iaa-eval
//!
//! Inter-annotator agreement (IAA) for bounding-box annotations.
//!
//! Several people draw rectangles around the cars in the same image. This
//! library measures how much they agree:
//! - **IoU** (Intersection over Union) between two rectangles
//! - **Greedy matching** of two annotators' rectangles, scored by mean matched IoU
//! - **Per-image agreement**: mean over every pair of annotators, flagged below a threshold
//! - **Dataset agreement**: mean over images, plus the list of conflicting images
//!
//! Missing data is never turned into a zero: an image with fewer than two
//! annotators, or where nobody but one person drew anything, has an
//! undefined (`None`) score and is left out of every average.
//!
//! ## Quick Start
//!
//! ```rust
//! use iaa_eval::{evaluate, load_from_string, IaaConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = load_from_string(r#"{
//!     "annotations": [
//!         {"id": 1, "image": "car1.jpg", "annotator": "leslie",
//!          "rectangles": [{"x": 10, "y": 10, "width": 100, "height": 100}]},
//!         {"id": 2, "image": "car1.jpg", "annotator": "remi",
//!          "rectangles": [{"x": 20, "y": 20, "width": 100, "height": 100}]}
//!     ]
//! }"#)?;
//!
//! let report = evaluate(&store, &IaaConfig::default())?;
//! println!("mean IoU: {:.4}", report.mean_iou.unwrap_or_default());
//! for conflict in report.conflicts() {
//!     println!("{} needs review ({:.2})", conflict.image, conflict.mean_iou);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Annotation store format
//!
//! ```json
//! {
//!   "metadata": {"version": "1.0", "next_id": 3},
//!   "annotations": [
//!     {
//!       "id": 1,
//!       "image": "car1.jpg",
//!       "annotator": "leslie",
//!       "timestamp": "2024-05-01T10:00:00",
//!       "rectangles": [{"x": 10, "y": 10, "width": 100, "height": 100}]
//!     },
//!     {
//!       "id": 2,
//!       "image": "car1.jpg",
//!       "annotator": "yvab",
//!       "timestamp": "2024-05-02T08:00:00",
//!       "rectangles": [{"x": 12, "y": 10, "width": 98, "height": 100}],
//!       "is_modification": true,
//!       "modifies_annotation_id": 1
//!     }
//!   ]
//! }
//! ```

pub mod error;
pub mod types;
pub mod loader;
pub mod config;
pub mod threshold;
pub mod metrics;
pub mod matching;
pub mod agreement;
pub mod stats;

// Re-export commonly used types and functions
pub use error::{IaaError, Result};
pub use types::{
    AnnotationRecord, AnnotationStore, AnnotatorRectangles, CanvasRect, ImageAnnotations,
    Rectangle, StoreMetadata,
};
pub use loader::{load_from_file, load_from_string};
pub use config::{IaaConfig, ThresholdSweep};
pub use metrics::iou::iou;
pub use matching::{greedy_match, greedy_match_iou, group_by_image, GreedyMatching, RectMatch};
pub use agreement::{
    dataset_agreement, evaluate, image_agreement, Conflict, DatasetAgreement, ImageAgreement,
    PairAgreement,
};
pub use threshold::{flag_sweep, generate_threshold_range, validate_threshold};
pub use stats::{AnnotationStats, AnnotatorStats};
