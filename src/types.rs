//! Core data types for rectangles and the annotation store.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

/// Per-annotator rectangles for every image, keyed by image id.
pub type ImageAnnotations = BTreeMap<String, AnnotatorRectangles>;

/// An axis-aligned rectangle in corner format (x1, y1, x2, y2).
///
/// Coordinates are in the pixel space of the source image, with
/// `x1 <= x2` and `y1 <= y2` for well-formed boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rectangle {
    /// Create a rectangle from corner coordinates, taken as given.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from corners in any order, so that `x1 <= x2` and `y1 <= y2`.
    pub fn from_corners(xa: f64, ya: f64, xb: f64, yb: f64) -> Self {
        Self {
            x1: xa.min(xb),
            y1: ya.min(yb),
            x2: xa.max(xb),
            y2: ya.max(yb),
        }
    }

    /// Create a rectangle from LTWH format (left, top, width, height).
    ///
    /// Negative width or height is flipped into a well-formed box.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check whether the rectangle has zero (or negative) width or height.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Check that all four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Convert back to LTWH format: [x, y, width, height].
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.x1, self.y1, self.width(), self.height()]
    }
}

/// A rectangle as stored by the drawing canvas, in LTWH format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Display colour of the annotator; ignored by the agreement computations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CanvasRect {
    /// Create a new canvas rectangle without colour.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color: None,
        }
    }

    /// Normalise into a corner-format [`Rectangle`].
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::from_xywh(self.x, self.y, self.width, self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// One annotation record: the rectangles an annotator drew on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: u64,
    pub image: String,
    pub annotator: String,
    /// ISO-8601 timestamp of the submission.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub rectangles: Vec<CanvasRect>,
    /// Set when this record is a reviewer's replacement for another record.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_modification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifies_annotation_id: Option<u64>,
}

impl AnnotationRecord {
    /// Convert the stored canvas rectangles to corner-format rectangles.
    pub fn to_rectangles(&self) -> Vec<Rectangle> {
        self.rectangles.iter().map(CanvasRect::to_rectangle).collect()
    }
}

/// Bookkeeping header of the annotation store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub next_id: u64,
}

/// Rectangles drawn by each annotator on one image.
///
/// Annotators keep the order in which they were first inserted. Inserting
/// an annotator again replaces their rectangles in place, so the first
/// submitter on an image always drives its pairwise matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatorRectangles {
    entries: Vec<(String, Vec<Rectangle>)>,
}

impl AnnotatorRectangles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rectangles of an annotator, returning the ones replaced.
    pub fn insert(&mut self, annotator: String, rectangles: Vec<Rectangle>) -> Option<Vec<Rectangle>> {
        match self.entries.iter_mut().find(|(name, _)| *name == annotator) {
            Some((_, slot)) => Some(std::mem::replace(slot, rectangles)),
            None => {
                self.entries.push((annotator, rectangles));
                None
            }
        }
    }

    pub fn get(&self, annotator: &str) -> Option<&Vec<Rectangle>> {
        self.entries
            .iter()
            .find(|(name, _)| name == annotator)
            .map(|(_, rectangles)| rectangles)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Annotators and their rectangles in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Rectangle>)> {
        self.entries.iter().map(|(name, rectangles)| (name, rectangles))
    }

    /// Annotator ids in first-insertion order.
    pub fn annotators(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, Vec<Rectangle>)> for AnnotatorRectangles {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Rectangle>)>>(iter: I) -> Self {
        let mut rects = Self::new();
        for (annotator, rectangles) in iter {
            rects.insert(annotator, rectangles);
        }
        rects
    }
}

impl Index<&str> for AnnotatorRectangles {
    type Output = Vec<Rectangle>;

    fn index(&self, annotator: &str) -> &Vec<Rectangle> {
        match self.get(annotator) {
            Some(rectangles) => rectangles,
            None => panic!("no rectangles for annotator {annotator:?}"),
        }
    }
}

/// The complete annotation store as persisted on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StoreMetadata>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
}

impl AnnotationStore {
    /// Create a store from a list of records, without metadata.
    pub fn from_records(annotations: Vec<AnnotationRecord>) -> Self {
        Self {
            metadata: None,
            annotations,
        }
    }

    /// Records belonging to one image, in store order.
    pub fn records_for_image<'a>(&'a self, image: &'a str) -> impl Iterator<Item = &'a AnnotationRecord> + 'a {
        self.annotations.iter().filter(move |ann| ann.image == image)
    }

    /// Resolve the final view of the store.
    ///
    /// Every original record is kept in store order, replaced by its most
    /// recent modification when one exists. On equal timestamps the first
    /// modification in store order wins.
    pub fn final_annotations(&self) -> Vec<&AnnotationRecord> {
        let mut latest: HashMap<u64, &AnnotationRecord> = HashMap::new();
        for ann in self.annotations.iter().filter(|ann| ann.is_modification) {
            let Some(target) = ann.modifies_annotation_id else {
                continue;
            };
            let newer = latest
                .get(&target)
                .map_or(true, |current| ann.timestamp > current.timestamp);
            if newer {
                latest.insert(target, ann);
            }
        }

        self.annotations
            .iter()
            .filter(|ann| !ann.is_modification)
            .map(|original| latest.get(&original.id).copied().unwrap_or(original))
            .collect()
    }
}
