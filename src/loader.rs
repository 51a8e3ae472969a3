//! JSON loading utilities for the annotation store.

use crate::error::{IaaError, Result};
use crate::types::AnnotationStore;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load an annotation store from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a record
/// fails validation.
///
/// # Example
///
/// ```no_run
/// use iaa_eval::loader::load_from_file;
///
/// let store = load_from_file("data/annotations.json").unwrap();
/// println!("Loaded {} annotations", store.annotations.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<AnnotationStore> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let store: AnnotationStore = serde_json::from_reader(reader)?;

    validate_store(&store)?;
    log::debug!("loaded {} annotation records from {}", store.annotations.len(), path.display());

    Ok(store)
}

/// Load an annotation store from a JSON string.
///
/// # Example
///
/// ```
/// use iaa_eval::loader::load_from_string;
///
/// let json = r#"{
///     "annotations": [
///         {"id": 1, "image": "car1.jpg", "annotator": "leslie",
///          "timestamp": "2024-05-01T10:00:00",
///          "rectangles": [{"x": 10, "y": 10, "width": 100, "height": 100}]}
///     ]
/// }"#;
/// let store = load_from_string(json).unwrap();
/// assert_eq!(store.annotations.len(), 1);
/// ```
pub fn load_from_string(json_str: &str) -> Result<AnnotationStore> {
    let store: AnnotationStore = serde_json::from_str(json_str)?;
    validate_store(&store)?;
    log::debug!("loaded {} annotation records", store.annotations.len());
    Ok(store)
}

/// Validate that every record is usable by the agreement computations.
fn validate_store(store: &AnnotationStore) -> Result<()> {
    let mut seen_ids = HashSet::new();

    for annotation in &store.annotations {
        if !seen_ids.insert(annotation.id) {
            return Err(IaaError::InvalidAnnotation(format!(
                "Duplicate annotation id {}",
                annotation.id
            )));
        }

        if annotation.image.trim().is_empty() {
            return Err(IaaError::InvalidAnnotation(format!(
                "Annotation {} has an empty image name",
                annotation.id
            )));
        }

        if annotation.annotator.trim().is_empty() {
            return Err(IaaError::InvalidAnnotation(format!(
                "Annotation {} has an empty annotator",
                annotation.id
            )));
        }

        if let Some(index) = annotation.rectangles.iter().position(|rect| !rect.is_finite()) {
            return Err(IaaError::InvalidRectangle(format!(
                "Annotation {} rectangle {} has non-finite coordinates",
                annotation.id, index
            )));
        }
    }

    Ok(())
}
