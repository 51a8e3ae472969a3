//! Stress tests with large datasets and complex scenarios.

use iaa_eval::agreement::{dataset_agreement, evaluate, image_agreement};
use iaa_eval::config::IaaConfig;
use iaa_eval::matching::greedy_match;
use iaa_eval::types::{
    AnnotationRecord, AnnotationStore, AnnotatorRectangles, CanvasRect, ImageAnnotations, Rectangle,
};

fn create_record(id: u64, image: &str, annotator: &str, rectangles: Vec<CanvasRect>) -> AnnotationRecord {
    AnnotationRecord {
        id,
        image: image.to_string(),
        annotator: annotator.to_string(),
        timestamp: String::new(),
        rectangles,
        is_modification: false,
        modifies_annotation_id: None,
    }
}

fn grid(count: usize, size: f64, offset: f64) -> Vec<Rectangle> {
    (0..count)
        .map(|i| {
            let x = (i % 10) as f64 * 20.0 + offset;
            let y = (i / 10) as f64 * 20.0 + offset;
            Rectangle::new(x, y, x + size, y + size)
        })
        .collect()
}

#[test]
fn test_1000_rectangles_per_annotator() {
    let set_a = grid(1000, 15.0, 0.0);
    let set_b = grid(1000, 15.0, 0.0);

    let matching = greedy_match(&set_a, &set_b);
    assert_eq!(matching.matches.len(), 1000);
    assert!(matching.matches.iter().all(|m| m.index_a == m.index_b));
    assert_eq!(matching.mean_iou(), 1.0);
}

#[test]
fn test_reversed_order_still_pairs_each_box() {
    let set_a = grid(200, 15.0, 0.0);
    let mut set_b = grid(200, 15.0, 1.0);
    set_b.reverse();

    let matching = greedy_match(&set_a, &set_b);
    assert_eq!(matching.matches.len(), 200);
    assert!(matching.unmatched_a.is_empty());

    // Intersection: 14x14 = 196, union: 225 + 225 - 196 = 254
    let expected = 196.0 / 254.0;
    assert!((matching.mean_iou() - expected).abs() < 1e-9);
}

#[test]
fn test_ten_annotators_one_image() {
    let rects: AnnotatorRectangles = (0..10)
        .map(|i| (format!("annotator_{:02}", i), grid(20, 15.0, 0.0)))
        .collect();

    let result = image_agreement(&rects, 0.5);
    assert_eq!(result.pairs.len(), 45);
    assert_eq!(result.mean_iou, Some(1.0));
    assert!(!result.flag);
}

#[test]
fn test_1000_images_mixed_agreement() {
    let mut images = ImageAnnotations::new();

    for image in 0..1000 {
        let mut rects = AnnotatorRectangles::new();
        rects.insert("leslie".to_string(), grid(5, 15.0, 0.0));
        match image % 4 {
            // perfect agreement
            0 => {
                rects.insert("remi".to_string(), grid(5, 15.0, 0.0));
            }
            // no overlap at all
            1 => {
                rects.insert("remi".to_string(), grid(5, 15.0, 1000.0));
            }
            // single annotator
            2 => {}
            // second annotator submitted nothing
            _ => {
                rects.insert("remi".to_string(), Vec::new());
            }
        }
        images.insert(format!("car{:04}.jpg", image), rects);
    }

    let result = dataset_agreement(&images, 0.5);
    assert_eq!(result.per_image.len(), 1000);
    assert_eq!(result.defined_count(), 500);
    assert_eq!(result.flagged_count(), 250);
    assert!((result.mean_iou.unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn test_large_store_evaluation() {
    let mut records = Vec::new();
    let mut id = 0u64;

    for image in 0..100 {
        for annotator in ["leslie", "remi", "yvab"] {
            id += 1;
            let shift = if annotator == "yvab" { 2.0 } else { 0.0 };
            let rectangles = (0..10)
                .map(|i| CanvasRect::new(i as f64 * 30.0 + shift, 0.0, 20.0, 20.0))
                .collect();
            records.push(create_record(id, &format!("car{}.jpg", image), annotator, rectangles));
        }
    }

    let store = AnnotationStore::from_records(records);
    let result = evaluate(&store, &IaaConfig::default()).unwrap();

    // leslie-remi 1.0; against yvab: 18x20 = 360 / (400 + 400 - 360)
    let shifted = 360.0 / 440.0;
    let expected = (1.0 + 2.0 * shifted) / 3.0;
    assert_eq!(result.per_image.len(), 100);
    assert!((result.mean_iou.unwrap() - expected).abs() < 1e-12);
    assert!(result.conflicts().is_empty());
}
