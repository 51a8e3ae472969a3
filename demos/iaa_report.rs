//! Agreement report for an annotation store.
//!
//! Usage: `cargo run --example iaa_report -- <annotations.json> [config.json]`
//!
//! Without arguments a small built-in store is evaluated. Set `RUST_LOG=debug`
//! to see every flagged image.

use iaa_eval::{
    evaluate, flag_sweep, load_from_file, load_from_string, AnnotationStats, IaaConfig,
};

const SAMPLE_STORE: &str = r#"{
    "annotations": [
        {"id": 1, "image": "car1.jpg", "annotator": "leslie", "timestamp": "2024-05-01T10:00:00",
         "rectangles": [{"x": 10, "y": 10, "width": 100, "height": 100}]},
        {"id": 2, "image": "car1.jpg", "annotator": "remi", "timestamp": "2024-05-01T10:01:00",
         "rectangles": [{"x": 20, "y": 20, "width": 100, "height": 100}]},
        {"id": 3, "image": "car2.jpg", "annotator": "leslie", "timestamp": "2024-05-01T10:02:00",
         "rectangles": [{"x": 200, "y": 100, "width": 300, "height": 150}]},
        {"id": 4, "image": "car2.jpg", "annotator": "demo", "timestamp": "2024-05-01T10:03:00",
         "rectangles": [{"x": 300, "y": 150, "width": 100, "height": 120}]},
        {"id": 5, "image": "car3.jpg", "annotator": "remi", "timestamp": "2024-05-01T10:04:00",
         "rectangles": [{"x": 50, "y": 200, "width": 150, "height": 80}]}
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store = match args.first() {
        Some(path) => load_from_file(path)?,
        None => load_from_string(SAMPLE_STORE)?,
    };
    let config = match args.get(1) {
        Some(path) => IaaConfig::from_file(path)?,
        None => IaaConfig::default(),
    };

    AnnotationStats::from_records(&store.annotations).log_summary();

    let report = evaluate(&store, &config)?;

    println!("=== Inter-Annotator Agreement ===\n");
    match report.mean_iou {
        Some(mean_iou) => println!("Dataset mean IoU: {:.4}", mean_iou),
        None => println!("Dataset mean IoU: n/a (no image has two annotators)"),
    }
    println!();

    for (image, agreement) in &report.per_image {
        let score = agreement
            .mean_iou
            .map(|mean_iou| format!("{:.4}", mean_iou))
            .unwrap_or_else(|| "n/a".to_string());
        let marker = if agreement.flag { "  <-- below threshold" } else { "" };
        println!(
            "  {:<16} annotators: {:>2}  mean IoU: {:>6}{}",
            image, agreement.annotator_count, score, marker
        );
    }

    println!("\nFlagged images per threshold:");
    for (threshold, flagged) in flag_sweep(&report, &config.sweep.thresholds()?) {
        println!("  {:.2}: {}", threshold, flagged);
    }

    Ok(())
}
