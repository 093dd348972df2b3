//! LabelMe JSON annotation reader.

use anyhow::{ensure, Context, Result};
use log::debug;
use std::fs::File;
use std::path::Path;

use crate::types::{AnnotationRecord, ImageAnnotation, Shape};
use crate::utils::annotation_files;

/// Read every `*.json` file under `dir` into the flat annotation table.
///
/// Point shapes become boxes by expanding the point by `point_margin` pixels
/// in every direction; rectangle shapes become the axis-aligned envelope of
/// their two corner points. Any other shape kind contributes no record.
pub fn read_json_dir(dir: &Path, point_margin: i64) -> Result<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for path in annotation_files(dir, "json")? {
        let file = File::open(&path)
            .with_context(|| format!("failed to open annotation file {}", path.display()))?;
        let annotation: ImageAnnotation = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse JSON annotation {}", path.display()))?;
        for shape in &annotation.shapes {
            let record = shape_to_record(&annotation, shape, point_margin)
                .with_context(|| format!("bad shape in {}", path.display()))?;
            match record {
                Some(record) => records.push(record),
                None => debug!(
                    "skipping shape kind '{}' in {}",
                    shape.shape_type,
                    path.display()
                ),
            }
        }
    }
    Ok(records)
}

/// Convert one LabelMe shape into an annotation record.
///
/// Returns `Ok(None)` for shape kinds the converter does not understand.
/// Coordinates are truncated to integers, matching the pixel grid of the
/// source image.
fn shape_to_record(
    annotation: &ImageAnnotation,
    shape: &Shape,
    point_margin: i64,
) -> Result<Option<AnnotationRecord>> {
    let (centroid, (xmin, ymin, xmax, ymax)) = match shape.shape_type.as_str() {
        "point" => {
            ensure!(
                !shape.points.is_empty(),
                "point shape '{}' has no points",
                shape.label
            );
            let (x, y) = (shape.points[0].0 as i64, shape.points[0].1 as i64);
            (
                (x, y),
                (
                    x - point_margin,
                    y - point_margin,
                    x + point_margin,
                    y + point_margin,
                ),
            )
        }
        "rectangle" => {
            ensure!(
                shape.points.len() >= 2,
                "rectangle shape '{}' needs two corner points",
                shape.label
            );
            let (x0, y0) = shape.points[0];
            let (x1, y1) = shape.points[1];
            (
                (((x0 + x1) / 2.0) as i64, ((y0 + y1) / 2.0) as i64),
                (
                    x0.min(x1) as i64,
                    y0.min(y1) as i64,
                    x0.max(x1) as i64,
                    y0.max(y1) as i64,
                ),
            )
        }
        _ => return Ok(None),
    };

    Ok(Some(AnnotationRecord {
        filename: annotation.image_path.clone(),
        width: annotation.image_width,
        height: annotation.image_height,
        class: shape.label.clone(),
        centroid: Some(centroid),
        xmin,
        ymin,
        xmax,
        ymax,
    }))
}
