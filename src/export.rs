//! CSV export of the flat annotation table.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::config::InputFormat;
use crate::types::AnnotationRecord;

/// Write one CSV row per annotated object, in reader order.
///
/// The JSON dialect carries shape centroids, so its export has two extra
/// `x,y` columns between `class` and the box bounds.
pub fn write_csv(records: &[AnnotationRecord], format: InputFormat, csv_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(csv_path)
        .with_context(|| format!("failed to create CSV file {}", csv_path.display()))?;

    match format {
        InputFormat::Xml => {
            writer.write_record([
                "filename", "width", "height", "class", "xmin", "ymin", "xmax", "ymax",
            ])?;
            for record in records {
                writer.write_record([
                    record.filename.clone(),
                    record.width.to_string(),
                    record.height.to_string(),
                    record.class.clone(),
                    record.xmin.to_string(),
                    record.ymin.to_string(),
                    record.xmax.to_string(),
                    record.ymax.to_string(),
                ])?;
            }
        }
        InputFormat::Json => {
            writer.write_record([
                "filename", "width", "height", "class", "x", "y", "xmin", "ymin", "xmax", "ymax",
            ])?;
            for record in records {
                let (x, y) = record.centroid.unwrap_or((0, 0));
                writer.write_record([
                    record.filename.clone(),
                    record.width.to_string(),
                    record.height.to_string(),
                    record.class.clone(),
                    x.to_string(),
                    y.to_string(),
                    record.xmin.to_string(),
                    record.ymin.to_string(),
                    record.xmax.to_string(),
                    record.ymax.to_string(),
                ])?;
            }
        }
    }

    writer
        .flush()
        .with_context(|| format!("failed to write CSV file {}", csv_path.display()))?;
    info!("Successfully created the CSV file: {}", csv_path.display());
    Ok(())
}
