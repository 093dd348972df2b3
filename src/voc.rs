//! labelImg / Pascal VOC XML annotation reader.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::AnnotationRecord;
use crate::utils::annotation_files;

// Serde mapping of the XML dialect written by labelImg.
#[derive(Debug, Deserialize)]
struct VocAnnotation {
    filename: String,
    size: VocSize,
    #[serde(rename = "object", default)]
    objects: Vec<VocObject>,
}

#[derive(Debug, Deserialize)]
struct VocSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct VocObject {
    name: String,
    bndbox: VocBndBox,
}

#[derive(Debug, Deserialize)]
struct VocBndBox {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

/// Read every `*.xml` file under `dir` into the flat annotation table.
///
/// Each `object` element yields one record with its box taken verbatim from
/// the file. A file that fails to parse aborts the whole run.
pub fn read_xml_dir(dir: &Path) -> Result<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for path in annotation_files(dir, "xml")? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read annotation file {}", path.display()))?;
        let annotation: VocAnnotation = serde_xml_rs::from_str(&content)
            .with_context(|| format!("failed to parse XML annotation {}", path.display()))?;
        for object in &annotation.objects {
            records.push(AnnotationRecord {
                filename: annotation.filename.clone(),
                width: annotation.size.width,
                height: annotation.size.height,
                class: object.name.clone(),
                centroid: None,
                xmin: object.bndbox.xmin,
                ymin: object.bndbox.ymin,
                xmax: object.bndbox.xmax,
                ymax: object.bndbox.ymax,
            });
        }
    }
    Ok(records)
}
