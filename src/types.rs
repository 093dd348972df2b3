use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One annotated object instance, one row of the flat annotation table.
///
/// Pixel coordinates satisfy `xmin < xmax` and `ymin < ymax`. `centroid` is
/// only populated for records produced from the JSON dialect: the point
/// itself for point shapes, the midpoint of the corners for rectangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub class: String,
    pub centroid: Option<(i64, i64)>,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

// The Shape struct representing one annotated shape in a LabelMe file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Shape {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub group_id: Option<i64>,
    pub shape_type: String,
}

// The ImageAnnotation struct representing one LabelMe sidecar file
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotation {
    pub version: Option<String>,
    pub flags: Option<HashMap<String, bool>>,
    pub shapes: Vec<Shape>,
    pub image_path: String,
    pub image_height: u32,
    pub image_width: u32,
}
