//! Grouping of annotation records by image and TFRecord output.

use anyhow::{ensure, Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tfrecord::{Example, ExampleWriter, Feature, RecordWriterInit};

use crate::label_map::LabelMap;
use crate::types::AnnotationRecord;
use crate::utils::{create_progress_bar, infer_image_format};

/// All annotation records sharing one image filename, in their original
/// object order.
struct ImageGroup<'a> {
    filename: &'a str,
    objects: Vec<&'a AnnotationRecord>,
}

/// Group the flat annotation table by filename, ordered lexicographically.
fn group_by_filename(records: &[AnnotationRecord]) -> Vec<ImageGroup<'_>> {
    let mut groups: BTreeMap<&str, Vec<&AnnotationRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.filename.as_str()).or_default().push(record);
    }
    groups
        .into_iter()
        .map(|(filename, objects)| ImageGroup { filename, objects })
        .collect()
}

/// Write one serialized `tf.train.Example` per distinct image filename.
///
/// Every class label is resolved before the output file is created, so an
/// unknown label aborts the run without leaving a partial record file
/// behind. Returns the number of images written.
pub fn write_tfrecord(
    records: &[AnnotationRecord],
    image_dir: &Path,
    label_map: &LabelMap,
    output_path: &Path,
) -> Result<usize> {
    for record in records {
        label_map.resolve(&record.class)?;
    }

    let groups = group_by_filename(records);
    let mut writer: ExampleWriter<_> = RecordWriterInit::create(output_path)
        .with_context(|| format!("failed to create TFRecord file {}", output_path.display()))?;

    let pb = create_progress_bar(groups.len() as u64, "Write");
    for group in &groups {
        let example = build_example(group, image_dir, label_map)?;
        writer
            .send(example)
            .with_context(|| format!("failed to write record for {}", group.filename))?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        "Successfully created the TFRecord file: {} ({} images)",
        output_path.display(),
        groups.len()
    );
    Ok(groups.len())
}

/// Build the example for one image group.
///
/// Image bytes are passed through opaquely; width and height come from the
/// annotation metadata and are never re-measured from the encoded image.
fn build_example(group: &ImageGroup<'_>, image_dir: &Path, label_map: &LabelMap) -> Result<Example> {
    let image_path = image_dir.join(group.filename);
    let encoded = fs::read(&image_path)
        .with_context(|| format!("failed to read image file {}", image_path.display()))?;
    let format = infer_image_format(&encoded).unwrap_or("png");

    let width = group.objects[0].width;
    let height = group.objects[0].height;
    ensure!(
        width > 0 && height > 0,
        "annotation for {} has zero image dimensions",
        group.filename
    );

    let mut xmins = Vec::with_capacity(group.objects.len());
    let mut xmaxs = Vec::with_capacity(group.objects.len());
    let mut ymins = Vec::with_capacity(group.objects.len());
    let mut ymaxs = Vec::with_capacity(group.objects.len());
    let mut classes_text = Vec::with_capacity(group.objects.len());
    let mut classes = Vec::with_capacity(group.objects.len());

    for object in &group.objects {
        xmins.push((object.xmin as f64 / width as f64) as f32);
        xmaxs.push((object.xmax as f64 / width as f64) as f32);
        ymins.push((object.ymin as f64 / height as f64) as f32);
        ymaxs.push((object.ymax as f64 / height as f64) as f32);
        classes_text.push(object.class.clone().into_bytes());
        classes.push(label_map.resolve(&object.class)?);
    }

    let filename = group.filename.as_bytes().to_vec();
    let example: Example = vec![
        ("image/height".into(), Feature::Int64List(vec![height as i64])),
        ("image/width".into(), Feature::Int64List(vec![width as i64])),
        ("image/filename".into(), Feature::BytesList(vec![filename.clone()])),
        ("image/source_id".into(), Feature::BytesList(vec![filename])),
        ("image/encoded".into(), Feature::BytesList(vec![encoded])),
        (
            "image/format".into(),
            Feature::BytesList(vec![format.as_bytes().to_vec()]),
        ),
        ("image/object/bbox/xmin".into(), Feature::FloatList(xmins)),
        ("image/object/bbox/xmax".into(), Feature::FloatList(xmaxs)),
        ("image/object/bbox/ymin".into(), Feature::FloatList(ymins)),
        ("image/object/bbox/ymax".into(), Feature::FloatList(ymaxs)),
        (
            "image/object/class/text".into(),
            Feature::BytesList(classes_text),
        ),
        (
            "image/object/class/label".into(),
            Feature::Int64List(classes),
        ),
    ]
    .into_iter()
    .collect();

    Ok(example)
}
