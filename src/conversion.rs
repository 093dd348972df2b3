use anyhow::{ensure, Result};
use log::{info, warn};

use crate::config::{Args, InputFormat};
use crate::export::write_csv;
use crate::label_map::LabelMap;
use crate::labelme::read_json_dir;
use crate::record::write_tfrecord;
use crate::voc::read_xml_dir;

/// Run one conversion batch as described by the command-line arguments.
///
/// The run either completes or aborts on the first unrecoverable error;
/// there is no per-file isolation or partial-success mode.
pub fn run(args: &Args) -> Result<()> {
    let (format, annotation_dir) = args.input();
    ensure!(
        annotation_dir.is_dir(),
        "annotation directory {} does not exist",
        annotation_dir.display()
    );

    // Load the label map first so a bad file fails the run before any
    // annotation is parsed or output written.
    let label_map = LabelMap::load(&args.labels_path)?;
    info!(
        "Loaded {} labels from {}",
        label_map.len(),
        args.labels_path.display()
    );

    let records = match format {
        InputFormat::Xml => read_xml_dir(annotation_dir)?,
        InputFormat::Json => read_json_dir(annotation_dir, args.point_margin)?,
    };
    info!(
        "Read {} annotated objects from {}",
        records.len(),
        annotation_dir.display()
    );
    if records.is_empty() {
        warn!("no annotations found in {}", annotation_dir.display());
    }

    write_tfrecord(&records, args.image_dir(), &label_map, &args.output_path)?;

    if let Some(csv_path) = &args.csv_path {
        write_csv(&records, format, csv_path)?;
    }

    Ok(())
}
