use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Command-line arguments for the annotation-to-TFRecord converter.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["xml_dir", "json_dir"])))]
pub struct Args {
    /// Directory containing labelImg XML annotation files
    #[arg(short = 'x', long = "xml_dir")]
    pub xml_dir: Option<PathBuf>,

    /// Directory containing LabelMe JSON annotation files
    #[arg(short = 'j', long = "json_dir")]
    pub json_dir: Option<PathBuf>,

    /// Path to the label map (.pbtxt) file
    #[arg(short = 'l', long = "labels_path")]
    pub labels_path: PathBuf,

    /// Path of the output TFRecord (.record) file
    #[arg(short = 'o', long = "output_path")]
    pub output_path: PathBuf,

    /// Directory containing the image files; defaults to the annotation directory
    #[arg(short = 'i', long = "image_dir")]
    pub image_dir: Option<PathBuf>,

    /// Path of an optional CSV export of the annotation table
    #[arg(short = 'c', long = "csv_path")]
    pub csv_path: Option<PathBuf>,

    /// Pixel margin used to expand point shapes into bounding boxes
    #[arg(long = "point_margin", default_value_t = 15, value_parser = validate_margin)]
    pub point_margin: i64,
}

// Enumeration for the annotation input dialect
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InputFormat {
    Xml,
    Json,
}

impl Args {
    /// The selected annotation directory and its dialect.
    pub fn input(&self) -> (InputFormat, &Path) {
        match (&self.xml_dir, &self.json_dir) {
            (Some(dir), _) => (InputFormat::Xml, dir.as_path()),
            (_, Some(dir)) => (InputFormat::Json, dir.as_path()),
            (None, None) => unreachable!("clap requires one input directory"),
        }
    }

    /// The image directory, falling back to the annotation directory.
    pub fn image_dir(&self) -> &Path {
        match &self.image_dir {
            Some(dir) => dir.as_path(),
            None => self.input().1,
        }
    }
}

// Validate that the point margin is a positive pixel count
fn validate_margin(s: &str) -> Result<i64, String> {
    match i64::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("MARGIN must be a positive integer".to_string()),
    }
}
