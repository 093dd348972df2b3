use anyhow::{Context, Result};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Collect `dir/*.<extension>` in lexicographic order.
///
/// Sorting keeps the record order deterministic for a fixed input set.
pub fn annotation_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.{}", dir.display(), extension);
    let mut files = glob(&pattern)
        .with_context(|| format!("invalid glob pattern {pattern}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list annotation files in {}", dir.display()))?;
    files.sort();
    Ok(files)
}

/// Helper function to infer the image format from its leading magic bytes
pub fn infer_image_format(image_bytes: &[u8]) -> Option<&'static str> {
    if image_bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if image_bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("png")
    } else if image_bytes.starts_with(b"BM") {
        Some("bmp")
    } else if image_bytes.starts_with(&[0x47, 0x49, 0x46]) {
        Some("gif")
    } else {
        None
    }
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .expect("static progress template is valid")
            .progress_chars("#>-"),
    );
    pb
}
