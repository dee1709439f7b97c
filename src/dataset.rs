use glob::glob;
use image::image_dimensions;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::config::Args;
use crate::conversion::{labels_to_boxes, scale_labels, Mode};
use crate::io::{create_output_directory, read_label_file, write_label_file};
use crate::naming::{DatasetLayout, Direction, FileKind, NamingError, Split};
use crate::plot::draw_boxes;
use crate::sanitize::sanitize_stem;
use crate::types::{LabelRecord, ProcessingStats, IMG_FORMATS};

type FileError = Box<dyn std::error::Error + Send + Sync>;

enum FileOutcome {
    Converted,
    SkippedMissingImage,
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
            .progress_chars("#>-"),
    );
    pb
}

/// Convert every label file of one split to the requested unit system.
///
/// Raw labels are expected in relative units, one file per image under
/// `{raw_root}/{split}/labels/`. Converted files land under the processed
/// tree in the same layout; per-file failures are logged and counted, the
/// run continues.
pub fn process_split(args: &Args) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    let layout = DatasetLayout::new(&args.raw_root, &args.processed_root);

    let labels_in = layout.dir(Direction::In, args.split, FileKind::Label);
    if !labels_in.exists() {
        return Err(format!("label directory does not exist: {}", labels_in.display()).into());
    }

    create_output_directory(&layout.dir(Direction::Out, args.split, FileKind::Label))?;
    if args.preview {
        create_output_directory(&layout.dir(Direction::Out, args.split, FileKind::Image))?;
    }

    let pattern = format!("{}/*.txt", labels_in.display());
    let label_files: Vec<PathBuf> = glob(&pattern)?.filter_map(|entry| entry.ok()).collect();
    info!(
        "Found {} label files in {}",
        label_files.len(),
        labels_in.display()
    );

    let pb = create_progress_bar(label_files.len() as u64, args.split.dir_name());

    let outcomes: Vec<Option<FileOutcome>> = label_files
        .par_iter()
        .map(|path| {
            let outcome = match process_label_file(path, &layout, args) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    error!("Failed to process {}: {}", path.display(), e);
                    None
                }
            };
            pb.inc(1);
            outcome
        })
        .collect();
    pb.finish_with_message("processing complete");

    let mut stats = ProcessingStats::new();
    for outcome in outcomes {
        stats.increment_total();
        match outcome {
            Some(FileOutcome::Converted) => stats.increment_successful(),
            Some(FileOutcome::SkippedMissingImage) => stats.increment_skipped_missing_image(),
            None => stats.increment_failed(),
        }
    }

    Ok(stats)
}

fn process_label_file(
    path: &Path,
    layout: &DatasetLayout,
    args: &Args,
) -> Result<FileOutcome, FileError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("label file has no UTF-8 stem: {}", path.display()))?;

    let Some(image_path) = find_image(layout, args.split, stem)? else {
        return Ok(FileOutcome::SkippedMissingImage);
    };

    let labels = read_label_file(path)?;
    let (img_width, img_height) = image_dimensions(&image_path)?;
    let scaled = scale_labels(&labels, args.mode, img_width, img_height, !args.no_round)?;

    let out_path = layout.file(
        Direction::Out,
        args.split,
        FileKind::Label,
        "",
        &sanitize_stem(stem),
    )?;
    write_label_file(&out_path, &scaled)?;

    if args.preview {
        render_preview(&image_path, &labels, img_width, img_height, layout, args, stem)?;
    }

    Ok(FileOutcome::Converted)
}

/// Locate the image belonging to a label file.
///
/// The layout convention names images `.jpg`; exports occasionally carry
/// other formats, so the remaining known extensions are probed as a
/// fallback before the file counts as missing.
fn find_image(
    layout: &DatasetLayout,
    split: Split,
    stem: &str,
) -> Result<Option<PathBuf>, NamingError> {
    let primary = layout.file(Direction::In, split, FileKind::Image, "", stem)?;
    if primary.exists() {
        return Ok(Some(primary));
    }

    for ext in IMG_FORMATS {
        let candidate = primary.with_extension(ext);
        if candidate.exists() {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}

fn render_preview(
    image_path: &Path,
    labels: &[LabelRecord],
    img_width: u32,
    img_height: u32,
    layout: &DatasetLayout,
    args: &Args,
    stem: &str,
) -> Result<(), FileError> {
    let mut image = image::open(image_path)?.to_rgb8();

    // Overlays need pixel geometry whatever the output mode of the run
    let absolute = scale_labels(labels, Mode::Absolute, img_width, img_height, true)?;
    let boxes = labels_to_boxes(&absolute);
    draw_boxes(&mut image, &boxes, (0, 0));

    let preview_path = layout.file(
        Direction::Out,
        args.split,
        FileKind::Image,
        "",
        &sanitize_stem(stem),
    )?;
    image.save(&preview_path)?;

    Ok(())
}
