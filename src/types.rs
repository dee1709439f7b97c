use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use thiserror::Error;

// Supported image formats for dataset images
pub const IMG_FORMATS: &[&str] = &["bmp", "jpeg", "jpg", "png", "tif", "tiff", "webp"];

/// A detection in center format: class + center point + width + height.
///
/// The geometric fields carry either relative units in `[0, 1]` or absolute
/// pixel counts, depending on which side of `scale_labels` the record sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub class_id: i64,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// A detection in corner format: class + two opposite corners, absolute pixels.
///
/// `x0 <= x1` and `y0 <= y1` hold for well-formed input only; the conversions
/// never enforce them, so malformed geometry passes through with swapped
/// corners and negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRecord {
    pub class_id: i64,
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

/// Errors raised while parsing an annotation line into a [`LabelRecord`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("expected 5 space-separated fields, got {0}")]
    FieldCount(usize),
    #[error("invalid class id: {0}")]
    ClassId(#[from] ParseIntError),
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] ParseFloatError),
}

impl FromStr for LabelRecord {
    type Err = ParseError;

    /// Parse one annotation line: `class_id x_center y_center width height`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [class_id, x_center, y_center, width, height] = fields.as_slice() else {
            return Err(ParseError::FieldCount(fields.len()));
        };
        Ok(LabelRecord {
            class_id: class_id.parse()?,
            x_center: x_center.parse()?,
            y_center: y_center.parse()?,
            width: width.parse()?,
            height: height.parse()?,
        })
    }
}

// Struct to hold processing statistics for one split run
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub total_files_processed: usize,
    pub successful_conversions: usize,
    pub skipped_missing_image: usize,
    pub failed_conversions: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total(&mut self) {
        self.total_files_processed += 1;
    }

    pub fn increment_successful(&mut self) {
        self.successful_conversions += 1;
    }

    pub fn increment_skipped_missing_image(&mut self) {
        self.skipped_missing_image += 1;
    }

    pub fn increment_failed(&mut self) {
        self.failed_conversions += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total label files processed: {}", self.total_files_processed);
        log::info!("Successful conversions: {}", self.successful_conversions);
        log::info!("Skipped (missing image file): {}", self.skipped_missing_image);
        log::info!("Failed conversions: {}", self.failed_conversions);

        if self.skipped_missing_image > 0 {
            log::warn!(
                "{} label files had no matching image and were skipped",
                self.skipped_missing_image
            );
        }
    }
}
