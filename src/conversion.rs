use clap::ValueEnum;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{BoxRecord, LabelRecord};

/// Unit system for label geometry.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Mode {
    /// Geometric fields are pixel counts
    Absolute,
    /// Geometric fields are normalized to [0, 1] by the image dimensions
    Relative,
}

impl FromStr for Mode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absolute" => Ok(Mode::Absolute),
            "relative" => Ok(Mode::Relative),
            _ => Err(TransformError::UnknownMode(s.to_string())),
        }
    }
}

/// Errors raised by the coordinate transforms.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("image dimensions must be non-zero")]
    ZeroDimension,
    #[error("unknown mode '{0}', expected 'absolute' or 'relative'")]
    UnknownMode(String),
    #[error("serialized {lines} lines from {rows} rows")]
    LineCountMismatch { rows: usize, lines: usize },
}

/// Convert center-format labels to corner-format boxes.
///
/// Corners are truncated toward zero, matching an integer cast rather than
/// rounding. Negative widths or heights are not rejected; they come out as
/// swapped corners. Row order is preserved.
pub fn labels_to_boxes(labels: &[LabelRecord]) -> Vec<BoxRecord> {
    labels
        .iter()
        .map(|label| BoxRecord {
            class_id: label.class_id,
            x0: (label.x_center - label.width / 2.0) as i64,
            y0: (label.y_center - label.height / 2.0) as i64,
            x1: (label.x_center + label.width / 2.0) as i64,
            y1: (label.y_center + label.height / 2.0) as i64,
        })
        .collect()
}

/// Convert corner-format boxes back to center-format labels.
///
/// Centers use a ceiling, not truncation, so this is not an exact inverse of
/// [`labels_to_boxes`] when the corner sum is odd. Downstream label files were
/// produced with this bias and existing tile sets depend on it, so it stays.
/// A box with `x1 < x0` yields a negative width without error.
pub fn boxes_to_labels(boxes: &[BoxRecord]) -> Vec<LabelRecord> {
    boxes
        .iter()
        .map(|bbox| LabelRecord {
            class_id: bbox.class_id,
            x_center: ((bbox.x0 + bbox.x1) as f64 / 2.0).ceil(),
            y_center: ((bbox.y0 + bbox.y1) as f64 / 2.0).ceil(),
            width: (bbox.x1 - bbox.x0) as f64,
            height: (bbox.y1 - bbox.y0) as f64,
        })
        .collect()
}

/// Rescale center-format labels between relative and absolute units.
///
/// In `Absolute` mode the x fields scale by `img_width` and the y fields by
/// `img_height`; when `round` is set each geometric field is rounded to the
/// nearest integer with ties to even. In `Relative` mode the fields are
/// divided instead and stay fractional; `round` has no effect. The class id
/// is untouched either way. Both row and column order match the input.
pub fn scale_labels(
    labels: &[LabelRecord],
    mode: Mode,
    img_width: u32,
    img_height: u32,
    round: bool,
) -> Result<Vec<LabelRecord>, TransformError> {
    if img_width == 0 || img_height == 0 {
        return Err(TransformError::ZeroDimension);
    }

    let w = img_width as f64;
    let h = img_height as f64;

    let scaled = match mode {
        Mode::Absolute => labels
            .iter()
            .map(|label| {
                let quantize = |v: f64| if round { v.round_ties_even() } else { v };
                LabelRecord {
                    class_id: label.class_id,
                    x_center: quantize(label.x_center * w),
                    y_center: quantize(label.y_center * h),
                    width: quantize(label.width * w),
                    height: quantize(label.height * h),
                }
            })
            .collect(),
        Mode::Relative => labels
            .iter()
            .map(|label| LabelRecord {
                class_id: label.class_id,
                x_center: label.x_center / w,
                y_center: label.y_center / h,
                width: label.width / w,
                height: label.height / h,
            })
            .collect(),
    };

    Ok(scaled)
}

/// Translate boxes into the local coordinate frame of a tile.
///
/// Subtracts the tile origin from both corners so boxes cut from a larger
/// source image can be compared or drawn against the tile itself.
pub fn shift_to_origin(boxes: &[BoxRecord], origin: (i64, i64)) -> Vec<BoxRecord> {
    let (ox, oy) = origin;
    boxes
        .iter()
        .map(|bbox| BoxRecord {
            class_id: bbox.class_id,
            x0: bbox.x0 - ox,
            y0: bbox.y0 - oy,
            x1: bbox.x1 - ox,
            y1: bbox.y1 - oy,
        })
        .collect()
}

/// A record that renders as one space-separated annotation line.
pub trait Row {
    /// Render the record; the first field is always an integer literal.
    fn to_line(&self) -> String;
}

impl Row for LabelRecord {
    fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

impl Row for BoxRecord {
    fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.class_id, self.x0, self.y0, self.x1, self.y1
        )
    }
}

/// Serialize a table to text lines, one per row.
///
/// The line count is checked against the row count before returning; a
/// mismatch means the conversion pipeline itself is broken, not the input.
pub fn to_lines<R: Row>(rows: &[R]) -> Result<Vec<String>, TransformError> {
    let lines: Vec<String> = rows.iter().map(Row::to_line).collect();

    if lines.len() != rows.len() {
        return Err(TransformError::LineCountMismatch {
            rows: rows.len(),
            lines: lines.len(),
        });
    }

    Ok(lines)
}
