//! Dataset preparation helpers for tiled YOLO object-detection datasets
//!
//! This library converts center-format label tables between relative and
//! absolute units, builds per-file paths following the raw/processed dataset
//! tree convention, and renders bounding-box previews onto images.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod io;
pub mod naming;
pub mod plot;
pub mod sanitize;
pub mod timing;
pub mod types;

// Re-export commonly used types and functions
pub use config::Args;
pub use conversion::{
    boxes_to_labels, labels_to_boxes, scale_labels, shift_to_origin, to_lines, Mode, Row,
    TransformError,
};
pub use dataset::process_split;
pub use io::{
    create_output_directory, empty_directory, read_label_file, write_label_file, IoError,
};
pub use naming::{DatasetLayout, Direction, FileKind, NamingError, Split, TileGrid, TileNamer};
pub use plot::{class_color, draw_boxes, draw_centroids};
pub use sanitize::{sanitize_fragment, sanitize_stem};
pub use timing::{log_timestamp, time_it};
pub use types::{BoxRecord, LabelRecord, ParseError, ProcessingStats};
