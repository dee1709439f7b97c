use clap::Parser;
use std::path::PathBuf;

use crate::conversion::Mode;
use crate::naming::Split;

/// Command-line arguments for rescaling tiled YOLO label files.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root directory of the raw dataset export
    #[arg(short = 'r', long = "raw_root")]
    pub raw_root: PathBuf,

    /// Root directory for the processed dataset tree
    #[arg(short = 'p', long = "processed_root")]
    pub processed_root: PathBuf,

    /// Dataset split to process
    #[arg(long = "split", value_enum, default_value = "train")]
    pub split: Split,

    /// Target unit system for the converted labels
    #[arg(long = "mode", value_enum, default_value = "absolute")]
    pub mode: Mode,

    /// Keep fractional values instead of rounding to whole pixels
    #[arg(long = "no_round")]
    pub no_round: bool,

    /// Render bounding-box overlays for each converted file
    #[arg(long = "preview")]
    pub preview: bool,
}
