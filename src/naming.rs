use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::sanitize::sanitize_fragment;

// Marker separating a Roboflow export's base name from its hash tail
const RF_MARKER: &str = ".rf.";

/// Dataset split a file belongs to.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test => "test",
        }
    }
}

impl FromStr for Split {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "valid" => Ok(Split::Valid),
            "test" => Ok(Split::Test),
            _ => Err(NamingError::InvalidSplit(s.to_string())),
        }
    }
}

/// Kind of dataset file: an image or its label sidecar.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FileKind {
    Image,
    Label,
}

impl FileKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            FileKind::Image => "images",
            FileKind::Label => "labels",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Image => "jpg",
            FileKind::Label => "txt",
        }
    }
}

impl FromStr for FileKind {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(FileKind::Image),
            "label" => Ok(FileKind::Label),
            _ => Err(NamingError::InvalidFileKind(s.to_string())),
        }
    }
}

/// Whether a path points into the raw input tree or the processed output tree.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    In,
    Out,
}

impl FromStr for Direction {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(NamingError::InvalidDirection(s.to_string())),
        }
    }
}

/// Errors raised by the naming layer.
#[derive(Error, Debug)]
pub enum NamingError {
    #[error("invalid split '{0}': must be 'train', 'valid', or 'test'")]
    InvalidSplit(String),
    #[error("invalid file kind '{0}': must be 'image' or 'label'")]
    InvalidFileKind(String),
    #[error("invalid direction '{0}': must be 'in' or 'out'")]
    InvalidDirection(String),
    #[error("file name '{0}' is empty after sanitization")]
    EmptyName(String),
    #[error("tile grid must have at least one column")]
    ZeroColumns,
}

/// Root directories of the raw and processed dataset trees.
///
/// Every path the crate touches derives from this layout; nothing reads a
/// process-wide constant. Files live under
/// `{root}/{split}/{images|labels}/{filename}`.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    raw_root: PathBuf,
    processed_root: PathBuf,
}

impl DatasetLayout {
    pub fn new(raw_root: impl Into<PathBuf>, processed_root: impl Into<PathBuf>) -> Self {
        Self {
            raw_root: raw_root.into(),
            processed_root: processed_root.into(),
        }
    }

    fn root(&self, direction: Direction) -> &Path {
        match direction {
            Direction::In => &self.raw_root,
            Direction::Out => &self.processed_root,
        }
    }

    /// Directory holding one kind of file for one split.
    pub fn dir(&self, direction: Direction, split: Split, kind: FileKind) -> PathBuf {
        self.root(direction)
            .join(split.dir_name())
            .join(kind.dir_name())
    }

    /// Full path for one dataset file, with the tile prefix spliced in.
    ///
    /// Roboflow exports name files `{base}.rf.{hash}`; a non-empty prefix is
    /// inserted between the base name and the hash so tiles sort next to
    /// their source image:
    /// `209_205_50_JPG.rf.<hash>` -> `209_205_50_JPG.tile00x00.rf.<hash>`.
    /// Names without the marker get the prefix appended after the name
    /// instead. Prefix and name are sanitized before assembly.
    pub fn file(
        &self,
        direction: Direction,
        split: Split,
        kind: FileKind,
        prefix: &str,
        name: &str,
    ) -> Result<PathBuf, NamingError> {
        let prefix = sanitize_fragment(prefix);
        let sanitized = sanitize_fragment(name);
        if sanitized.is_empty() {
            return Err(NamingError::EmptyName(name.to_string()));
        }

        let extension = kind.extension();
        let filename = if prefix.is_empty() {
            format!("{sanitized}.{extension}")
        } else if let Some(pos) = sanitized.find(RF_MARKER) {
            let (base, hash_tail) = sanitized.split_at(pos);
            format!("{base}.{prefix}{hash_tail}.{extension}")
        } else {
            format!("{sanitized}.{prefix}.{extension}")
        };

        Ok(self.dir(direction, split, kind).join(filename))
    }
}

/// Path generator bound to one file of one split.
///
/// Holds everything fixed except the tile prefix, so tiling code can mint
/// per-tile paths without re-threading the layout through every call.
#[derive(Debug, Clone)]
pub struct TileNamer {
    layout: DatasetLayout,
    direction: Direction,
    split: Split,
    kind: FileKind,
    name: String,
}

impl TileNamer {
    pub fn new(
        layout: DatasetLayout,
        direction: Direction,
        split: Split,
        kind: FileKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            direction,
            split,
            kind,
            name: name.into(),
        }
    }

    /// Path for the tile identified by `prefix`.
    pub fn generate(&self, prefix: &str) -> Result<PathBuf, NamingError> {
        self.layout
            .file(self.direction, self.split, self.kind, prefix, &self.name)
    }
}

/// Column count of the tiling grid, with row-major linear addressing.
#[derive(Debug, Clone, Copy)]
pub struct TileGrid {
    columns: u32,
}

impl TileGrid {
    pub fn new(columns: u32) -> Result<Self, NamingError> {
        if columns == 0 {
            return Err(NamingError::ZeroColumns);
        }
        Ok(Self { columns })
    }

    /// Linear index of the tile at (row, col).
    pub fn index(&self, row: u32, col: u32) -> usize {
        (col + row * self.columns) as usize
    }

    /// Canonical tile tag used as a filename prefix, e.g. `tile02x11`.
    pub fn prefix(&self, row: u32, col: u32) -> String {
        format!("tile{row:02}x{col:02}")
    }
}
