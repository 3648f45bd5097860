//! Error taxonomy for the importer.
//!
//! Three severities, matching how far a failure reaches:
//!
//! - [`ImportError`]: structural, makes the whole import unusable and
//!   propagates to the caller.
//! - [`ItemError`]: drops exactly one dataset item; forwarded to the
//!   [`ErrorSink`](crate::report::ErrorSink), never returned to the caller.
//! - [`AnnotationError`]: drops exactly one annotation line; the owning item
//!   survives with its remaining boxes.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures that abort the whole import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{path}' is not a dataset directory")]
    NotADirectory { path: PathBuf },

    #[error("Failed to parse category file {path}: {source}")]
    CategoryFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Duplicate label name '{name}' in category file {path}")]
    DuplicateLabel { path: PathBuf, name: String },

    #[error("Malformed image meta file {path} at line {line}: {message}")]
    ImageMetaParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Images '{first}' and '{second}' both map to item '{name}'")]
    DuplicateImageName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed while scanning {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Failures that evict a single item from its subset.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Failed to read annotation file {path}: {source}")]
    AnnotationRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't obtain dimensions of image {path}: {source}")]
    ImageDimensions {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} reports dimensions {width}x{height} which do not fit in u32")]
    ImageDimensionOverflow {
        path: PathBuf,
        width: usize,
        height: usize,
    },
}

/// Failures scoped to one annotation line.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error(
        "line {line}: unexpected field count {found} in the oriented bbox description; \
         expected 9 fields (label, x1, y1, x2, y2, x3, y3, x4, y4)"
    )]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: can't parse label id from '{value}'; expected non-negative integer")]
    InvalidLabelId { line: usize, value: String },

    #[error("line {line}: undeclared label id {label}; only {declared} label(s) declared")]
    UndeclaredLabel {
        line: usize,
        label: usize,
        declared: usize,
    },

    #[error("line {line}: can't parse {field} from '{value}'; expected floating-point number")]
    InvalidCoordinate {
        line: usize,
        field: &'static str,
        value: String,
    },
}
