//! Core data model for imported oriented-box datasets.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Identity of one dataset item: its derived name plus the subset it lives in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId {
    /// Name derived from the image's relative path (extension stripped,
    /// subset folder dropped).
    pub name: String,

    /// Name of the subset partition (e.g. "train").
    pub subset: String,
}

impl ItemId {
    pub fn new(name: impl Into<String>, subset: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subset: subset.into(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subset, self.name)
    }
}

/// The ordered label vocabulary; a label's id is its position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelCategories {
    names: Vec<String>,
}

impl LabelCategories {
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Whether `label` is a valid index into the vocabulary.
    pub fn contains_id(&self, label: usize) -> bool {
        label < self.names.len()
    }

    pub fn name(&self, label: usize) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Image dimensions as (height, width), the row-major convention annotation
/// coordinates are normalized against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PixelSize {
    pub height: u32,
    pub width: u32,
}

impl PixelSize {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

/// Reference to an image file, with dimensions when already known.
///
/// Dimensions stay `None` until something forces a read: either the
/// `images.meta` sidecar supplies them up front, or the image headers are
/// read on the first annotation that needs them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageDescriptor {
    pub path: PathBuf,
    pub size: Option<PixelSize>,
}

impl ImageDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: None,
        }
    }

    pub fn with_size(path: impl Into<PathBuf>, size: PixelSize) -> Self {
        Self {
            path: path.into(),
            size: Some(size),
        }
    }
}

/// One oriented bounding box, in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RotatedBox {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Rotation in degrees, `[0, 90)`; see [`crate::geometry`].
    pub angle: f64,
    /// Index into [`LabelCategories`].
    pub label: usize,
    /// 0-based position of the source line among the non-blank lines of its
    /// annotation file. Preserved across rejected siblings, so surviving
    /// ordinals are not necessarily contiguous.
    pub ordinal: usize,
}

/// A fully materialized dataset item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub image: ImageDescriptor,
    /// Surviving boxes, in annotation-file order.
    pub boxes: Vec<RotatedBox>,
}
