//! Lazily resolved subset cache.
//!
//! A subset starts as placeholders (one per indexed image) and materializes
//! items on first access. Each entry is a slot that transitions at most
//! once: `Unresolved` to either `Resolved` (cached permanently) or `Absent`
//! (evicted permanently). Nothing is ever re-attempted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::annotations::{parse_annotation_lines, read_annotation_lines};
use super::categories::load_categories;
use super::index::{load_image_meta, read_image_size, ImageIndex};
use super::model::{ImageDescriptor, Item, ItemId, LabelCategories, PixelSize};
use super::{ANNOTATION_EXTENSION, CATEGORY_FILE, IMAGE_META_FILE};
use crate::error::{ImportError, ItemError};
use crate::report::{ErrorSink, ImportLog};

#[derive(Debug)]
enum Slot {
    Unresolved(PathBuf),
    Resolved(Item),
    Absent,
}

#[derive(Debug)]
struct Entry {
    id: ItemId,
    slot: Slot,
}

/// One subset of the dataset, resolved item by item on access.
#[derive(Debug)]
pub struct Subset {
    name: String,
    categories: LabelCategories,
    image_meta: BTreeMap<String, PixelSize>,
    entries: Vec<Entry>,
    index: BTreeMap<String, usize>,
}

impl Subset {
    /// Opens a subset: loads the vocabulary, the optional `images.meta`
    /// sidecar, and the image index, and populates placeholders. No
    /// annotation file or image header is touched yet.
    pub fn open(root: &Path, subset: &str) -> Result<Self, ImportError> {
        if !root.is_dir() {
            return Err(ImportError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let categories = load_categories(&root.join(CATEGORY_FILE))?;

        let meta_path = root.join(IMAGE_META_FILE);
        let image_meta = if meta_path.is_file() {
            load_image_meta(&meta_path)?
        } else {
            BTreeMap::new()
        };

        let image_index = ImageIndex::scan(root, subset)?;

        let mut entries = Vec::with_capacity(image_index.len());
        let mut index = BTreeMap::new();
        for (name, path) in image_index.iter() {
            index.insert(name.to_string(), entries.len());
            entries.push(Entry {
                id: ItemId::new(name, subset),
                slot: Slot::Unresolved(path.to_path_buf()),
            });
        }

        Ok(Self {
            name: subset.to_string(),
            categories,
            image_meta,
            entries,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn categories(&self) -> &LabelCategories {
        &self.categories
    }

    /// Number of entries not (yet) evicted.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !matches!(entry.slot, Slot::Absent))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the item named `name`, resolving it on first access.
    ///
    /// `None` means the name is unknown or the entry was evicted; eviction
    /// is permanent and the failure was already reported to `sink`.
    pub fn get(&mut self, name: &str, sink: &mut dyn ErrorSink) -> Option<&Item> {
        let idx = *self.index.get(name)?;
        if matches!(self.entries[idx].slot, Slot::Unresolved(_)) {
            self.resolve(idx, sink);
        }

        match &self.entries[idx].slot {
            Slot::Resolved(item) => Some(item),
            _ => None,
        }
    }

    /// Names of the entries not (yet) evicted, in entry order.
    ///
    /// Suitable for driving [`Subset::get`] one item at a time; the caller
    /// controls pacing and may stop at any point.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !matches!(entry.slot, Slot::Absent))
            .map(|entry| entry.id.name.clone())
            .collect()
    }

    /// Drives every unresolved entry to its final state.
    pub fn resolve_all(&mut self, sink: &mut dyn ErrorSink) {
        for idx in 0..self.entries.len() {
            if matches!(self.entries[idx].slot, Slot::Unresolved(_)) {
                self.resolve(idx, sink);
            }
        }
    }

    /// Resolves every pending entry, then yields the surviving items in
    /// entry order. Evicted entries are skipped; their failures land in
    /// `sink`. For per-item pacing, feed [`Subset::names`] to
    /// [`Subset::get`] instead.
    pub fn resolve_iter<'a>(
        &'a mut self,
        sink: &mut dyn ErrorSink,
    ) -> impl Iterator<Item = &'a Item> {
        self.resolve_all(sink);
        self.iter()
    }

    /// Already-materialized items, in entry order. Entries still unresolved
    /// are not visible here; use [`Subset::resolve_iter`] or
    /// [`Subset::get`] to materialize them first.
    ///
    /// Entry order is fixed at [`Subset::open`]: lexicographic by item
    /// name, the order the image index yields.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().filter_map(|entry| match &entry.slot {
            Slot::Resolved(item) => Some(item),
            _ => None,
        })
    }

    fn resolve(&mut self, idx: usize, sink: &mut dyn ErrorSink) {
        let image_path = match &self.entries[idx].slot {
            Slot::Unresolved(path) => path.clone(),
            _ => return,
        };

        let id = self.entries[idx].id.clone();
        match self.materialize(&id, &image_path, sink) {
            Ok(item) => self.entries[idx].slot = Slot::Resolved(item),
            Err(error) => {
                sink.item_error(&self.entries[idx].id, error);
                self.entries[idx].slot = Slot::Absent;
            }
        }
    }

    fn materialize(
        &self,
        id: &ItemId,
        image_path: &Path,
        sink: &mut dyn ErrorSink,
    ) -> Result<Item, ItemError> {
        let annotation_path = image_path.with_extension(ANNOTATION_EXTENSION);
        let lines = read_annotation_lines(&annotation_path)?;

        let mut size = self.image_meta.get(&id.name).copied();
        let boxes = if lines.is_empty() {
            // No annotations, so nothing forces the image headers open.
            Vec::new()
        } else {
            let known = match size {
                Some(known) => known,
                None => {
                    let read = read_image_size(image_path)?;
                    size = Some(read);
                    read
                }
            };
            parse_annotation_lines(&lines, known, &self.categories, id, sink)
        };

        Ok(Item {
            id: id.clone(),
            image: ImageDescriptor {
                path: image_path.to_path_buf(),
                size,
            },
            boxes,
        })
    }
}

/// Result of a whole-subset import: vocabulary, surviving items, and the
/// record of everything dropped along the way.
#[derive(Clone, Debug, Serialize)]
pub struct Import {
    pub subset: String,
    pub categories: LabelCategories,
    pub items: Vec<Item>,
    pub log: ImportLog,
}

/// Imports one subset end to end.
///
/// Pure with respect to policy: structural failures return `Err`, while
/// item- and annotation-level failures land in the returned log and the
/// affected units are simply missing from `items`.
pub fn import_subset(root: &Path, subset: &str) -> Result<Import, ImportError> {
    let mut cache = Subset::open(root, subset)?;
    let mut log = ImportLog::new();
    cache.resolve_all(&mut log);

    Ok(Import {
        subset: cache.name.clone(),
        categories: cache.categories.clone(),
        items: cache.iter().cloned().collect(),
        log,
    })
}
