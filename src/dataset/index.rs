//! Image discovery and the image-size provider.
//!
//! A subset's images live under `<root>/<subset>_obj/`, scanned with a
//! bounded recursion depth. Dimensions come from the optional `images.meta`
//! sidecar when present, and from reading image headers (not pixels)
//! otherwise.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::model::PixelSize;
use super::{SCAN_DEPTH, SUBSET_DIR_SUFFIX};
use crate::error::{ImportError, ItemError};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "bmp", "webp"];

/// Map from item name to image path for one subset, built once at setup.
#[derive(Clone, Debug, Default)]
pub struct ImageIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl ImageIndex {
    /// Scans `root` for images attributed to `subset` by their parent folder.
    ///
    /// Two images deriving the same item name abort the scan: silently
    /// keeping either one would drop an arbitrary item.
    pub fn scan(root: &Path, subset: &str) -> Result<Self, ImportError> {
        let mut entries: BTreeMap<String, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(root).max_depth(SCAN_DEPTH).follow_links(true) {
            let entry = entry.map_err(|source| ImportError::Scan {
                path: root.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_file() || !has_image_extension(entry.path()) {
                continue;
            }

            let rel = rel_string(root, entry.path());
            if subset_from_rel_path(&rel) != Some(subset) {
                continue;
            }

            let name = name_from_path(&rel);
            if let Some(first) = entries.get(&name) {
                return Err(ImportError::DuplicateImageName {
                    name,
                    first: first.clone(),
                    second: entry.path().to_path_buf(),
                });
            }
            entries.insert(name, entry.path().to_path_buf());
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lexicographic item-name order, not filesystem discovery
    /// order. Discovery order varies by platform; this order is what the
    /// subset adopts as its entry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

/// Which subset the first path segment attributes a file to, if any.
///
/// Files directly under the root have no subset folder and belong to no
/// subset.
fn subset_from_rel_path(rel: &str) -> Option<&str> {
    let (first, rest) = rel.split_once('/')?;
    if rest.is_empty() {
        return None;
    }
    first.strip_suffix(SUBSET_DIR_SUFFIX)
}

/// Normalizes a stored path: separators to `/`, optional `data/` prefix
/// stripped.
pub fn localize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let path = path.trim_start_matches("./");
    match path.strip_prefix("data/") {
        Some(rest) => rest.to_string(),
        None => path.to_string(),
    }
}

/// Derives an item name from a root-relative image path.
///
/// Strips the extension and, when the path has more than one segment, the
/// leading subset folder. `train_obj/a/b/img.jpg` becomes `a/b/img`.
pub fn name_from_path(rel_path: &str) -> String {
    let localized = localize_path(rel_path);
    let without_subset = match localized.split_once('/') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => localized.as_str(),
    };

    // Strip the extension from the final segment only.
    let (dir, file) = match without_subset.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, without_subset),
    };
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };

    match dir {
        Some(dir) => format!("{dir}/{stem}"),
        None => stem.to_string(),
    }
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Parses the `images.meta` sidecar: one `<item name> <height> <width>` per
/// line, blank lines ignored. Names may contain spaces; the last two fields
/// are the dimensions.
pub fn load_image_meta(path: &Path) -> Result<BTreeMap<String, PixelSize>, ImportError> {
    let data = fs::read_to_string(path)?;
    let mut meta = BTreeMap::new();

    for (line_idx, line) in data.lines().enumerate() {
        let line_num = line_idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(ImportError::ImageMetaParse {
                path: path.to_path_buf(),
                line: line_num,
                message: format!(
                    "expected '<name> <height> <width>', found {} field(s)",
                    fields.len()
                ),
            });
        }

        let parse_dim = |raw: &str, which: &str| {
            raw.parse::<u32>()
                .map_err(|_| ImportError::ImageMetaParse {
                    path: path.to_path_buf(),
                    line: line_num,
                    message: format!("can't parse {which} from '{raw}'"),
                })
        };
        let height = parse_dim(fields[fields.len() - 2], "height")?;
        let width = parse_dim(fields[fields.len() - 1], "width")?;
        let name = fields[..fields.len() - 2].join(" ");

        meta.insert(name, PixelSize::new(height, width));
    }

    Ok(meta)
}

/// Reads image dimensions from file headers without decoding pixels.
pub fn read_image_size(path: &Path) -> Result<PixelSize, ItemError> {
    let size = imagesize::size(path).map_err(|source| ItemError::ImageDimensions {
        path: path.to_path_buf(),
        source,
    })?;

    let overflow = || ItemError::ImageDimensionOverflow {
        path: path.to_path_buf(),
        width: size.width,
        height: size.height,
    };
    let height: u32 = size.height.try_into().map_err(|_| overflow())?;
    let width: u32 = size.width.try_into().map_err(|_| overflow())?;

    Ok(PixelSize::new(height, width))
}
