//! Directory-based YOLO oriented-box dataset import.
//!
//! Layout consumed:
//!
//! ```text
//! <root>/data.yaml               category definitions ("names" key)
//! <root>/images.meta             optional dimension sidecar
//! <root>/<subset>_obj/<name>.<image ext>
//! <root>/<subset>_obj/<name>.txt sibling annotation file
//! ```
//!
//! [`Subset::open`] builds the vocabulary and image index eagerly;
//! everything per-item (annotation parsing, image header reads) happens
//! lazily on first access through [`Subset::get`]. [`import_subset`] is the
//! eager one-shot wrapper.

mod annotations;
mod categories;
mod index;
mod model;
mod subset;

pub use categories::load_categories;
pub use index::{load_image_meta, name_from_path, read_image_size, ImageIndex};
pub use model::{ImageDescriptor, Item, ItemId, LabelCategories, PixelSize, RotatedBox};
pub use subset::{import_subset, Import, Subset};

/// Category file expected at the dataset root.
pub const CATEGORY_FILE: &str = "data.yaml";

/// Optional sidecar with pre-known image dimensions.
pub const IMAGE_META_FILE: &str = "images.meta";

/// Extension of the per-image annotation file.
pub const ANNOTATION_EXTENSION: &str = "txt";

/// Suffix attributing a top-level folder to a subset.
pub const SUBSET_DIR_SUFFIX: &str = "_obj";

/// Directory scan depth: subset folders directly under the root.
pub const SCAN_DEPTH: usize = 2;
