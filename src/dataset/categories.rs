//! Label vocabulary loader for the root `data.yaml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::model::LabelCategories;
use crate::error::ImportError;

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: NamesField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NamesField {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

/// Reads [`LabelCategories`] from a category file.
///
/// The `names` key is either an ordered list of strings (id = list index) or
/// a mapping from integer id to name (ids follow ascending key, gaps are
/// filled with `class_<id>` placeholders). Any other shape, and any duplicate
/// label name, is a fatal structural error.
pub fn load_categories(path: &Path) -> Result<LabelCategories, ImportError> {
    let data = fs::read_to_string(path)?;
    let parsed: DataYaml =
        serde_yaml::from_str(&data).map_err(|source| ImportError::CategoryFileParse {
            path: path.to_path_buf(),
            source,
        })?;

    let names = match parsed.names {
        NamesField::Sequence(names) => names,
        NamesField::Mapping(mapping) => {
            if mapping.is_empty() {
                Vec::new()
            } else {
                let max_index = *mapping.keys().next_back().expect("checked non-empty");
                let mut names = vec![String::new(); max_index + 1];
                for (index, name) in mapping {
                    names[index] = name;
                }
                for (index, name) in names.iter_mut().enumerate() {
                    if name.trim().is_empty() {
                        *name = format!("class_{}", index);
                    }
                }
                names
            }
        }
    };

    for (index, name) in names.iter().enumerate() {
        if names[..index].contains(name) {
            return Err(ImportError::DuplicateLabel {
                path: path.to_path_buf(),
                name: name.clone(),
            });
        }
    }

    Ok(LabelCategories::from_names(names))
}
