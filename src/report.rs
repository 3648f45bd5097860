//! Failure reporting for best-effort imports.
//!
//! The importer never decides whether a recoverable failure should abort the
//! run; it hands every dropped unit to an [`ErrorSink`] and moves on. The
//! provided [`ImportLog`] sink records failures as structured, serializable
//! records so callers can display or persist them.

use std::fmt;

use serde::Serialize;

use crate::dataset::ItemId;
use crate::error::{AnnotationError, ItemError};

/// Receiver for recoverable import failures.
///
/// An item error means the item is absent from the output; an annotation
/// error means one box is absent and the item is otherwise intact.
pub trait ErrorSink {
    fn item_error(&mut self, item: &ItemId, error: ItemError);
    fn annotation_error(&mut self, item: &ItemId, error: AnnotationError);
}

/// How far a recorded failure reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureScope {
    /// The whole item was evicted.
    Item,
    /// A single annotation line was dropped.
    Annotation,
}

/// One dropped unit and why.
#[derive(Clone, Debug, Serialize)]
pub struct ImportFailure {
    pub scope: FailureScope,
    pub item: ItemId,
    pub message: String,
}

/// Append-only record of every dropped item and annotation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImportLog {
    pub failures: Vec<ImportFailure>,
}

impl ImportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_error_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.scope == FailureScope::Item)
            .count()
    }

    pub fn annotation_error_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.scope == FailureScope::Annotation)
            .count()
    }

    /// Returns true if nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl ErrorSink for ImportLog {
    fn item_error(&mut self, item: &ItemId, error: ItemError) {
        self.failures.push(ImportFailure {
            scope: FailureScope::Item,
            item: item.clone(),
            message: error.to_string(),
        });
    }

    fn annotation_error(&mut self, item: &ItemId, error: AnnotationError) {
        self.failures.push(ImportFailure {
            scope: FailureScope::Annotation,
            item: item.clone(),
            message: error.to_string(),
        });
    }
}

impl fmt::Display for ImportLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} item error(s), {} annotation error(s)",
            self.item_error_count(),
            self.annotation_error_count()
        )?;

        for failure in &self.failures {
            let scope = match failure.scope {
                FailureScope::Item => "item",
                FailureScope::Annotation => "annotation",
            };
            writeln!(f, "  - [{scope}] {}: {}", failure.item, failure.message)?;
        }

        Ok(())
    }
}
