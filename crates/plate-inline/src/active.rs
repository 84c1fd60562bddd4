use serde::{Deserialize, Serialize};

use crate::document::{Document, Node, Path, Tag};
use crate::error::RangeError;
use crate::format::{FormatSet, same_format};
use crate::selection::{Point, Selection, resolve_point};

/// Tags enclosing the selection, innermost first, without repeats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActiveStyles(Vec<Tag>);

impl ActiveStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| same_format(t, tag))
    }

    pub fn insert(&mut self, tag: impl Into<Tag>) {
        let tag = tag.into();
        if !self.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn remove(&mut self, tag: &str) {
        self.0.retain(|t| !same_format(t, tag));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Into<Tag>> FromIterator<T> for ActiveStyles {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut styles = Self::new();
        for tag in iter {
            styles.insert(tag);
        }
        styles
    }
}

/// Enabled formats enclosing `anchor`, walking from the node that holds it up
/// to the root.
pub fn active_formats(
    doc: &Document,
    anchor: &Point,
    enabled: &FormatSet,
) -> Result<ActiveStyles, RangeError> {
    resolve_point(doc, anchor)?;
    let mut path = anchor.path.clone();
    if matches!(doc.node(&path), Some(Node::Text(_))) {
        path.pop();
    }
    Ok(enclosing_formats(doc, path, enabled))
}

/// Enabled formats enclosing the whole selection, starting from its common
/// ancestor. A collapsed selection has none.
pub fn active_formats_for_selection(
    doc: &Document,
    selection: &Selection,
    enabled: &FormatSet,
) -> Result<ActiveStyles, RangeError> {
    if selection.is_collapsed() {
        return Ok(ActiveStyles::new());
    }
    let container = selection.common_ancestor(doc)?;
    Ok(enclosing_formats(doc, container, enabled))
}

fn enclosing_formats(doc: &Document, mut path: Path, enabled: &FormatSet) -> ActiveStyles {
    let mut active = ActiveStyles::new();
    while !path.is_empty() {
        if let Some(mark) = doc.mark_at(&path) {
            if enabled.contains_tag(&mark.tag) {
                active.insert(mark.tag.clone());
            }
        }
        path.pop();
    }
    tracing::trace!(?active, "resolved active formats");
    active
}
