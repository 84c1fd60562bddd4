use std::cmp::Ordering;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Node, Path};
use crate::error::RangeError;

/// A boundary in the document.
///
/// When `path` addresses a text node, `offset` counts characters into its
/// text. When it addresses a mark node, or is empty (the root), `offset` is a
/// child index: `offset == 2` sits between the second and third child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Document order. A child-index boundary sorts before everything inside
    /// the child it precedes.
    pub fn cmp_position(&self, other: &Point) -> Ordering {
        let key = |p: &Point| {
            p.path
                .iter()
                .copied()
                .chain(std::iter::once(p.offset))
                .collect::<Vec<_>>()
        };
        key(self).cmp(&key(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointKind {
    Text,
    Container,
}

pub(crate) fn resolve_point(doc: &Document, point: &Point) -> Result<PointKind, RangeError> {
    let (kind, len) = if point.path.is_empty() {
        (PointKind::Container, doc.children.len())
    } else {
        match doc.node(&point.path) {
            Some(Node::Text(t)) => (PointKind::Text, t.char_len()),
            Some(Node::Mark(mark)) => (PointKind::Container, mark.children.len()),
            None => {
                return Err(RangeError::MissingNode {
                    path: point.path.clone(),
                });
            }
        }
    };
    if point.offset > len {
        return Err(RangeError::OffsetOutOfBounds {
            path: point.path.clone(),
            offset: point.offset,
            len,
        });
    }
    Ok(kind)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
}

impl Selection {
    /// Builds a selection from two points in either order.
    pub fn new(a: Point, b: Point) -> Self {
        if b.cmp_position(&a) == Ordering::Less {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            start: point.clone(),
            end: point,
        }
    }

    /// Both ends inside the text node at `path`, by character range.
    pub fn in_text(path: Path, range: Range<usize>) -> Self {
        Self::new(
            Point::new(path.clone(), range.start),
            Point::new(path, range.end),
        )
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn ordered(&self) -> Self {
        Self::new(self.start.clone(), self.end.clone())
    }

    pub fn validate(&self, doc: &Document) -> Result<(), RangeError> {
        resolve_point(doc, &self.start)?;
        resolve_point(doc, &self.end)?;
        Ok(())
    }

    /// Path of the nearest container (a mark node, or the root as the empty
    /// path) whose subtree holds both ends.
    pub fn common_ancestor(&self, doc: &Document) -> Result<Path, RangeError> {
        self.validate(doc)?;
        let mut path: Path = self
            .start
            .path
            .iter()
            .zip(&self.end.path)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect();
        if matches!(doc.node(&path), Some(Node::Text(_))) {
            path.pop();
        }
        Ok(path)
    }
}
