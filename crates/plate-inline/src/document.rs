use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::RangeError;
use crate::format::same_format;
use crate::selection::{Point, PointKind, resolve_point};

pub type Attrs = BTreeMap<String, String>;
pub type Tag = String;
pub type Path = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Mark(MarkNode),
    Text(TextNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode { text: text.into() })
    }

    pub fn mark(tag: impl Into<Tag>, children: Vec<Node>) -> Self {
        Node::Mark(MarkNode {
            tag: tag.into(),
            attrs: Attrs::default(),
            children,
        })
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Mark(mark) => Some(&mark.children),
            Node::Text(_) => None,
        }
    }

    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Mark(mark) => {
                for child in &mark.children {
                    child.push_text(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkNode {
    pub tag: Tag,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl MarkNode {
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::default(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Tags compare ASCII case-insensitively, and built-in aliases match, so
    /// `B`, `b` and `bold` all name the same mark.
    pub fn has_tag(&self, tag: &str) -> bool {
        same_format(&self.tag, tag)
    }
}

impl From<MarkNode> for Node {
    fn from(mark: MarkNode) -> Self {
        Node::Mark(mark)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

impl TextNode {
    /// Length in characters; text offsets in a [`crate::Point`] count characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            children: vec![Node::text(text)],
        }
    }

    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            node.push_text(&mut out);
        }
        out
    }

    /// A document is empty when the root holds nothing but empty text leaves.
    pub fn is_empty(&self) -> bool {
        self.children
            .iter()
            .all(|n| matches!(n, Node::Text(t) if t.text.is_empty()))
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get(first)?;
        for &ix in rest {
            node = match node {
                Node::Mark(mark) => mark.children.get(ix)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn mark_at(&self, path: &[usize]) -> Option<&MarkNode> {
        match self.node(path)? {
            Node::Mark(mark) => Some(mark),
            Node::Text(_) => None,
        }
    }

    /// Children of the container at `path`; the empty path is the root.
    pub fn children_at(&self, path: &[usize]) -> Option<&[Node]> {
        if path.is_empty() {
            return Some(&self.children);
        }
        self.node(path).and_then(Node::children)
    }

    pub(crate) fn children_at_mut(&mut self, path: &[usize]) -> Result<&mut Vec<Node>, RangeError> {
        let mut children = &mut self.children;
        for (depth, &ix) in path.iter().enumerate() {
            children = match children.get_mut(ix) {
                Some(Node::Mark(mark)) => &mut mark.children,
                Some(Node::Text(_)) => {
                    return Err(RangeError::NotAContainer {
                        path: path[..=depth].to_vec(),
                    });
                }
                None => {
                    return Err(RangeError::MissingNode {
                        path: path[..=depth].to_vec(),
                    });
                }
            };
        }
        Ok(children)
    }

    /// Inserts `text` at `point` and returns the caret just after it.
    ///
    /// At a child boundary the text joins a text node ending right there, or
    /// becomes a new text node.
    pub fn insert_text(&mut self, point: &Point, text: &str) -> Result<Point, RangeError> {
        if resolve_point(self, point)? == PointKind::Text {
            return self.replace_text(&point.path, point.offset..point.offset, text);
        }

        let children = self.children_at_mut(&point.path)?;
        let mut path = point.path.clone();
        let before = point.offset.checked_sub(1).and_then(|ix| children.get_mut(ix));
        if let Some(Node::Text(prev)) = before {
            prev.text.push_str(text);
            path.push(point.offset - 1);
            return Ok(Point::new(path, prev.char_len()));
        }
        children.insert(point.offset, Node::text(text));
        path.push(point.offset);
        Ok(Point::new(path, text.chars().count()))
    }

    /// Replaces the characters `range` of the text node at `path` with `text`
    /// and returns the caret just after the replacement.
    pub fn replace_text(
        &mut self,
        path: &[usize],
        range: Range<usize>,
        text: &str,
    ) -> Result<Point, RangeError> {
        let Some((&ix, parent)) = path.split_last() else {
            return Err(RangeError::NotText { path: Path::new() });
        };
        let node = self
            .children_at_mut(parent)?
            .get_mut(ix)
            .ok_or_else(|| RangeError::MissingNode {
                path: path.to_vec(),
            })?;
        let Node::Text(leaf) = node else {
            return Err(RangeError::NotText {
                path: path.to_vec(),
            });
        };

        let len = leaf.char_len();
        if range.start > range.end || range.end > len {
            return Err(RangeError::OffsetOutOfBounds {
                path: path.to_vec(),
                offset: range.end.max(range.start),
                len,
            });
        }
        let start = byte_offset(&leaf.text, range.start);
        let end = byte_offset(&leaf.text, range.end);
        leaf.text.replace_range(start..end, text);
        Ok(Point::new(path.to_vec(), range.start + text.chars().count()))
    }
}

/// Byte index of the `char_ix`-th character, clamped to the end of `s`.
pub(crate) fn byte_offset(s: &str, char_ix: usize) -> usize {
    s.char_indices()
        .nth(char_ix)
        .map(|(ix, _)| ix)
        .unwrap_or(s.len())
}
