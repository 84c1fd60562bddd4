use crate::document::{Document, MarkNode, Node, Path, Tag, byte_offset};
use crate::error::{RangeError, ToggleError};
use crate::format::{Attribute, required_attribute};
use crate::selection::{Point, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Nothing changed: the selection was collapsed or covered no content.
    Unchanged { selection: Selection },
    /// A new mark was inserted at `mark_path`; the selection sits right after it.
    Wrapped { mark_path: Path, selection: Selection },
    /// The enclosing `tag` mark was removed and its children spliced in place.
    Unwrapped { tag: Tag, selection: Selection },
    /// The attribute prompt was declined, so nothing changed.
    Abandoned { selection: Selection },
}

impl ToggleOutcome {
    pub fn selection(&self) -> &Selection {
        match self {
            ToggleOutcome::Unchanged { selection }
            | ToggleOutcome::Wrapped { selection, .. }
            | ToggleOutcome::Unwrapped { selection, .. }
            | ToggleOutcome::Abandoned { selection } => selection,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ToggleOutcome::Wrapped { .. } | ToggleOutcome::Unwrapped { .. }
        )
    }
}

/// Supplies attribute values (such as a link's `href`) on demand.
///
/// Returning `None` abandons the toggle.
pub trait AttributePrompt {
    fn request(&mut self, tag: &str, attribute: &str) -> Option<String>;
}

/// A prompt that always declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl AttributePrompt for NoPrompt {
    fn request(&mut self, _tag: &str, _attribute: &str) -> Option<String> {
        None
    }
}

struct FnPrompt<F>(F);

impl<F> AttributePrompt for FnPrompt<F>
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn request(&mut self, tag: &str, attribute: &str) -> Option<String> {
        (self.0)(tag, attribute)
    }
}

pub fn prompt_fn<F>(f: F) -> impl AttributePrompt
where
    F: FnMut(&str, &str) -> Option<String>,
{
    FnPrompt(f)
}

/// Applies or removes the `tag` mark over `selection`.
///
/// If the nearest mark enclosing both ends already carries `tag`, that mark is
/// unwrapped. Otherwise the selected content is cut out along clean node
/// boundaries and wrapped in a new mark. Nested marks of the same tag are left
/// alone, and adjacent marks are never merged.
pub fn toggle(
    doc: &mut Document,
    selection: &Selection,
    tag: &str,
    attribute: Option<&Attribute>,
) -> Result<ToggleOutcome, ToggleError> {
    if selection.is_collapsed() {
        tracing::trace!(tag, "toggle on a collapsed selection is a no-op");
        return Ok(ToggleOutcome::Unchanged {
            selection: selection.clone(),
        });
    }

    let tag = tag.trim();
    if tag.is_empty() {
        return Err(ToggleError::InvalidTag);
    }

    let selection = selection.ordered();
    let container = selection.common_ancestor(doc)?;

    if doc.mark_at(&container).is_some_and(|mark| mark.has_tag(tag)) {
        return unwrap_mark(doc, &container, &selection);
    }

    if attribute.is_none() {
        if let Some(attribute) = required_attribute(tag) {
            tracing::debug!(tag, %attribute, "toggle needs an attribute");
            return Err(ToggleError::NeedsAttribute {
                tag: tag.to_string(),
                attribute,
            });
        }
    }

    wrap_selection(doc, &selection, &container, tag, attribute)
}

/// [`toggle`], asking `prompt` for a missing attribute and retrying once.
pub fn toggle_with_prompt(
    doc: &mut Document,
    selection: &Selection,
    tag: &str,
    prompt: &mut dyn AttributePrompt,
) -> Result<ToggleOutcome, ToggleError> {
    match toggle(doc, selection, tag, None) {
        Err(ToggleError::NeedsAttribute {
            tag: needed,
            attribute,
        }) => {
            let Some(value) = prompt
                .request(&needed, &attribute)
                .filter(|value| !value.is_empty())
            else {
                tracing::debug!(tag = %needed, %attribute, "attribute prompt declined");
                return Ok(ToggleOutcome::Abandoned {
                    selection: selection.clone(),
                });
            };
            toggle(doc, selection, tag, Some(&Attribute::new(attribute, value)))
        }
        other => other,
    }
}

fn unwrap_mark(
    doc: &mut Document,
    mark_path: &[usize],
    selection: &Selection,
) -> Result<ToggleOutcome, ToggleError> {
    let Some((&mark_ix, parent)) = mark_path.split_last() else {
        return Err(RangeError::NotAContainer { path: Path::new() }.into());
    };

    let siblings = doc.children_at_mut(parent)?;
    if mark_ix >= siblings.len() {
        return Err(RangeError::MissingNode {
            path: mark_path.to_vec(),
        }
        .into());
    }
    let mark = match siblings.remove(mark_ix) {
        Node::Mark(mark) => mark,
        node @ Node::Text(_) => {
            siblings.insert(mark_ix, node);
            return Err(RangeError::NotAContainer {
                path: mark_path.to_vec(),
            }
            .into());
        }
    };

    let count = mark.children.len();
    let tail = siblings.split_off(mark_ix);
    siblings.extend(mark.children);
    siblings.extend(tail);
    tracing::debug!(tag = %mark.tag, ?mark_path, count, "unwrapped mark");

    let selection = Selection {
        start: remap_after_unwrap(&selection.start, mark_path, count),
        end: remap_after_unwrap(&selection.end, mark_path, count),
    };
    Ok(ToggleOutcome::Unwrapped {
        tag: mark.tag,
        selection,
    })
}

/// Maps a point across the removal of the mark at `mark_path` whose `count`
/// children took its place.
fn remap_after_unwrap(point: &Point, mark_path: &[usize], count: usize) -> Point {
    let depth = mark_path.len() - 1;
    let parent = &mark_path[..depth];
    let mark_ix = mark_path[depth];

    let mut point = point.clone();
    if point.path == parent {
        if point.offset > mark_ix {
            point.offset = point.offset + count - 1;
        }
        return point;
    }
    if point.path.as_slice() == mark_path {
        point.path.truncate(depth);
        point.offset += mark_ix;
        return point;
    }
    if point.path.len() <= depth || !point.path.starts_with(parent) {
        return point;
    }

    let ix = point.path[depth];
    if ix == mark_ix {
        let child_ix = point.path.remove(depth + 1);
        point.path[depth] = mark_ix + child_ix;
    } else if ix > mark_ix {
        point.path[depth] = ix + count - 1;
    }
    point
}

fn wrap_selection(
    doc: &mut Document,
    selection: &Selection,
    container: &[usize],
    tag: &str,
    attribute: Option<&Attribute>,
) -> Result<ToggleOutcome, ToggleError> {
    let end_ix = split_up_to(doc, &selection.end, container)?;
    let len_before = doc.children_at_mut(container)?.len();
    let start_ix = split_up_to(doc, &selection.start, container)?;
    let children = doc.children_at_mut(container)?;
    // Splitting at the start only inserts nodes ahead of the end boundary.
    let end_ix = end_ix + (children.len() - len_before);

    if start_ix >= end_ix {
        tracing::trace!(tag, ?container, "selection covers no content");
        return Ok(ToggleOutcome::Unchanged {
            selection: selection.clone(),
        });
    }

    let mut mark = MarkNode::new(tag);
    if let Some(attribute) = attribute {
        mark.attrs
            .insert(attribute.name.clone(), attribute.value.clone());
    }
    mark.children = children.drain(start_ix..end_ix).collect();
    children.insert(start_ix, Node::Mark(mark));

    let mut mark_path = container.to_vec();
    mark_path.push(start_ix);
    tracing::debug!(tag, ?mark_path, "wrapped selection");

    Ok(ToggleOutcome::Wrapped {
        mark_path,
        selection: Selection::collapsed(Point::new(container.to_vec(), start_ix + 1)),
    })
}

/// Splits every node between `point` and `container` so that the point lands
/// on a child boundary of `container`, and returns that child index.
fn split_up_to(doc: &mut Document, point: &Point, container: &[usize]) -> Result<usize, RangeError> {
    let (mut parent, mut index) = match doc.node(&point.path) {
        Some(Node::Text(_)) => {
            let parent = point.path[..point.path.len() - 1].to_vec();
            (parent, split_text(doc, &point.path, point.offset)?)
        }
        _ => (point.path.clone(), point.offset),
    };

    while parent.len() > container.len() {
        index = split_mark(doc, &parent, index)?;
        parent.pop();
    }
    Ok(index)
}

/// Splits the text at `path` after `offset` characters. Returns the boundary
/// index in the text's parent; splits at either edge leave the node whole.
fn split_text(doc: &mut Document, path: &[usize], offset: usize) -> Result<usize, RangeError> {
    let Some((&ix, parent)) = path.split_last() else {
        return Err(RangeError::MissingNode { path: Path::new() });
    };
    let siblings = doc.children_at_mut(parent)?;
    let Some(Node::Text(text)) = siblings.get_mut(ix) else {
        return Err(RangeError::MissingNode {
            path: path.to_vec(),
        });
    };

    if offset == 0 {
        return Ok(ix);
    }
    if offset >= text.char_len() {
        return Ok(ix + 1);
    }
    let tail = text.text.split_off(byte_offset(&text.text, offset));
    siblings.insert(ix + 1, Node::text(tail));
    Ok(ix + 1)
}

/// Splits the mark at `path` before child `index`; the right half is a copy of
/// the mark holding the remaining children.
fn split_mark(doc: &mut Document, path: &[usize], index: usize) -> Result<usize, RangeError> {
    let Some((&ix, parent)) = path.split_last() else {
        return Err(RangeError::NotAContainer { path: Path::new() });
    };
    let siblings = doc.children_at_mut(parent)?;
    let Some(Node::Mark(mark)) = siblings.get_mut(ix) else {
        return Err(RangeError::MissingNode {
            path: path.to_vec(),
        });
    };

    if index == 0 {
        return Ok(ix);
    }
    if index >= mark.children.len() {
        return Ok(ix + 1);
    }
    let right = MarkNode {
        tag: mark.tag.clone(),
        attrs: mark.attrs.clone(),
        children: mark.children.split_off(index),
    };
    siblings.insert(ix + 1, Node::Mark(right));
    Ok(ix + 1)
}
