use serde::{Deserialize, Serialize};

use crate::document::Tag;

pub const DEFAULT_TOOLBAR_OFFSET: f32 = 20.0;

/// Screen-space bounds of the selection, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolbarPosition {
    pub top: f32,
    pub left: f32,
}

pub fn position(bounds: BoundingBox, scroll: ScrollOffset, vertical_offset: f32) -> ToolbarPosition {
    ToolbarPosition {
        top: bounds.top + scroll.y + vertical_offset,
        left: bounds.left + scroll.x,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarButton {
    pub tag: Tag,
    pub label: String,
    pub active: bool,
    /// Fill colour: the configured active colour, or `transparent`.
    pub background: String,
}
