mod active;
mod config;
mod document;
mod editor;
mod error;
mod format;
mod markup;
mod selection;
mod toggle;
mod toolbar;

pub use crate::active::*;
pub use crate::config::*;
pub use crate::document::{Attrs, Document, MarkNode, Node, Path, Tag, TextNode};
pub use crate::editor::*;
pub use crate::error::*;
pub use crate::format::*;
pub use crate::markup::*;
pub use crate::selection::{Point, Selection};
pub use crate::toggle::*;
pub use crate::toolbar::*;
