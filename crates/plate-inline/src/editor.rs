use crate::active::{ActiveStyles, active_formats_for_selection};
use crate::config::{DEFAULT_PLACEHOLDER, EditorConfig};
use crate::document::{Document, Node};
use crate::error::{RangeError, ToggleError};
use crate::format::FormatSet;
use crate::markup::render_markup;
use crate::selection::{Point, Selection};
use crate::toggle::{AttributePrompt, ToggleOutcome, toggle_with_prompt};
use crate::toolbar::{BoundingBox, ScrollOffset, ToolbarButton, ToolbarPosition, position};

/// What the selection provider reports on every selection event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionChange {
    /// `None` when nothing is selected.
    pub selection: Option<Selection>,
    pub bounds: BoundingBox,
    pub scroll: ScrollOffset,
}

fn root_caret() -> Selection {
    Selection::collapsed(Point::new(Vec::new(), 0))
}

/// One editing session: the document plus the toolbar state around it.
pub struct Editor {
    doc: Document,
    selection: Selection,
    config: EditorConfig,
    formats: FormatSet,
    active: ActiveStyles,
    toolbar: Option<ToolbarPosition>,
    placeholder_visible: bool,
    on_change: Option<Box<dyn FnMut(&str)>>,
}

impl Editor {
    /// A fresh session showing the placeholder text.
    pub fn new(config: EditorConfig) -> Self {
        let doc = Document::from_text(config.placeholder_text());
        let mut editor = Self::with_document(doc, config);
        editor.placeholder_visible = true;
        editor
    }

    pub fn with_document(doc: Document, config: EditorConfig) -> Self {
        let formats = config.enabled_formats();
        Self {
            doc,
            selection: root_caret(),
            config,
            formats,
            active: ActiveStyles::new(),
            toolbar: None,
            placeholder_visible: false,
            on_change: None,
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn formats(&self) -> &FormatSet {
        &self.formats
    }

    pub fn active_styles(&self) -> &ActiveStyles {
        &self.active
    }

    /// Where to draw the toolbar, or `None` while it is hidden.
    pub fn toolbar(&self) -> Option<ToolbarPosition> {
        self.toolbar
    }

    pub fn is_placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    /// Registers the listener that receives the rendered markup after every
    /// change to the document.
    pub fn on_content_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn markup(&self) -> String {
        render_markup(&self.doc)
    }

    /// Absent selections reset to a caret at the start of the root; collapsed
    /// ones keep the caret. Either way the toolbar hides.
    pub fn handle_selection_change(&mut self, change: SelectionChange) -> Result<(), RangeError> {
        let Some(selection) = change.selection else {
            self.hide_toolbar(root_caret());
            return Ok(());
        };
        if let Err(err) = selection.validate(&self.doc) {
            tracing::warn!(?selection, %err, "rejected selection");
            self.hide_toolbar(root_caret());
            return Err(err);
        }
        if selection.is_collapsed() {
            self.hide_toolbar(selection);
            return Ok(());
        }

        let active = active_formats_for_selection(&self.doc, &selection, &self.formats)?;
        let at = position(change.bounds, change.scroll, self.config.toolbar_offset);
        tracing::debug!(?selection, ?active, top = at.top, left = at.left, "selection changed");

        self.selection = selection.ordered();
        self.active = active;
        self.toolbar = Some(at);
        Ok(())
    }

    /// Toolbar action: toggles `tag` over the current selection, asking
    /// `prompt` for any attribute the format needs.
    pub fn toggle_format(
        &mut self,
        tag: &str,
        prompt: &mut dyn AttributePrompt,
    ) -> Result<ToggleOutcome, ToggleError> {
        let outcome = toggle_with_prompt(&mut self.doc, &self.selection, tag, prompt)?;
        match &outcome {
            ToggleOutcome::Unwrapped { tag, selection } => {
                self.active.remove(tag);
                self.selection = selection.clone();
            }
            ToggleOutcome::Wrapped { selection, .. } => {
                self.hide_toolbar(selection.clone());
            }
            ToggleOutcome::Unchanged { .. } | ToggleOutcome::Abandoned { .. } => {}
        }
        if outcome.is_mutation() {
            self.notify_change();
        }
        Ok(outcome)
    }

    /// Typing: inserts `text` at the caret, or replaces the selected run when
    /// the selection lies within one text node. Leaves a caret after the
    /// inserted text.
    pub fn insert_text(&mut self, text: &str) -> Result<(), RangeError> {
        if self.placeholder_visible {
            self.focus();
        }

        let selection = self.selection.ordered();
        let caret = if selection.is_collapsed() {
            self.doc.insert_text(&selection.start, text)?
        } else if selection.start.path == selection.end.path {
            self.doc.replace_text(
                &selection.start.path,
                selection.start.offset..selection.end.offset,
                text,
            )?
        } else {
            return Err(RangeError::SpansNodes {
                start: selection.start.path,
                end: selection.end.path,
            });
        };

        self.hide_toolbar(Selection::collapsed(caret));
        self.placeholder_visible = false;
        self.notify_change();
        Ok(())
    }

    pub fn toolbar_buttons(&self) -> Vec<ToolbarButton> {
        self.formats
            .iter()
            .map(|format| {
                let active = self.active.contains(&format.tag);
                ToolbarButton {
                    tag: format.tag.clone(),
                    label: format.label.clone(),
                    active,
                    background: if active {
                        self.config.active_color.clone()
                    } else {
                        "transparent".to_string()
                    },
                }
            })
            .collect()
    }

    /// Clears the placeholder text when the editor gains focus.
    pub fn focus(&mut self) {
        let text = self.doc.visible_text();
        if text == DEFAULT_PLACEHOLDER || text == self.config.placeholder_text() {
            self.doc.clear();
            self.hide_toolbar(root_caret());
            self.placeholder_visible = false;
        }
    }

    /// Restores the placeholder when the editor loses focus with nothing in it.
    pub fn blur(&mut self) {
        if self.doc.is_empty() {
            self.doc.children = vec![Node::text(self.config.placeholder_text())];
            self.hide_toolbar(root_caret());
            self.placeholder_visible = true;
        }
    }

    fn hide_toolbar(&mut self, caret: Selection) {
        self.selection = caret;
        self.toolbar = None;
        self.active.clear();
    }

    fn notify_change(&mut self) {
        let markup = render_markup(&self.doc);
        if let Some(listener) = self.on_change.as_mut() {
            listener(&markup);
        }
    }
}
