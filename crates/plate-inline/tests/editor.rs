use std::cell::RefCell;
use std::rc::Rc;

use plate_inline::{
    BoundingBox, DEFAULT_PLACEHOLDER, Document, Editor, EditorConfig, NoPrompt, Node, Point,
    RangeError, ScrollOffset, Selection, SelectionChange, ToggleOutcome, ToolbarPosition, position,
    prompt_fn,
};

fn recorder(editor: &mut Editor) -> Rc<RefCell<Vec<String>>> {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    editor.on_content_change(move |markup| sink.borrow_mut().push(markup.to_string()));
    changes
}

fn caret(editor: &mut Editor, path: Vec<usize>, offset: usize) {
    editor
        .handle_selection_change(SelectionChange {
            selection: Some(Selection::collapsed(Point::new(path, offset))),
            ..SelectionChange::default()
        })
        .unwrap();
}

fn select(editor: &mut Editor, selection: Selection) {
    editor
        .handle_selection_change(SelectionChange {
            selection: Some(selection),
            bounds: BoundingBox::new(100.0, 40.0, 80.0, 18.0),
            scroll: ScrollOffset::new(5.0, 200.0),
        })
        .unwrap();
}

#[test]
fn toolbar_sits_below_the_selection_top_accounting_for_scroll() {
    let at = position(
        BoundingBox::new(100.0, 40.0, 80.0, 18.0),
        ScrollOffset::new(5.0, 200.0),
        20.0,
    );
    assert_eq!(
        at,
        ToolbarPosition {
            top: 320.0,
            left: 45.0
        }
    );
}

#[test]
fn selection_change_shows_toolbar_and_active_formats() {
    let doc = Document::new(vec![
        Node::text("Hello "),
        Node::mark("b", vec![Node::text("world")]),
    ]);
    let mut editor = Editor::with_document(doc, EditorConfig::default());

    select(&mut editor, Selection::in_text(vec![1, 0], 1..4));

    assert_eq!(
        editor.toolbar(),
        Some(ToolbarPosition {
            top: 320.0,
            left: 45.0
        })
    );
    assert!(editor.active_styles().contains("b"));

    editor
        .handle_selection_change(SelectionChange {
            selection: Some(Selection::collapsed(Point::new(vec![0], 2))),
            ..SelectionChange::default()
        })
        .unwrap();
    assert_eq!(editor.toolbar(), None);
    assert!(editor.active_styles().is_empty());

    editor
        .handle_selection_change(SelectionChange::default())
        .unwrap();
    assert_eq!(editor.toolbar(), None);
}

#[test]
fn toolbar_buttons_follow_configured_formats() {
    let config = EditorConfig {
        formats: vec!["italic".to_string(), "bold".to_string(), "link".to_string()],
        active_color: "#ff0000".to_string(),
        ..EditorConfig::default()
    };
    let doc = Document::new(vec![Node::mark("b", vec![Node::text("bold")])]);
    let mut editor = Editor::with_document(doc, config);
    select(&mut editor, Selection::in_text(vec![0, 0], 0..4));

    assert_eq!(editor.formats().len(), 3);
    assert_eq!(editor.config().active_color, "#ff0000");
    let buttons = editor.toolbar_buttons();

    let summary: Vec<_> = buttons
        .iter()
        .map(|b| (b.tag.as_str(), b.active, b.background.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("i", false, "transparent"),
            ("b", true, "#ff0000"),
            ("a", false, "transparent"),
        ]
    );
}

#[test]
fn toggle_format_wraps_and_reports_markup() {
    let mut editor = Editor::with_document(
        Document::from_text("Hello world"),
        EditorConfig::default(),
    );
    let changes = recorder(&mut editor);
    select(&mut editor, Selection::in_text(vec![0], 6..11));

    let outcome = editor.toggle_format("b", &mut NoPrompt).unwrap();

    assert!(matches!(outcome, ToggleOutcome::Wrapped { .. }));
    assert_eq!(editor.markup(), "Hello <b>world</b>");
    assert_eq!(editor.selection(), &Selection::collapsed(Point::new(vec![], 2)));
    assert_eq!(*changes.borrow(), vec!["Hello <b>world</b>".to_string()]);
}

#[test]
fn wrapping_hides_the_toolbar_and_clears_active_styles() {
    let doc = Document::new(vec![Node::mark("i", vec![Node::text("Hello world")])]);
    let mut editor = Editor::with_document(doc, EditorConfig::default());
    select(&mut editor, Selection::in_text(vec![0, 0], 6..11));
    assert!(editor.toolbar().is_some());
    assert!(editor.active_styles().contains("i"));

    editor.toggle_format("b", &mut NoPrompt).unwrap();

    assert_eq!(editor.markup(), "<i>Hello <b>world</b></i>");
    assert!(editor.selection().is_collapsed());
    assert_eq!(editor.toolbar(), None);
    assert!(editor.active_styles().is_empty());
}

#[test]
fn unwrapping_drops_the_tag_from_active_styles() {
    let doc = Document::new(vec![
        Node::text("Hello "),
        Node::mark("i", vec![Node::mark("b", vec![Node::text("world")])]),
    ]);
    let mut editor = Editor::with_document(doc, EditorConfig::default());
    select(&mut editor, Selection::in_text(vec![1, 0, 0], 0..5));
    assert_eq!(
        editor.active_styles().as_slice(),
        ["b".to_string(), "i".to_string()]
    );

    let outcome = editor.toggle_format("b", &mut NoPrompt).unwrap();

    assert!(matches!(outcome, ToggleOutcome::Unwrapped { .. }));
    assert_eq!(editor.active_styles().as_slice(), ["i".to_string()]);
    assert_eq!(editor.markup(), "Hello <i>world</i>");
    assert_eq!(editor.selection(), &Selection::in_text(vec![1, 0], 0..5));
}

#[test]
fn link_toolbar_action_prompts_for_href() {
    let mut editor = Editor::with_document(Document::from_text("read docs"), EditorConfig::default());
    select(&mut editor, Selection::in_text(vec![0], 5..9));

    let mut prompt = prompt_fn(|_, attribute| {
        assert_eq!(attribute, "href");
        Some("https://x.dev/?a=1&b=\"2\"".to_string())
    });
    editor.toggle_format("a", &mut prompt).unwrap();

    assert_eq!(
        editor.markup(),
        "read <a href=\"https://x.dev/?a=1&amp;b=&quot;2&quot;\">docs</a>"
    );
}

#[test]
fn declined_link_prompt_leaves_document_and_listener_untouched() {
    let calls = Rc::new(RefCell::new(0usize));
    let mut editor = Editor::with_document(Document::from_text("read docs"), EditorConfig::default());
    let counter = calls.clone();
    editor.on_content_change(move |_| *counter.borrow_mut() += 1);
    select(&mut editor, Selection::in_text(vec![0], 5..9));

    let outcome = editor.toggle_format("link", &mut NoPrompt).unwrap();

    assert!(matches!(outcome, ToggleOutcome::Abandoned { .. }));
    assert_eq!(editor.markup(), "read docs");
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn placeholder_clears_on_focus_and_returns_on_blur() {
    let mut editor = Editor::new(EditorConfig::default());
    assert!(editor.is_placeholder_visible());
    assert_eq!(editor.doc().visible_text(), DEFAULT_PLACEHOLDER);

    editor.focus();
    assert!(!editor.is_placeholder_visible());
    assert!(editor.doc().is_empty());

    editor.blur();
    assert!(editor.is_placeholder_visible());
    assert_eq!(editor.doc().visible_text(), DEFAULT_PLACEHOLDER);
}

#[test]
fn custom_placeholder_and_real_content_survive_focus_cycles() {
    let config = EditorConfig {
        placeholder: Some("Type here...".to_string()),
        ..EditorConfig::default()
    };
    let mut editor = Editor::new(config.clone());
    assert_eq!(editor.markup(), "Type here...");
    editor.focus();
    assert_eq!(editor.markup(), "");

    let mut editor = Editor::with_document(Document::from_text("notes"), config);
    editor.focus();
    editor.blur();
    assert_eq!(editor.markup(), "notes");
    assert!(!editor.is_placeholder_visible());
}

#[test]
fn malformed_selection_drops_the_previous_one() {
    let doc = Document::new(vec![
        Node::text("Hello "),
        Node::mark("b", vec![Node::text("world")]),
    ]);
    let mut editor = Editor::with_document(doc, EditorConfig::default());
    select(&mut editor, Selection::in_text(vec![1, 0], 0..5));
    assert!(editor.active_styles().contains("b"));

    let err = editor
        .handle_selection_change(SelectionChange {
            selection: Some(Selection::in_text(vec![7], 0..1)),
            ..SelectionChange::default()
        })
        .unwrap_err();

    assert_eq!(err, RangeError::MissingNode { path: vec![7] });
    assert_eq!(editor.toolbar(), None);
    assert!(editor.active_styles().is_empty());
    assert!(editor.selection().is_collapsed());

    let outcome = editor.toggle_format("b", &mut NoPrompt).unwrap();
    assert!(matches!(outcome, ToggleOutcome::Unchanged { .. }));
    assert_eq!(editor.markup(), "Hello <b>world</b>");
}

#[test]
fn typing_after_focus_replaces_the_placeholder() {
    let mut editor = Editor::new(EditorConfig::default());
    let changes = recorder(&mut editor);

    editor.focus();
    editor.insert_text("Hi").unwrap();
    editor.insert_text(" there").unwrap();

    assert!(!editor.is_placeholder_visible());
    assert_eq!(editor.markup(), "Hi there");
    assert_eq!(*changes.borrow(), vec!["Hi".to_string(), "Hi there".to_string()]);

    editor.blur();
    assert_eq!(editor.markup(), "Hi there");
}

#[test]
fn typing_over_a_visible_placeholder_clears_it_first() {
    let mut editor = Editor::new(EditorConfig::default());

    editor.insert_text("x").unwrap();

    assert_eq!(editor.markup(), "x");
    assert!(!editor.is_placeholder_visible());
}

#[test]
fn typing_lands_at_the_caret() {
    let doc = Document::new(vec![
        Node::text("a "),
        Node::mark("b", vec![Node::text("bold")]),
    ]);
    let mut editor = Editor::with_document(doc, EditorConfig::default());

    caret(&mut editor, vec![1, 0], 4);
    editor.insert_text("er").unwrap();
    assert_eq!(editor.markup(), "a <b>bolder</b>");
    assert_eq!(editor.selection(), &Selection::collapsed(Point::new(vec![1, 0], 6)));

    caret(&mut editor, vec![], 2);
    editor.insert_text("!").unwrap();
    assert_eq!(editor.markup(), "a <b>bolder</b>!");
    assert_eq!(editor.doc().children_at(&[]).map(<[Node]>::len), Some(3));

    caret(&mut editor, vec![1], 0);
    editor.insert_text("very ").unwrap();
    assert_eq!(editor.markup(), "a <b>very bolder</b>!");
    assert_eq!(editor.doc().children_at(&[1]).map(<[Node]>::len), Some(2));
}

#[test]
fn typing_replaces_a_selected_run() {
    let mut editor = Editor::with_document(Document::from_text("Hello world"), EditorConfig::default());
    let changes = recorder(&mut editor);
    select(&mut editor, Selection::in_text(vec![0], 6..11));

    editor.insert_text("thére").unwrap();

    assert_eq!(editor.markup(), "Hello thére");
    assert_eq!(editor.selection(), &Selection::collapsed(Point::new(vec![0], 11)));
    assert_eq!(editor.toolbar(), None);
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn typing_over_a_selection_across_nodes_is_refused() {
    let doc = Document::new(vec![
        Node::text("Hello "),
        Node::mark("b", vec![Node::text("world")]),
    ]);
    let mut editor = Editor::with_document(doc.clone(), EditorConfig::default());
    select(
        &mut editor,
        Selection::new(Point::new(vec![0], 2), Point::new(vec![1, 0], 3)),
    );

    let err = editor.insert_text("x").unwrap_err();

    assert_eq!(
        err,
        RangeError::SpansNodes {
            start: vec![0],
            end: vec![1, 0],
        }
    );
    assert_eq!(editor.doc(), &doc);
}
