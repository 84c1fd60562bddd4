use crate::document::{Document, Node};

/// Renders the document as nested tags, e.g. `Hello <b>world</b>`.
pub fn render_markup(doc: &Document) -> String {
    let mut out = String::new();
    render_nodes(&doc.children, &mut out);
    out
}

fn render_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => escape_into(&t.text, false, out),
            Node::Mark(mark) => {
                out.push('<');
                out.push_str(&mark.tag);
                for (name, value) in &mark.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                render_nodes(&mark.children, out);
                out.push_str("</");
                out.push_str(&mark.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
