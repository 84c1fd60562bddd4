use serde::{Deserialize, Serialize};

use crate::document::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub tag: Tag,
    pub label: String,
    /// Attribute the caller must supply before the mark can be created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_attribute: Option<String>,
}

impl FormatDescriptor {
    pub fn new(tag: impl Into<Tag>, label: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            required_attribute: None,
        }
    }

    pub fn requiring(mut self, attribute: impl Into<String>) -> Self {
        self.required_attribute = Some(attribute.into());
        self
    }

    pub fn requires_attribute(&self) -> bool {
        self.required_attribute.is_some()
    }

    /// Matches either the tag or the label, ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.tag.eq_ignore_ascii_case(name) || self.label.eq_ignore_ascii_case(name)
    }
}

pub fn builtin_formats() -> Vec<FormatDescriptor> {
    vec![
        FormatDescriptor::new("b", "bold"),
        FormatDescriptor::new("i", "italic"),
        FormatDescriptor::new("s", "strikethrough"),
        FormatDescriptor::new("u", "underline"),
        FormatDescriptor::new("a", "link").requiring("href"),
        FormatDescriptor::new("code", "code"),
        FormatDescriptor::new("li", "list"),
    ]
}

/// The built-in format named by `name`, looked up by tag or label.
pub fn lookup_builtin(name: &str) -> Option<FormatDescriptor> {
    builtin_formats().into_iter().find(|f| f.matches(name))
}

/// Whether two tags name the same format: equal ignoring ASCII case, or two
/// names of one built-in format (`a` and `link`).
pub fn same_format(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    match (lookup_builtin(a), lookup_builtin(b)) {
        (Some(x), Some(y)) => x.tag == y.tag,
        _ => false,
    }
}

/// Attribute a toggle of `tag` must carry, if any.
pub fn required_attribute(tag: &str) -> Option<String> {
    lookup_builtin(tag).and_then(|f| f.required_attribute)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The formats offered by the toolbar, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatSet {
    formats: Vec<FormatDescriptor>,
}

impl FormatSet {
    pub fn new(formats: impl IntoIterator<Item = FormatDescriptor>) -> Self {
        let mut set = Self::default();
        for format in formats {
            set.push(format);
        }
        set
    }

    pub fn builtin() -> Self {
        Self::new(builtin_formats())
    }

    /// Resolves labels (or tags) against the built-in vocabulary. Names outside
    /// it become plain formats whose tag and label are the name itself.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(labels.into_iter().filter_map(|label| {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return None;
            }
            Some(lookup_builtin(label).unwrap_or_else(|| FormatDescriptor::new(label, label)))
        }))
    }

    fn push(&mut self, format: FormatDescriptor) {
        if self.contains_tag(&format.tag) {
            return;
        }
        self.formats.push(format);
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.formats.iter().any(|f| same_format(&f.tag, tag))
    }

    pub fn get(&self, name: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
