//! Display values produced by column render functions.

use serde_json::Value;

use crate::value::value_text;

/// What a cell shows.
///
/// Render functions may return plain text or numbers, or a small tree of
/// nodes (for example a chip containing a name and a badge). Text is always
/// recoverable from it with [`extract_text`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Node(DisplayNode),
    /// A sequence of sibling values. Extracted text is joined with spaces.
    List(Vec<DisplayValue>),
}

/// A nested display element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayNode {
    /// Element kind, e.g. `"chip"` or `"link"`. Purely informational.
    pub tag: String,
    pub children: Vec<DisplayValue>,
    /// Tooltip-like text, used when the node has no children.
    pub title: Option<String>,
    /// Value-like text, used when the node has neither children nor a title.
    pub value: Option<String>,
}

impl DisplayNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn child(mut self, child: impl Into<DisplayValue>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = DisplayValue>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl DisplayValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Display form of a raw cell value, used when a column has no render
    /// function.
    pub fn from_raw(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::Number(n)) => n.as_f64().map(Self::Number).unwrap_or_default(),
            Some(other) => Self::Text(value_text(other)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<&str> for DisplayValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DisplayValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for DisplayValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for DisplayValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<DisplayNode> for DisplayValue {
    fn from(node: DisplayNode) -> Self {
        Self::Node(node)
    }
}

impl From<Vec<DisplayValue>> for DisplayValue {
    fn from(items: Vec<DisplayValue>) -> Self {
        Self::List(items)
    }
}

/// Plain text of a display value.
///
/// Depth-first: node children are concatenated without separators, list
/// items are joined with a single space, and childless nodes fall back to
/// their title and then their value. Never fails; empty values yield `""`.
pub fn extract_text(value: &DisplayValue) -> String {
    match value {
        DisplayValue::Empty => String::new(),
        DisplayValue::Text(text) => text.clone(),
        DisplayValue::Number(n) => format_number(*n),
        DisplayValue::Node(node) => {
            if !node.children.is_empty() {
                node.children.iter().map(extract_text).collect()
            } else if let Some(title) = node.title.as_deref().filter(|t| !t.is_empty()) {
                title.to_string()
            } else {
                node.value.clone().unwrap_or_default()
            }
        }
        DisplayValue::List(items) => items.iter().map(extract_text).collect::<Vec<_>>().join(" "),
    }
}

/// Number formatting without a trailing `.0` for integral values.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.25), "1.25");
    }
}
