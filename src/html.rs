//! Forgiving HTML parsing helpers on top of html5ever's `RcDom`.

use anyhow::Context as _;
use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parses an HTML fragment by placing it inside a minimal document.
pub fn parse_fragment(html: &str) -> RcDom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .one(wrapped.as_bytes())
}

pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if element_name(handle) == Some(name) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_first_element(child, name))
}

pub fn element_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn attribute(handle: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { ref attrs, .. } = handle.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

pub fn has_class(handle: &Handle, class: &str) -> bool {
    attribute(handle, "class")
        .is_some_and(|value| value.split_whitespace().any(|token| token == class))
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    push_text(handle, &mut text);
    text
}

fn push_text(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => text.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                push_text(child, text);
            }
        }
        _ => {}
    }
}

/// Serializes the node including its own tag.
pub fn outer_html(handle: &Handle) -> anyhow::Result<String> {
    serialize_with_scope(handle, TraversalScope::IncludeNode)
}

/// Serializes only the node's children.
pub fn inner_html(handle: &Handle) -> anyhow::Result<String> {
    serialize_with_scope(handle, TraversalScope::ChildrenOnly(None))
}

fn serialize_with_scope(
    handle: &Handle,
    traversal_scope: TraversalScope,
) -> anyhow::Result<String> {
    let mut bytes = Vec::new();
    let serializable: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    serialize(&mut bytes, &serializable, opts).context("serialize html node")?;
    String::from_utf8(bytes).context("serialized html is not utf-8")
}

/// Plain text of an HTML fragment.
pub fn fragment_text(html: &str) -> String {
    let dom = parse_fragment(html);
    match find_first_element(&dom.document, "body") {
        Some(body) => text_content(&body),
        None => String::new(),
    }
}

pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_text_strips_tags() {
        assert_eq!(
            fragment_text("<p>Run <code>azd up</code> &amp; wait</p>"),
            "Run azd up & wait"
        );
    }

    #[test]
    fn outer_and_inner_html() -> anyhow::Result<()> {
        let dom = parse_fragment("<ul><li>one <em>two</em></li></ul>");
        let li = find_first_element(&dom.document, "li").expect("li");
        assert_eq!(inner_html(&li)?, "one <em>two</em>");
        assert_eq!(outer_html(&li)?, "<li>one <em>two</em></li>");
        Ok(())
    }

    #[test]
    fn class_tokens_are_matched_exactly() {
        let dom = parse_fragment("<div class=\"a zone-pivot b\" data-pivot=\"python\"></div>");
        let div = find_first_element(&dom.document, "div").expect("div");
        assert!(has_class(&div, "zone-pivot"));
        assert!(!has_class(&div, "zone"));
        assert_eq!(attribute(&div, "data-pivot").as_deref(), Some("python"));
    }

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
