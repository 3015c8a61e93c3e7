use markup5ever_rcdom::Handle;

use crate::formats::{ContentBlock, Section};
use crate::html::{
    attribute, element_name, find_first_element, has_class, inner_html, outer_html,
    parse_fragment, text_content,
};

pub const INTRODUCTION_TITLE: &str = "Introduction";
pub const FALLBACK_TITLE: &str = "Content";

#[derive(Debug)]
struct PendingSection {
    title: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Default)]
struct Sectionizer {
    sections: Vec<Section>,
    current: Option<PendingSection>,
}

impl Sectionizer {
    fn start_section(&mut self, title: String) {
        self.finish_current();
        self.current = Some(PendingSection {
            title,
            content: Vec::new(),
        });
    }

    fn push(&mut self, block: ContentBlock) {
        self.current
            .get_or_insert_with(|| PendingSection {
                title: INTRODUCTION_TITLE.to_owned(),
                content: Vec::new(),
            })
            .content
            .push(block);
    }

    fn finish_current(&mut self) {
        if let Some(pending) = self.current.take()
            && !pending.content.is_empty()
        {
            let id = format!("section-{}", self.sections.len() + 1);
            self.sections.push(Section {
                id,
                title: pending.title,
                content: pending.content,
            });
        }
    }

    fn finish(mut self, raw_html: &str) -> Vec<Section> {
        self.finish_current();
        if self.sections.is_empty() {
            return vec![Section {
                id: "section-1".to_owned(),
                title: FALLBACK_TITLE.to_owned(),
                content: vec![ContentBlock::Paragraph {
                    html: raw_html.to_owned(),
                }],
            }];
        }
        self.sections
    }
}

/// Buckets rendered HTML into sections, one per `h2`.
///
/// Content before the first `h2` goes to an implicit "Introduction" section.
/// Sections without content are dropped; a document that yields nothing
/// becomes a single "Content" section holding the raw HTML.
pub fn sectionize(html: &str) -> anyhow::Result<Vec<Section>> {
    let dom = parse_fragment(html);
    let mut sectionizer = Sectionizer::default();

    if let Some(body) = find_first_element(&dom.document, "body") {
        for node in body.children.borrow().iter() {
            let Some(name) = element_name(node) else {
                continue;
            };
            match name {
                "h2" => sectionizer.start_section(text_content(node).trim().to_owned()),
                "h1" | "h3" | "h4" | "h5" | "h6" => sectionizer.push(ContentBlock::Paragraph {
                    html: outer_html(node)?,
                }),
                "p" => {
                    if let Some(block) = paragraph_block(node)? {
                        sectionizer.push(block);
                    }
                }
                "ul" | "ol" => {
                    if let Some(block) = list_block(node, name == "ol")? {
                        sectionizer.push(block);
                    }
                }
                "pre" | "table" => sectionizer.push(ContentBlock::Code {
                    html: outer_html(node)?,
                }),
                "blockquote" => {
                    if let Some(block) = note_block(node) {
                        sectionizer.push(block);
                    }
                }
                "div" => {
                    if let Some(block) = zone_pivot_block(node)? {
                        sectionizer.push(block);
                    }
                }
                other => tracing::trace!(element = other, "dropping unsupported element"),
            }
        }
    }

    Ok(sectionizer.finish(html))
}

fn paragraph_block(node: &Handle) -> anyhow::Result<Option<ContentBlock>> {
    let text = text_content(node);
    let text = text.trim();
    if text.is_empty() || is_callout_marker(text) || is_zone_artifact(text) {
        return Ok(None);
    }
    Ok(Some(ContentBlock::Paragraph {
        html: outer_html(node)?,
    }))
}

// Callouts are rendered from their blockquote; a bare marker paragraph would duplicate them.
fn is_callout_marker(text: &str) -> bool {
    text.strip_prefix("[!")
        .is_some_and(|rest| rest.contains(']'))
}

fn is_zone_artifact(text: &str) -> bool {
    text.starts_with(":::") && text.contains("zone")
}

fn list_block(node: &Handle, ordered: bool) -> anyhow::Result<Option<ContentBlock>> {
    let mut items = Vec::new();
    for child in node.children.borrow().iter() {
        if element_name(child) == Some("li") {
            items.push(inner_html(child)?);
        }
    }
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(ContentBlock::List { ordered, items }))
}

fn note_block(node: &Handle) -> Option<ContentBlock> {
    let text = text_content(node);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let note = if let Some(rest) = text.strip_prefix("[!NOTE]") {
        rest.trim()
    } else if let Some(rest) = text.strip_prefix("[!") {
        match rest.find(']') {
            Some(close) => rest[close + 1..].trim(),
            None => text,
        }
    } else {
        text
    };

    (!note.is_empty()).then(|| ContentBlock::Note {
        text: note.to_owned(),
        html: None,
    })
}

fn zone_pivot_block(node: &Handle) -> anyhow::Result<Option<ContentBlock>> {
    if !has_class(node, "zone-pivot") {
        return Ok(None);
    }
    let pivot_key = attribute(node, "data-pivot")
        .or_else(|| attribute(node, "pivot"))
        .unwrap_or_default();
    Ok(Some(ContentBlock::ZonePivot {
        pivot_key,
        html: outer_html(node)?,
    }))
}
