use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TutorialPage {
    pub title: String,
    pub meta: BTreeMap<String, serde_json::Value>,
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_paragraph: Option<String>,
    pub sections: Vec<Section>,
    pub table_of_contents: Vec<TocEntry>,
}

impl TutorialPage {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub anchor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph { html: String },
    List { ordered: bool, items: Vec<String> },
    /// `text` is always plain. `html` is set once the note has been adapted.
    Note {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
    ZonePivot { pivot_key: String, html: String },
    Code { html: String },
}

impl ContentBlock {
    /// Code and zone-pivot blocks are never rewritten.
    pub fn is_adaptable(&self) -> bool {
        !matches!(self, Self::Code { .. } | Self::ZonePivot { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarSection {
    pub title: String,
    pub links: Vec<SidebarLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavDescriptor {
    #[serde(default)]
    pub landing_content: Vec<NavSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link_lists: Vec<NavLinkList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavLinkList {
    #[serde(default)]
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavLink {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheStatus {
    pub cache_size: usize,
    pub cached_items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheCleared {
    pub status: String,
    pub message: String,
    pub cache_size: usize,
}
