use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::formats::{Breadcrumb, ContentBlock, Section, TocEntry, TutorialPage};
use crate::frontmatter::split_front_matter;
use crate::html::escape;
use crate::pivot::filter_zone_pivots;
use crate::render::render_markdown;
use crate::sectionize::{INTRODUCTION_TITLE, sectionize};

pub const DEFAULT_TUTORIAL: &str = "overview.md";

/// Normalizes a requested tutorial name: empty means the overview page and
/// a missing `.md` suffix is appended.
pub fn tutorial_filename(name: Option<&str>) -> String {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return DEFAULT_TUTORIAL.to_owned();
    }
    if name.ends_with(".md") {
        name.to_owned()
    } else {
        format!("{name}.md")
    }
}

/// `get-started.md` -> `Get Started`.
pub fn title_from_filename(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct TutorialLoader {
    docs_dir: PathBuf,
}

impl TutorialLoader {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
        }
    }

    /// Always returns a renderable page: a placeholder when the file is
    /// missing and an error page when it cannot be read or parsed.
    pub fn load(&self, filename: &str, language: &str) -> TutorialPage {
        match self.try_load(filename, language) {
            Ok(Some(page)) => page,
            Ok(None) => {
                tracing::info!(filename, "tutorial not found; serving placeholder");
                not_found_page(filename)
            }
            Err(err) => {
                tracing::error!(filename, ?err, "failed to load tutorial");
                error_page(filename, &err)
            }
        }
    }

    fn try_load(&self, filename: &str, language: &str) -> anyhow::Result<Option<TutorialPage>> {
        let path = self.tutorial_path(filename)?;
        if !path.is_file() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read tutorial: {}", path.display()))?;
        let page = build_page(filename, &raw, language)
            .with_context(|| format!("build tutorial page: {}", path.display()))?;
        Ok(Some(page))
    }

    fn tutorial_path(&self, filename: &str) -> anyhow::Result<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(std::path::Component::Normal(name)), None) => Ok(self.docs_dir.join(name)),
            _ => anyhow::bail!("tutorial name must be a plain file name: {filename:?}"),
        }
    }
}

/// Builds a page from raw markdown: front matter, zone pivots, markdown
/// rendering, then sectioning.
pub fn build_page(filename: &str, raw: &str, language: &str) -> anyhow::Result<TutorialPage> {
    let (front_matter, body) = split_front_matter(raw);
    let meta = front_matter.map(parse_meta).unwrap_or_default();

    let markdown = filter_zone_pivots(body, language);
    let rendered = render_markdown(&markdown);
    let sections = sectionize(&rendered.html).context("sectionize rendered html")?;

    let title = rendered
        .first_title()
        .map(str::to_owned)
        .or_else(|| {
            meta.get("title")
                .and_then(|value| value.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| title_from_filename(filename));

    let intro_paragraph = sections
        .first()
        .filter(|section| section.title == INTRODUCTION_TITLE)
        .and_then(|section| {
            section.content.iter().find_map(|block| match block {
                ContentBlock::Paragraph { html } if html.starts_with("<p>") => Some(html.clone()),
                _ => None,
            })
        });

    Ok(assemble_page(title, meta, intro_paragraph, sections))
}

fn parse_meta(yaml: &str) -> BTreeMap<String, serde_json::Value> {
    if yaml.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_yaml::from_str(yaml) {
        Ok(meta) => meta,
        Err(err) => {
            tracing::debug!(?err, "front matter is not a YAML mapping; ignoring");
            BTreeMap::new()
        }
    }
}

fn assemble_page(
    title: String,
    meta: BTreeMap<String, serde_json::Value>,
    intro_paragraph: Option<String>,
    sections: Vec<Section>,
) -> TutorialPage {
    let table_of_contents = sections
        .iter()
        .map(|section| TocEntry {
            title: section.title.clone(),
            anchor: section.id.clone(),
        })
        .collect();
    let breadcrumbs = vec![
        Breadcrumb {
            name: "Docs".to_owned(),
            url: Some("/tutorial".to_owned()),
        },
        Breadcrumb {
            name: title.clone(),
            url: None,
        },
    ];

    TutorialPage {
        title,
        meta,
        breadcrumbs,
        intro_paragraph,
        sections,
        table_of_contents,
    }
}

fn single_section_page(title: String, section_title: &str, html: String) -> TutorialPage {
    let sections = vec![Section {
        id: "section-1".to_owned(),
        title: section_title.to_owned(),
        content: vec![ContentBlock::Paragraph { html }],
    }];
    assemble_page(title, BTreeMap::new(), None, sections)
}

fn not_found_page(filename: &str) -> TutorialPage {
    single_section_page(
        title_from_filename(filename),
        "Not Found",
        format!(
            "<p>The tutorial <code>{}</code> does not exist yet.</p>",
            escape(filename)
        ),
    )
}

fn error_page(filename: &str, err: &anyhow::Error) -> TutorialPage {
    single_section_page(
        "Error".to_owned(),
        "Error",
        format!(
            "<p>Failed to load <code>{}</code>: {}</p>",
            escape(filename),
            escape(&format!("{err:#}"))
        ),
    )
}
