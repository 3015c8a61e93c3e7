use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;
use url::Url;

use crate::formats::{NavDescriptor, SidebarLink, SidebarSection};

pub fn load_sidebar(path: &Path) -> anyhow::Result<Vec<SidebarSection>> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("read navigation descriptor: {}", path.display()))?;
    let nav: NavDescriptor =
        serde_yaml::from_str(&yaml).context("deserialize navigation descriptor")?;
    Ok(build_sidebar(&nav))
}

/// One sidebar section per landing-content entry; links point at
/// `/tutorial/<name>` and repeated targets within a section are dropped.
pub fn build_sidebar(nav: &NavDescriptor) -> Vec<SidebarSection> {
    nav.landing_content
        .iter()
        .map(|section| {
            let mut seen = HashSet::new();
            let links = section
                .link_lists
                .iter()
                .flat_map(|list| list.links.iter())
                .filter_map(|link| {
                    let url = tutorial_route(&link.url);
                    seen.insert(url.clone()).then(|| SidebarLink {
                        text: link.text.clone(),
                        url,
                    })
                })
                .collect();
            SidebarSection {
                title: section.title.clone(),
                links,
            }
        })
        .collect()
}

pub fn tutorial_route(original_url: &str) -> String {
    let filename = markdown_filename(original_url);
    format!("/tutorial/{}", filename.replace(".md", ""))
}

/// Maps a navigation url to the markdown file that backs it.
pub fn markdown_filename(url: &str) -> String {
    if url.starts_with("http") {
        return match Url::parse(url) {
            Ok(parsed) => match last_segment(parsed.path()) {
                Some(segment) => format!("{segment}.md"),
                None => format!(
                    "{}.md",
                    parsed.host_str().unwrap_or_default().replace('.', "_")
                ),
            },
            Err(err) => {
                tracing::debug!(url, ?err, "unparsable external url; using last segment");
                internal_filename(url)
            }
        };
    }
    if url.ends_with(".md") {
        return url.to_owned();
    }
    if url.ends_with(".yml") {
        return url.replace(".yml", ".md");
    }
    internal_filename(url)
}

fn internal_filename(url: &str) -> String {
    match last_segment(url) {
        Some(segment) => format!("{segment}.md"),
        None => "content.md".to_owned(),
    }
}

fn last_segment(path: &str) -> Option<&str> {
    path.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
