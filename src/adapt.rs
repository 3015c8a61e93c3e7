use std::sync::Arc;

use anyhow::Context as _;

use crate::cache::{AdaptationCache, CacheKey};
use crate::formats::ContentBlock;
use crate::html::{escape, fragment_text};

const MIN_ADAPTABLE_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// `0` and `1` select beginner and intermediate; anything else leaves
    /// content untouched.
    pub fn from_index(value: i64) -> Self {
        match value {
            0 => Self::Beginner,
            1 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFamily {
    Install,
    Command,
    Deploy,
    Generic,
}

struct Rule {
    keywords: &'static [&'static str],
    family: TemplateFamily,
}

const BEGINNER_RULES: &[Rule] = &[
    Rule {
        keywords: &["install"],
        family: TemplateFamily::Install,
    },
    Rule {
        keywords: &["command", "run"],
        family: TemplateFamily::Command,
    },
    Rule {
        keywords: &["deploy", "provision"],
        family: TemplateFamily::Deploy,
    },
];

const INTERMEDIATE_RULES: &[Rule] = &[
    Rule {
        keywords: &["install"],
        family: TemplateFamily::Install,
    },
    Rule {
        keywords: &["command", "run", "workflow", "process"],
        family: TemplateFamily::Command,
    },
    Rule {
        keywords: &["deploy", "provision"],
        family: TemplateFamily::Deploy,
    },
];

fn rules(level: Level) -> &'static [Rule] {
    match level {
        Level::Beginner => BEGINNER_RULES,
        Level::Intermediate => INTERMEDIATE_RULES,
        Level::Advanced => &[],
    }
}

/// First rule (in precedence order) with a keyword contained in `text`,
/// compared case-insensitively.
pub fn select_family(text: &str, level: Level) -> TemplateFamily {
    let lower = text.to_lowercase();
    rules(level)
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lower.contains(keyword)))
        .map_or(TemplateFamily::Generic, |rule| rule.family)
}

pub fn render_template(level: Level, family: TemplateFamily, text: &str) -> String {
    let text = escape(text);
    match (level, family) {
        (Level::Advanced, _) => text,
        (Level::Beginner, TemplateFamily::Install) => format!(
            "<div class=\"adapted-content beginner\">\
<p><strong>Getting set up:</strong> {text}</p>\
<p class=\"adapted-tip\">Installing puts the tool on your computer so you can use it from a terminal. \
Follow the steps for your operating system, then open a new terminal window so it picks up the change.</p>\
</div>"
        ),
        (Level::Beginner, TemplateFamily::Command) => format!(
            "<div class=\"adapted-content beginner\">\
<p><strong>Running a command:</strong> {text}</p>\
<p class=\"adapted-tip\">Type the command into a terminal opened in your project folder and press Enter. \
The tool prints its progress as it works, so wait until it finishes before moving on.</p>\
</div>"
        ),
        (Level::Beginner, TemplateFamily::Deploy) => format!(
            "<div class=\"adapted-content beginner\">\
<p><strong>Putting your app in the cloud:</strong> {text}</p>\
<p class=\"adapted-tip\">Provisioning creates the cloud resources your app needs, such as a web host and a database. \
Deploying copies your code onto those resources so other people can reach it.</p>\
</div>"
        ),
        (Level::Beginner, TemplateFamily::Generic) => format!(
            "<div class=\"adapted-content beginner\">\
<p>{text}</p>\
<p class=\"adapted-tip\">In short: this part explains an idea you will use in the next steps. \
You do not need to memorize it; come back here whenever a later step refers to it.</p>\
</div>"
        ),
        (Level::Intermediate, TemplateFamily::Install) => format!(
            "<div class=\"adapted-content intermediate\">\
<p>{text}</p>\
<p class=\"adapted-note\">Use your platform package manager (winget, Homebrew or the install script) \
and verify the result with <code>azd version</code>.</p>\
</div>"
        ),
        (Level::Intermediate, TemplateFamily::Command) => format!(
            "<div class=\"adapted-content intermediate\">\
<p>{text}</p>\
<p class=\"adapted-note\">Commands run against the current environment; \
check <code>azd env list</code> first when you work with several environments.</p>\
</div>"
        ),
        (Level::Intermediate, TemplateFamily::Deploy) => format!(
            "<div class=\"adapted-content intermediate\">\
<p>{text}</p>\
<p class=\"adapted-note\">Provisioning applies the infrastructure templates in <code>infra/</code>; \
deployment packages each service listed in <code>azure.yaml</code> and pushes it to its host.</p>\
</div>"
        ),
        (Level::Intermediate, TemplateFamily::Generic) => format!(
            "<div class=\"adapted-content intermediate\">\
<p>{text}</p>\
<p class=\"adapted-note\">Keep this in mind when you customize the template for your own project.</p>\
</div>"
        ),
    }
}

fn is_adaptable_text(text: &str) -> bool {
    text.chars().count() >= MIN_ADAPTABLE_CHARS && !text.starts_with(['`', '$'])
}

// Headings share the paragraph block type but keep their tag and anchor.
fn is_paragraph_markup(html: &str) -> bool {
    html.starts_with("<p>") || html.starts_with("<p ")
}

#[derive(Debug, Clone)]
pub struct ContentAdapter {
    cache: Arc<AdaptationCache>,
}

impl ContentAdapter {
    pub fn new(cache: Arc<AdaptationCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &AdaptationCache {
        &self.cache
    }

    /// Rewrites `text` for `level`. Advanced, short and code-like text is
    /// returned unchanged, as is the input whenever adaptation fails.
    pub fn adapt(&self, text: &str, level: Level, section_title: &str) -> String {
        if level == Level::Advanced || !is_adaptable_text(text) {
            return text.to_owned();
        }

        match self.try_adapt(text, level, section_title) {
            Ok(adapted) => adapted,
            Err(err) => {
                tracing::warn!(
                    ?err,
                    level = level.name(),
                    section_title,
                    "content adaptation failed; returning original text"
                );
                text.to_owned()
            }
        }
    }

    fn try_adapt(&self, text: &str, level: Level, section_title: &str) -> anyhow::Result<String> {
        let key = CacheKey::new(text, level, section_title);
        if let Some(hit) = self.cache.get(&key).context("read adaptation cache")? {
            tracing::debug!(%key, "adaptation cache hit");
            return Ok(hit);
        }

        let family = select_family(text, level);
        tracing::debug!(%key, ?family, "adaptation cache miss");
        let adapted = render_template(level, family, text);
        self.cache
            .put(key, adapted.clone())
            .context("store adapted content")?;
        Ok(adapted)
    }

    /// Adapts one content block. Code and zone-pivot blocks come back as-is,
    /// and so do paragraph blocks that hold heading markup.
    ///
    /// Markup-bearing blocks are adapted on their plain text and keep their
    /// original markup when the adapter leaves the text unchanged. A note
    /// keeps its plain text and carries the adapted markup separately.
    pub fn adapt_block(
        &self,
        block: &ContentBlock,
        level: Level,
        section_title: &str,
    ) -> ContentBlock {
        if !block.is_adaptable() {
            return block.clone();
        }
        match block {
            ContentBlock::Paragraph { html } if !is_paragraph_markup(html) => block.clone(),
            ContentBlock::Paragraph { html } => ContentBlock::Paragraph {
                html: self.adapt_html(html, level, section_title),
            },
            ContentBlock::List { ordered, items } => ContentBlock::List {
                ordered: *ordered,
                items: items
                    .iter()
                    .map(|item| self.adapt_html(item, level, section_title))
                    .collect(),
            },
            ContentBlock::Note { text, .. } => {
                let adapted = self.adapt(text, level, section_title);
                ContentBlock::Note {
                    html: (adapted != *text).then_some(adapted),
                    text: text.clone(),
                }
            }
            ContentBlock::ZonePivot { .. } | ContentBlock::Code { .. } => block.clone(),
        }
    }

    fn adapt_html(&self, html: &str, level: Level, section_title: &str) -> String {
        if level == Level::Advanced {
            return html.to_owned();
        }
        let text = fragment_text(html);
        let text = text.trim();
        let adapted = self.adapt(text, level, section_title);
        if adapted == text {
            html.to_owned()
        } else {
            adapted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> ContentAdapter {
        ContentAdapter::new(Arc::new(AdaptationCache::new()))
    }

    const INSTALL: &str = "Install the Azure Developer CLI on your system using the package manager.";
    const COMMAND: &str = "Run the azd up command to package, provision and deploy the app resources.";
    const DEPLOY: &str = "The deployment provisions cloud resources and deploys your application code.";
    const GENERIC: &str = "This tool helps developers quickly ship applications to the cloud.";

    #[test]
    fn level_indices_map_to_levels() {
        assert_eq!(Level::from_index(0), Level::Beginner);
        assert_eq!(Level::from_index(1), Level::Intermediate);
        assert_eq!(Level::from_index(2), Level::Advanced);
        assert_eq!(Level::from_index(-1), Level::Advanced);
        assert_eq!(Level::from_index(7), Level::Advanced);
    }

    #[test]
    fn families_follow_keyword_precedence() {
        assert_eq!(select_family(INSTALL, Level::Beginner), TemplateFamily::Install);
        assert_eq!(select_family(COMMAND, Level::Beginner), TemplateFamily::Command);
        assert_eq!(select_family(DEPLOY, Level::Beginner), TemplateFamily::Deploy);
        assert_eq!(select_family(GENERIC, Level::Beginner), TemplateFamily::Generic);
        assert_eq!(
            select_family("INSTALL before you RUN anything", Level::Beginner),
            TemplateFamily::Install
        );
    }

    #[test]
    fn workflow_and_process_only_count_for_intermediate() {
        let text = "The release workflow is a repeatable process for your team.";
        assert_eq!(select_family(text, Level::Beginner), TemplateFamily::Generic);
        assert_eq!(select_family(text, Level::Intermediate), TemplateFamily::Command);
    }

    #[test]
    fn each_level_and_family_has_a_distinct_template() {
        let mut seen = std::collections::HashSet::new();
        for level in [Level::Beginner, Level::Intermediate] {
            for family in [
                TemplateFamily::Install,
                TemplateFamily::Command,
                TemplateFamily::Deploy,
                TemplateFamily::Generic,
            ] {
                let out = render_template(level, family, "body");
                assert!(out.contains("body"));
                assert!(out.contains(level.name()));
                assert!(seen.insert(out));
            }
        }
    }

    #[test]
    fn advanced_level_returns_input_unchanged() {
        let adapter = adapter();
        for text in [INSTALL, "", "$ azd up", "short"] {
            assert_eq!(adapter.adapt(text, Level::Advanced, "Any"), text);
        }
        assert_eq!(adapter.cache().size().unwrap(), 0);
    }

    #[test]
    fn short_and_code_like_text_is_not_adapted() {
        let adapter = adapter();
        let inputs = [
            "Too short to adapt.",
            "`azd init -t hello-azd` creates a new project from a template",
            "$ azd provision --environment production --no-prompt",
        ];
        for text in inputs {
            for level in [Level::Beginner, Level::Intermediate] {
                assert_eq!(adapter.adapt(text, level, "S"), text);
            }
        }
        assert_eq!(adapter.cache().size().unwrap(), 0);
    }

    #[test]
    fn adaptation_is_memoized() {
        let adapter = adapter();
        let first = adapter.adapt(INSTALL, Level::Beginner, "Installation");
        assert_ne!(first, INSTALL);
        assert!(first.contains(INSTALL));
        assert_eq!(adapter.cache().size().unwrap(), 1);

        let second = adapter.adapt(INSTALL, Level::Beginner, "Installation");
        assert_eq!(first, second);
        assert_eq!(adapter.cache().size().unwrap(), 1);

        adapter.adapt(INSTALL, Level::Intermediate, "Installation");
        adapter.adapt(INSTALL, Level::Beginner, "Other section");
        assert_eq!(adapter.cache().size().unwrap(), 3);
    }

    #[test]
    fn adapted_text_is_escaped() {
        let out = adapter().adapt(
            "Install <b>everything</b> & then keep reading this guide",
            Level::Beginner,
            "S",
        );
        assert!(out.contains("&lt;b&gt;everything&lt;/b&gt; &amp; then"));
    }

    #[test]
    fn code_and_pivot_blocks_are_never_rewritten() {
        let adapter = adapter();
        let blocks = [
            ContentBlock::Code {
                html: format!("<pre><code>{INSTALL}</code></pre>"),
            },
            ContentBlock::ZonePivot {
                pivot_key: "python".to_owned(),
                html: format!("<div class=\"zone-pivot\"><p>{INSTALL}</p></div>"),
            },
        ];
        for block in &blocks {
            assert_eq!(&adapter.adapt_block(block, Level::Beginner, "S"), block);
        }
    }

    #[test]
    fn paragraphs_and_lists_are_adapted_on_plain_text() {
        let adapter = adapter();
        let paragraph = ContentBlock::Paragraph {
            html: format!("<p><strong>{INSTALL}</strong></p>"),
        };
        let ContentBlock::Paragraph { html } = adapter.adapt_block(&paragraph, Level::Beginner, "S")
        else {
            panic!("expected paragraph");
        };
        assert!(html.starts_with("<div class=\"adapted-content beginner\">"));
        assert!(html.contains(INSTALL));

        let list = ContentBlock::List {
            ordered: false,
            items: vec![format!("<em>{DEPLOY}</em>"), "<code>azd up</code>".to_owned()],
        };
        let ContentBlock::List { items, .. } = adapter.adapt_block(&list, Level::Intermediate, "S")
        else {
            panic!("expected list");
        };
        assert!(items[0].contains("adapted-content intermediate"));
        assert_eq!(items[1], "<code>azd up</code>");
    }

    #[test]
    fn heading_blocks_keep_their_tag_and_anchor() {
        let adapter = adapter();
        let heading = ContentBlock::Paragraph {
            html: format!("<h3 id=\"install-on-windows\">{INSTALL}</h3>"),
        };
        for level in [Level::Beginner, Level::Intermediate] {
            assert_eq!(adapter.adapt_block(&heading, level, "S"), heading);
        }
        assert_eq!(adapter.cache().size().unwrap(), 0);
    }

    #[test]
    fn adapted_notes_keep_plain_text_beside_markup() {
        let adapter = adapter();
        let note = ContentBlock::Note {
            text: INSTALL.to_owned(),
            html: None,
        };
        let ContentBlock::Note { text, html } = adapter.adapt_block(&note, Level::Beginner, "S")
        else {
            panic!("expected note");
        };
        assert_eq!(text, INSTALL);
        assert!(html.is_some_and(|html| html.contains("adapted-content beginner")));

        let markup_like = ContentBlock::Note {
            text: "<T> is a type parameter".to_owned(),
            html: None,
        };
        assert_eq!(adapter.adapt_block(&markup_like, Level::Beginner, "S"), markup_like);
        assert_eq!(adapter.adapt_block(&note, Level::Advanced, "S"), note);
    }

    #[test]
    fn code_markers_are_checked_on_the_raw_text() {
        assert!(!is_adaptable_text("$ azd provision --environment production"));
        assert!(!is_adaptable_text("`azd init` creates a new project from a template"));
        assert!(is_adaptable_text("  $ azd provision --environment production"));
        assert!(!is_adaptable_text("  short, padded  "));
    }
}
