use crate::formats::{ContentBlock, SidebarSection, TutorialPage};
use crate::html::escape;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; color: #1b1b1b; }
nav.sidebar { width: 260px; padding: 1rem; background: #f5f5f5; min-height: 100vh; }
nav.sidebar h3 { font-size: 0.9rem; margin: 1rem 0 0.25rem; }
nav.sidebar ul { list-style: none; padding: 0; margin: 0; }
nav.sidebar a { display: block; padding: 0.2rem 0; color: #0f6cbd; text-decoration: none; }
main { flex: 1; max-width: 860px; padding: 1rem 2rem; }
.breadcrumbs { font-size: 0.85rem; color: #616161; }
.toc { border-left: 3px solid #0f6cbd; padding-left: 1rem; }
.note { background: #ebf3fc; border-left: 4px solid #0f6cbd; padding: 0.5rem 1rem; }
.level-control { font-size: 0.85rem; color: #616161; }
.adapted-tip, .adapted-note { color: #424242; font-style: italic; }
pre { background: #f5f5f5; padding: 0.75rem; overflow-x: auto; }
"#;

const SCRIPT: &str = r#"
function escapeHtml(text) {
  const div = document.createElement('div');
  div.textContent = text;
  return div.innerHTML;
}
function renderBlock(block) {
  switch (block.type) {
    case 'list': {
      const tag = block.ordered ? 'ol' : 'ul';
      return '<' + tag + '>' + block.items.map(i => '<li>' + i + '</li>').join('') + '</' + tag + '>';
    }
    case 'note':
      return '<div class="note">' + (block.html || '<p>' + escapeHtml(block.text) + '</p>') + '</div>';
    default:
      return block.html;
  }
}
async function adaptSection(input) {
  const page = document.body.dataset;
  const level = Number(input.value);
  const sectionId = input.dataset.section;
  const resp = await fetch('/adapt-content?lang=' + encodeURIComponent(page.lang), {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ section_id: sectionId, level: level, filename: page.filename }),
  });
  if (!resp.ok) { return; }
  const data = await resp.json();
  document.querySelector('#' + sectionId + ' .section-content').innerHTML =
    data.adapted_content.map(renderBlock).join('');
  fetch('/slider-update', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ section_id: sectionId, level: level }),
  });
}
document.querySelectorAll('input.level').forEach(input => {
  input.addEventListener('change', () => adaptSection(input));
});
"#;

/// Renders a full HTML document for a tutorial page.
pub fn render_page(
    page: &TutorialPage,
    sidebar: &[SidebarSection],
    filename: &str,
    language: &str,
) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&page.title)));
    if let Some(description) = page.meta.get("description").and_then(|v| v.as_str()) {
        out.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape(description)
        ));
    }
    out.push_str("<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n");
    out.push_str(&format!(
        "<body data-filename=\"{}\" data-lang=\"{}\">\n",
        escape(filename),
        escape(language)
    ));

    push_sidebar(&mut out, sidebar);

    out.push_str("<main>\n");
    push_breadcrumbs(&mut out, page);
    out.push_str(&format!("<h1>{}</h1>\n", escape(&page.title)));
    push_toc(&mut out, page);

    for section in &page.sections {
        out.push_str(&format!(
            "<section id=\"{}\">\n<h2>{}</h2>\n",
            escape(&section.id),
            escape(&section.title)
        ));
        out.push_str(&format!(
            "<label class=\"level-control\">Detail level \
<input class=\"level\" type=\"range\" min=\"0\" max=\"2\" value=\"2\" data-section=\"{}\">\
</label>\n",
            escape(&section.id)
        ));
        out.push_str("<div class=\"section-content\">\n");
        for block in &section.content {
            push_block(&mut out, block);
        }
        out.push_str("</div>\n</section>\n");
    }

    out.push_str("</main>\n<script>");
    out.push_str(SCRIPT);
    out.push_str("</script>\n</body>\n</html>\n");
    out
}

fn push_sidebar(out: &mut String, sidebar: &[SidebarSection]) {
    out.push_str("<nav class=\"sidebar\">\n");
    for section in sidebar {
        out.push_str(&format!("<h3>{}</h3>\n<ul>\n", escape(&section.title)));
        for link in &section.links {
            out.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape(&link.url),
                escape(&link.text)
            ));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</nav>\n");
}

fn push_breadcrumbs(out: &mut String, page: &TutorialPage) {
    let crumbs: Vec<String> = page
        .breadcrumbs
        .iter()
        .map(|crumb| match &crumb.url {
            Some(url) => format!("<a href=\"{}\">{}</a>", escape(url), escape(&crumb.name)),
            None => format!("<span>{}</span>", escape(&crumb.name)),
        })
        .collect();
    out.push_str(&format!(
        "<div class=\"breadcrumbs\">{}</div>\n",
        crumbs.join(" / ")
    ));
}

fn push_toc(out: &mut String, page: &TutorialPage) {
    if page.table_of_contents.is_empty() {
        return;
    }
    out.push_str("<nav class=\"toc\">\n<strong>In this article</strong>\n<ul>\n");
    for entry in &page.table_of_contents {
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            escape(&entry.anchor),
            escape(&entry.title)
        ));
    }
    out.push_str("</ul>\n</nav>\n");
}

fn push_block(out: &mut String, block: &ContentBlock) {
    match block {
        ContentBlock::Paragraph { html }
        | ContentBlock::Code { html }
        | ContentBlock::ZonePivot { html, .. } => {
            out.push_str(html);
            out.push('\n');
        }
        ContentBlock::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>\n"));
            for item in items {
                out.push_str(&format!("<li>{item}</li>\n"));
            }
            out.push_str(&format!("</{tag}>\n"));
        }
        ContentBlock::Note { html: Some(html), .. } => {
            out.push_str(&format!("<div class=\"note\">{html}</div>\n"));
        }
        ContentBlock::Note { text, html: None } => {
            out.push_str(&format!(
                "<div class=\"note\"><p>{}</p></div>\n",
                escape(text)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{SidebarLink, TocEntry};
    use crate::tutorial::build_page;

    #[test]
    fn renders_sections_toc_and_sidebar() -> anyhow::Result<()> {
        let page = build_page(
            "overview.md",
            "# Overview\n\n## Setup\n\n> [!NOTE]\n> Sign in first & then continue.\n\n1. one\n2. two\n",
            "nodejs",
        )?;
        let sidebar = vec![SidebarSection {
            title: "Get started".to_owned(),
            links: vec![SidebarLink {
                text: "Install".to_owned(),
                url: "/tutorial/install-azd".to_owned(),
            }],
        }];

        let html = render_page(&page, &sidebar, "overview.md", "nodejs");
        assert!(html.contains("<title>Overview</title>"));
        assert!(html.contains("<a href=\"/tutorial/install-azd\">Install</a>"));
        assert!(html.contains("<section id=\"section-2\">\n<h2>Setup</h2>"));
        assert!(html.contains("<div class=\"note\"><p>Sign in first &amp; then continue.</p></div>"));
        assert!(html.contains("<ol>\n<li>one</li>\n<li>two</li>\n</ol>"));
        assert!(html.contains("data-filename=\"overview.md\""));
        assert!(page.table_of_contents.contains(&TocEntry {
            title: "Setup".to_owned(),
            anchor: "section-2".to_owned()
        }));
        assert!(html.contains("<a href=\"#section-2\">Setup</a>"));
        Ok(())
    }

    #[test]
    fn notes_render_escaped_text_or_adapted_markup() {
        let mut out = String::new();
        push_block(
            &mut out,
            &ContentBlock::Note {
                text: "<T> is a type parameter".to_owned(),
                html: None,
            },
        );
        assert_eq!(
            out,
            "<div class=\"note\"><p>&lt;T&gt; is a type parameter</p></div>\n"
        );

        out.clear();
        push_block(
            &mut out,
            &ContentBlock::Note {
                text: "plain".to_owned(),
                html: Some("<div class=\"adapted-content beginner\"><p>x</p></div>".to_owned()),
            },
        );
        assert_eq!(
            out,
            "<div class=\"note\"><div class=\"adapted-content beginner\"><p>x</p></div></div>\n"
        );
    }
}
