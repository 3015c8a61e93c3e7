use std::fs;
use std::sync::Arc;

use adaptdocs::adapt::{ContentAdapter, Level};
use adaptdocs::cache::AdaptationCache;
use adaptdocs::formats::ContentBlock;
use adaptdocs::tutorial::{TutorialLoader, build_page};

#[test]
fn h2_sections_hold_paragraphs_and_lists() -> anyhow::Result<()> {
    let page = build_page(
        "x.md",
        "## A\nHello world this is long enough text.\n## B\n- x\n- y",
        "nodejs",
    )?;

    assert_eq!(page.sections.len(), 2);
    assert_eq!(page.sections[0].title, "A");
    assert_eq!(page.sections[0].id, "section-1");
    assert_eq!(
        page.sections[0].content,
        vec![ContentBlock::Paragraph {
            html: "<p>Hello world this is long enough text.</p>".to_owned()
        }]
    );
    assert_eq!(page.sections[1].title, "B");
    assert_eq!(page.sections[1].id, "section-2");
    assert_eq!(
        page.sections[1].content,
        vec![ContentBlock::List {
            ordered: false,
            items: vec!["x".to_owned(), "y".to_owned()]
        }]
    );
    assert_eq!(page.title, "X");
    assert!(page.intro_paragraph.is_none());
    assert_eq!(page.table_of_contents.len(), 2);
    Ok(())
}

const DEPLOY_MD: &str = "---
title: Deploy your app
ms.topic: tutorial
---
Intro text for the deployment walkthrough.

::: zone pivot=\"programming-language-nodejs\"

## Node setup

Install the Node.js dependencies before you deploy the app.

::: zone-end

::: zone pivot=\"programming-language-python\"

## Python setup

Create a virtual environment.

::: zone-end

## Clean up

> [!TIP]
> Delete the resource group when you are done.
";

#[test]
fn loader_applies_front_matter_and_first_pivot() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    fs::write(dir.path().join("deploy-app.md"), DEPLOY_MD)?;
    let loader = TutorialLoader::new(dir.path());

    for language in ["nodejs", "python"] {
        let page = loader.load("deploy-app.md", language);
        assert_eq!(page.title, "Deploy your app");
        assert_eq!(page.meta["ms.topic"], "tutorial");

        let titles: Vec<_> = page.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Introduction", "Node setup", "Clean up"]);
        assert_eq!(
            page.intro_paragraph.as_deref(),
            Some("<p>Intro text for the deployment walkthrough.</p>")
        );
        assert_eq!(
            page.sections[2].content,
            vec![ContentBlock::Note {
                text: "Delete the resource group when you are done.".to_owned(),
                html: None,
            }]
        );
    }
    Ok(())
}

#[test]
fn sections_adapt_per_level_and_share_the_cache() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    fs::write(dir.path().join("deploy-app.md"), DEPLOY_MD)?;
    let page = TutorialLoader::new(dir.path()).load("deploy-app.md", "nodejs");
    let section = page.section("section-2").expect("node section");
    let block = &section.content[0];

    let adapter = ContentAdapter::new(Arc::new(AdaptationCache::new()));
    assert_eq!(adapter.adapt_block(block, Level::Advanced, &section.title), *block);

    let ContentBlock::Paragraph { html } =
        adapter.adapt_block(block, Level::Beginner, &section.title)
    else {
        panic!("expected paragraph");
    };
    assert!(html.contains("adapted-content beginner"));
    assert!(html.contains("Getting set up:"));
    assert_eq!(adapter.cache().size()?, 1);

    adapter.adapt_block(block, Level::Beginner, &section.title);
    assert_eq!(adapter.cache().size()?, 1);
    adapter.adapt_block(block, Level::Intermediate, &section.title);
    assert_eq!(adapter.cache().size()?, 2);
    Ok(())
}
