use std::io::Read as _;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;

use adaptdocs::adapt::{ContentAdapter, Level};
use adaptdocs::cache::AdaptationCache;
use adaptdocs::cli::{AdaptArgs, Cli, Command, PageArgs};
use adaptdocs::tutorial::{TutorialLoader, tutorial_filename};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    adaptdocs::logging::init(adaptdocs::logging::CLI_DEFAULT_FILTER).context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Page(args) => page(args).context("page")?,
        Command::Adapt(args) => adapt(args).context("adapt")?,
        Command::Sidebar(args) => {
            let sidebar = adaptdocs::sidebar::load_sidebar(Path::new(&args.nav))
                .context("sidebar")?;
            println!("{}", serde_json::to_string_pretty(&sidebar)?);
        }
        Command::Cache { command } => {
            adaptdocs::cache_admin::run(command).await.context("cache")?;
        }
    }

    Ok(())
}

fn page(args: PageArgs) -> anyhow::Result<()> {
    let loader = TutorialLoader::new(&args.docs_dir);
    let filename = tutorial_filename(args.file.as_deref());
    let page = loader.load(&filename, &args.lang);
    println!(
        "{}",
        serde_json::to_string_pretty(&page).context("serialize page")?
    );
    Ok(())
}

fn adapt(args: AdaptArgs) -> anyhow::Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read text from stdin")?;
            buf
        }
    };

    let adapter = ContentAdapter::new(Arc::new(AdaptationCache::new()));
    let adapted = adapter.adapt(&text, Level::from_index(args.level), &args.section_title);
    println!("{adapted}");
    Ok(())
}
