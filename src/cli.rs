use clap::{Args, Parser, Subcommand};

pub const DEFAULT_APP_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LANGUAGE: &str = "nodejs";

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Page(PageArgs),
    Adapt(AdaptArgs),
    Sidebar(SidebarArgs),
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Directory holding the markdown tutorials.
    #[arg(long)]
    pub docs_dir: String,

    /// Tutorial name (`.md` is appended when missing).
    #[arg(long)]
    pub file: Option<String>,

    /// Zone pivot language.
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,
}

#[derive(Debug, Args)]
pub struct AdaptArgs {
    /// 0 = beginner, 1 = intermediate, 2 = advanced (unchanged).
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    pub level: i64,

    /// Section the text belongs to.
    #[arg(long, default_value = "")]
    pub section_title: String,

    /// Text to adapt (default: read from stdin).
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Debug, Args)]
pub struct SidebarArgs {
    /// Navigation descriptor (`index.yml`).
    #[arg(long)]
    pub nav: String,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    Status(CacheArgs),
    Clear(CacheArgs),
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    /// Base URL of a running adaptdocs-app.
    #[arg(long, default_value = DEFAULT_APP_URL)]
    pub url: String,
}
