use std::time::Duration;

use anyhow::Context as _;

use crate::cli::{CacheArgs, CacheCommand};
use crate::formats::{CacheCleared, CacheStatus};

const SAMPLE_KEYS: usize = 5;

pub async fn run(command: CacheCommand) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("build http client")?;

    match command {
        CacheCommand::Status(CacheArgs { url }) => {
            let status = fetch_status(&client, &url).await?;
            println!("Cache status: {} cached items", status.cache_size);
            for key in status.cached_items.iter().take(SAMPLE_KEYS) {
                println!("  {key}");
            }
        }
        CacheCommand::Clear(CacheArgs { url }) => {
            let cleared = clear(&client, &url).await?;
            println!("Cache cleared: removed {} cached items", cleared.cache_size);
        }
    }

    Ok(())
}

pub async fn fetch_status(client: &reqwest::Client, base_url: &str) -> anyhow::Result<CacheStatus> {
    let url = endpoint(base_url, "cache-status");
    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {url} (is adaptdocs-app running?)"))?;
    if !resp.status().is_success() {
        anyhow::bail!("GET {url} failed: {}", resp.status());
    }
    resp.json().await.context("parse cache status")
}

pub async fn clear(client: &reqwest::Client, base_url: &str) -> anyhow::Result<CacheCleared> {
    let url = endpoint(base_url, "clear-cache");
    let resp = client
        .post(&url)
        .send()
        .await
        .with_context(|| format!("POST {url} (is adaptdocs-app running?)"))?;
    if !resp.status().is_success() {
        anyhow::bail!("POST {url} failed: {}", resp.status());
    }
    resp.json().await.context("parse clear-cache response")
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}
