use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapt::ContentAdapter;
use crate::app::slider::SliderStore;
use crate::cache::AdaptationCache;
use crate::formats::SidebarSection;
use crate::sidebar::load_sidebar;
use crate::tutorial::TutorialLoader;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub docs_dir: PathBuf,
    /// Defaults to `<docs_dir>/index.yml`.
    pub nav_path: Option<PathBuf>,
    pub default_language: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub loader: Arc<TutorialLoader>,
    pub adapter: ContentAdapter,
    pub sliders: Arc<SliderStore>,
    pub nav_path: PathBuf,
    pub default_language: String,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let nav_path = config
            .nav_path
            .unwrap_or_else(|| config.docs_dir.join("index.yml"));
        Self {
            loader: Arc::new(TutorialLoader::new(config.docs_dir)),
            adapter: ContentAdapter::new(Arc::new(AdaptationCache::new())),
            sliders: Arc::new(SliderStore::new()),
            nav_path,
            default_language: config.default_language,
        }
    }

    pub fn cache(&self) -> &AdaptationCache {
        self.adapter.cache()
    }

    pub fn language(&self, requested: Option<String>) -> String {
        requested
            .map(|lang| lang.trim().to_owned())
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| self.default_language.clone())
    }
}

/// The sidebar is optional decoration; an unreadable descriptor yields an
/// empty one.
pub fn sidebar_or_empty(nav_path: &Path) -> Vec<SidebarSection> {
    match load_sidebar(nav_path) {
        Ok(sidebar) => sidebar,
        Err(err) => {
            tracing::warn!(nav = %nav_path.display(), ?err, "sidebar unavailable");
            Vec::new()
        }
    }
}
