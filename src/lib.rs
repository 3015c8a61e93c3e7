#![forbid(unsafe_code)]

pub mod adapt;
pub mod app;
pub mod cache;
pub mod cache_admin;
pub mod cli;
pub mod formats;
pub mod frontmatter;
pub mod html;
pub mod logging;
pub mod pivot;
pub mod render;
pub mod sectionize;
pub mod sidebar;
pub mod tutorial;
