//! Markdown content pages (about, FAQ, shipping, returns, contact).
//!
//! Pages are loaded from `<content_dir>/pages/*.md` at startup. Each file
//! starts with YAML frontmatter:
//!
//! ```markdown
//! ---
//! title: Shipping Information
//! description: Delivery times and rates
//! updated_at: 2025-01-05
//! ---
//! We ship nationwide...
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use thiserror::Error;

/// Frontmatter of a content page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// Errors loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Every page loaded at startup, keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all pages under `content_dir/pages`.
    ///
    /// A missing directory yields an empty store. Files that fail to parse
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let dir = content_dir.join("pages");
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "Pages directory does not exist");
            return Ok(Self::default());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| ContentError::Io(e.to_string()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            match load_page(&path) {
                Ok(page) => {
                    tracing::info!(slug = %page.slug, "Loaded page");
                    pages.insert(page.slug.clone(), page);
                }
                Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to load page"),
            }
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn load_page(path: &Path) -> Result<Page, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
        .to_string();

    parse_page(slug, &content)
}

fn parse_page(slug: String, content: &str) -> Result<Page, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug,
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

/// Render markdown with tables, strikethrough, and autolinks.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    markdown_to_html(content, &options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SHIPPING: &str = "---\ntitle: Shipping Information\ndescription: Rates\nupdated_at: 2025-01-05\n---\n# Rates\n\n| Area | Fee |\n|---|---|\n| Metro Manila | ₱100 |\n";

    #[test]
    fn test_parse_page_renders_markdown() {
        let page = parse_page("shipping".to_string(), SHIPPING).unwrap();
        assert_eq!(page.meta.title, "Shipping Information");
        assert_eq!(page.meta.updated_at, NaiveDate::from_ymd_opt(2025, 1, 5));
        assert!(page.content_html.contains("<table>"));
        assert!(page.content_html.contains("Metro Manila"));
    }

    #[test]
    fn test_parse_page_requires_frontmatter() {
        assert!(parse_page("faq".to_string(), "# FAQ only").is_err());
    }

    #[test]
    fn test_raw_html_is_not_rendered() {
        let page =
            parse_page("about".to_string(), "---\ntitle: About\n---\n<script>x()</script>").unwrap();
        assert!(!page.content_html.contains("<script>"));
    }

    #[test]
    fn test_load_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let pages = dir.path().join("pages");
        std::fs::create_dir(&pages).unwrap();
        std::fs::write(pages.join("shipping.md"), SHIPPING).unwrap();
        std::fs::write(pages.join("broken.md"), "no frontmatter").unwrap();
        std::fs::write(pages.join("notes.txt"), "ignored").unwrap();

        let store = ContentStore::load(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_page("shipping").is_some());
        assert!(store.get_page("broken").is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentStore::load(dir.path()).unwrap().is_empty());
    }
}
