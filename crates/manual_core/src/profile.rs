use serde::{Deserialize, Serialize};

/// Substituted for article bodies that serialize to nothing but whitespace.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "<p>Content not found or empty.</p>";

/// How to locate an article's title and body on one site.
///
/// Field names keep the snake_case keys of the stored `sources` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub name: String,
    pub domain_match: String,
    pub base_url: String,
    pub title_selector: String,
    pub content_selector: String,
    #[serde(default)]
    pub article_links_selector: Option<String>,
}

/// One captured page: its title and the processed HTML body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub html_content: String,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, html_content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html_content: html_content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestReport {
    pub profile: String,
    pub discovered: usize,
    pub captured: usize,
    pub failures: Vec<HarvestFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestFailure {
    pub url: String,
    pub message: String,
}
