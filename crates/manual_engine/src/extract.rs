use manual_core::{ArticleRecord, ExtractionFailure, SiteProfile, EMPTY_CONTENT_PLACEHOLDER};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::page::PageSnapshot;
use crate::rewrite::absolutized_inner_html;

pub trait Extractor: Send + Sync {
    fn extract(
        &self,
        profile: &SiteProfile,
        page: &PageSnapshot,
    ) -> Result<ArticleRecord, ExtractionFailure>;
}

/// Extracts an article with the CSS selectors of a [`SiteProfile`]:
/// - title: text of the first `title_selector` match
/// - body: inner markup of the first `content_selector` match, with links
///   and images made absolute against `base_url`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectorExtractor;

impl Extractor for SelectorExtractor {
    fn extract(
        &self,
        profile: &SiteProfile,
        page: &PageSnapshot,
    ) -> Result<ArticleRecord, ExtractionFailure> {
        let doc = Html::parse_document(&page.html);
        let title_sel = parse_selector(&profile.title_selector)?;
        let content_sel = parse_selector(&profile.content_selector)?;

        let title = doc
            .select(&title_sel)
            .next()
            .map(element_text)
            .ok_or_else(|| ExtractionFailure::title_not_found(&profile.title_selector))?;

        let content = doc
            .select(&content_sel)
            .next()
            .ok_or_else(|| ExtractionFailure::content_not_found(&profile.content_selector))?;

        let base = Url::parse(&profile.base_url).map_err(|err| {
            ExtractionFailure::unexpected(format!(
                "invalid base url {:?}: {err}",
                profile.base_url
            ))
        })?;
        let html_content = absolutized_inner_html(content, &base)?;

        let html_content = if html_content.trim().is_empty() {
            EMPTY_CONTENT_PLACEHOLDER.to_string()
        } else {
            html_content
        };

        Ok(ArticleRecord { title, html_content })
    }
}

pub(crate) fn parse_selector(source: &str) -> Result<Selector, ExtractionFailure> {
    Selector::parse(source).map_err(|err| {
        ExtractionFailure::unexpected(format!("invalid selector {source:?}"))
            .with_trace(err.to_string())
    })
}

/// Visible text of an element with whitespace runs collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
