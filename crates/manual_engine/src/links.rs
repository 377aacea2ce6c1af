use std::collections::BTreeSet;

use manual_core::{ExtractionFailure, SiteProfile};
use scraper::Html;
use url::Url;

use crate::extract::parse_selector;
use crate::page::PageSnapshot;

/// Path fragment marking category listings rather than articles.
const CATEGORY_MARKER: &str = "/cat/";

/// Collects article URLs from an index page using the profile's
/// `article_links_selector`.
///
/// Hrefs containing `#` or a category path are skipped; the rest are resolved
/// against `base_url`, deduplicated and returned sorted. A profile without a
/// links selector yields no links.
pub fn discover_article_links(
    profile: &SiteProfile,
    index: &PageSnapshot,
) -> Result<Vec<String>, ExtractionFailure> {
    let Some(selector_source) = profile.article_links_selector.as_deref() else {
        return Ok(Vec::new());
    };
    let selector = parse_selector(selector_source)?;
    let base = Url::parse(&profile.base_url).map_err(|err| {
        ExtractionFailure::unexpected(format!("invalid base url {:?}: {err}", profile.base_url))
    })?;

    let doc = Html::parse_document(&index.html);
    let mut unique = BTreeSet::new();
    for element in doc.select(&selector) {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.contains('#') || href.contains(CATEGORY_MARKER) {
            continue;
        }
        if let Ok(url) = base.join(href) {
            unique.insert(url.to_string());
        }
    }

    Ok(unique.into_iter().collect())
}
