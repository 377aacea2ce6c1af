use crate::{ArticleRecord, CaptureError, HarvestReport, SiteProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The stored source list changed; replaces the live registry.
    SourcesChanged(Vec<SiteProfile>),
    /// A UI asked to capture the page it is looking at.
    CaptureRequested { page_url: Option<String> },
    /// Extraction and storage for the pending capture are done.
    CaptureFinished(Result<ArticleRecord, CaptureError>),
    /// A UI asked for the manual; carries the stored article count.
    GenerateRequested { article_count: usize },
    /// One more article section has been rendered.
    GenerationAdvanced {
        completed: usize,
        total: usize,
        title: String,
    },
    /// The manual was rendered and stored, or storing it failed.
    GenerationFinished(Result<(), String>),
    /// A UI asked to drop every stored article.
    ClearRequested,
    /// A UI asked to harvest a profile's articles: the ones listed in `links`,
    /// or when that is empty, every article linked from its index page.
    HarvestRequested {
        profile_name: String,
        links: Vec<String>,
    },
    /// The harvest ran to completion, or could not start.
    HarvestFinished(Result<HarvestReport, String>),
    /// Fallback for placeholder wiring.
    NoOp,
}
