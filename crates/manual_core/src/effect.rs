use crate::{CaptureResponse, HarvestReport, Notification, SiteProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a line to the activity log.
    Log(String),
    /// Load the page, extract it with `profile` and append the article.
    Capture { url: String, profile: SiteProfile },
    ReplyCapture(CaptureResponse),
    /// Render every stored article into the manual and store it.
    RenderManual,
    Notify(Notification),
    /// Empty the article list and drop the cached manual.
    ClearArticles,
    /// Capture `links`, or the links discovered on the profile's index page
    /// when `links` is empty, and append the results in one write.
    Harvest {
        profile: SiteProfile,
        links: Vec<String>,
    },
    ReplyHarvest(Result<HarvestReport, String>),
}
