use std::sync::Arc;

use manual_core::{ExtractRequest, ExtractResponse};
use manual_logging::manual_debug;

use crate::extract::Extractor;
use crate::page::{PageError, PageLoader};

/// Stands in for a page's own execution context: it loads the page and
/// answers `extractContent` requests against it.
///
/// A page that cannot be loaded surfaces as a delivery error, not as an
/// extraction reply.
#[derive(Clone)]
pub struct PageContext {
    loader: Arc<dyn PageLoader>,
    extractor: Arc<dyn Extractor>,
}

impl PageContext {
    pub fn new(loader: Arc<dyn PageLoader>, extractor: Arc<dyn Extractor>) -> Self {
        Self { loader, extractor }
    }

    pub fn loader(&self) -> &dyn PageLoader {
        self.loader.as_ref()
    }

    pub async fn send(&self, url: &str, request: ExtractRequest) -> Result<ExtractResponse, PageError> {
        let page = self.loader.load(url).await?;
        match request {
            ExtractRequest::ExtractContent { config } => {
                manual_debug!("Extracting {} with source {}", url, config.name);
                Ok(self.extractor.extract(&config, &page).into())
            }
        }
    }
}
