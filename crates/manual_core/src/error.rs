use std::fmt;

/// Why a capture did not produce a stored article.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("No active page found.")]
    NoActivePage,
    #[error("No source configuration found for URL: {url}")]
    NoMatchingProfile { url: String },
    #[error("{0}")]
    Extraction(ExtractionFailure),
    #[error("Could not reach the page: {0}")]
    MessageDelivery(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailureKind {
    TitleNotFound,
    ContentNotFound,
    Unexpected,
}

impl ExtractionFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionFailureKind::TitleNotFound => "TitleNotFound",
            ExtractionFailureKind::ContentNotFound => "ContentNotFound",
            ExtractionFailureKind::Unexpected => "Unexpected",
        }
    }
}

impl fmt::Display for ExtractionFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured extraction failure: kind, message and an optional trace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExtractionFailure {
    pub kind: ExtractionFailureKind,
    pub message: String,
    pub trace: Option<String>,
}

impl ExtractionFailure {
    pub fn new(kind: ExtractionFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trace: None,
        }
    }

    pub fn title_not_found(selector: &str) -> Self {
        Self::new(ExtractionFailureKind::TitleNotFound, "title not found")
            .with_trace(format!("selector: {selector}"))
    }

    pub fn content_not_found(selector: &str) -> Self {
        Self::new(ExtractionFailureKind::ContentNotFound, "content not found")
            .with_trace(format!("selector: {selector}"))
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ExtractionFailureKind::Unexpected, message)
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

impl From<ExtractionFailure> for CaptureError {
    fn from(failure: ExtractionFailure) -> Self {
        CaptureError::Extraction(failure)
    }
}
