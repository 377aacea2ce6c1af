//! Message shapes exchanged between the UI, the orchestrator and the page
//! context. The serde attributes pin the JSON form: `action` tags requests and
//! notifications, `status` tags replies.
use serde::{Deserialize, Serialize};

use crate::{ArticleRecord, CaptureError, ExtractionFailure, ExtractionFailureKind, SiteProfile};

/// Control messages issued by UI surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    CapturePage,
    GenerateManual,
    ClearArticles,
    GetDefaultSources,
}

/// Reply to [`Request::CapturePage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CaptureResponse {
    Success { message: String },
    Error { message: String },
}

impl CaptureResponse {
    pub fn saved() -> Self {
        CaptureResponse::Success {
            message: "Article saved!".to_string(),
        }
    }

    pub fn failed(error: &CaptureError) -> Self {
        CaptureResponse::Error {
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CaptureResponse::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            CaptureResponse::Success { message } | CaptureResponse::Error { message } => message,
        }
    }
}

/// Reply to [`Request::GetDefaultSources`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSourcesResponse {
    pub data: Vec<SiteProfile>,
}

/// Asynchronous notifications pushed to any listening UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Notification {
    ProgressUpdate {
        current: usize,
        total: usize,
    },
    GenerationComplete {
        #[serde(
            rename = "downloadReady",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        download_ready: Option<bool>,
    },
    CriticalError {
        message: String,
    },
}

/// Orchestrator to page context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtractRequest {
    ExtractContent { config: SiteProfile },
}

/// Page context to orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractResponse {
    Success {
        data: ArticleRecord,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ErrorDetail>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ExtractResponse {
    /// Turns a reply back into a result, recovering the failure kind when the
    /// page context sent one.
    pub fn into_result(self) -> Result<ArticleRecord, ExtractionFailure> {
        match self {
            ExtractResponse::Success { data } => Ok(data),
            ExtractResponse::Error { message, error } => {
                let Some(detail) = error else {
                    return Err(ExtractionFailure::unexpected(message));
                };
                let kind = match detail.kind.as_str() {
                    "TitleNotFound" => ExtractionFailureKind::TitleNotFound,
                    "ContentNotFound" => ExtractionFailureKind::ContentNotFound,
                    _ => ExtractionFailureKind::Unexpected,
                };
                Err(ExtractionFailure {
                    kind,
                    message,
                    trace: detail.trace,
                })
            }
        }
    }
}

impl From<Result<ArticleRecord, ExtractionFailure>> for ExtractResponse {
    fn from(result: Result<ArticleRecord, ExtractionFailure>) -> Self {
        match result {
            Ok(data) => ExtractResponse::Success { data },
            Err(failure) => ExtractResponse::Error {
                message: failure.message.clone(),
                error: Some(ErrorDetail {
                    kind: failure.kind.to_string(),
                    message: failure.message,
                    trace: failure.trace,
                }),
            },
        }
    }
}
