use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use futures_util::StreamExt;
use manual_logging::{manual_debug, manual_warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};

/// A loaded page: the address it was requested under and its decoded markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Unavailable,
    Network,
}

impl fmt::Display for PageFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFailureKind::InvalidUrl => write!(f, "invalid url"),
            PageFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            PageFailureKind::Timeout => write!(f, "timeout"),
            PageFailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            PageFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            PageFailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            PageFailureKind::Unavailable => write!(f, "page unavailable"),
            PageFailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct PageError {
    pub kind: PageFailureKind,
    pub message: String,
}

impl PageError {
    pub(crate) fn new(kind: PageFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
        }
    }
}

/// Gives the orchestrator access to a page's markup.
#[async_trait::async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<PageSnapshot, PageError>;
}

/// Loads live pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPageLoader {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl HttpPageLoader {
    pub fn new(settings: FetchSettings) -> Result<Self, PageError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        if let Ok(value) = HeaderValue::from_str(&settings.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }
        if let Ok(value) = HeaderValue::from_str(&settings.user_agent) {
            headers.insert(USER_AGENT, value);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .default_headers(headers)
            .build()
            .map_err(|err| PageError::new(PageFailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, actual: u64) -> PageError {
        PageError::new(
            PageFailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl PageLoader for HttpPageLoader {
    async fn load(&self, url: &str) -> Result<PageSnapshot, PageError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| PageError::new(PageFailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::new(
                PageFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(PageError::new(
                    PageFailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        manual_debug!("Loaded {} bytes from {}", bytes.len(), url);
        let html = decode_html(&bytes, content_type.as_deref());
        Ok(PageSnapshot::new(url, html))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> PageError {
    if err.is_timeout() {
        return PageError::new(PageFailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return PageError::new(PageFailureKind::RedirectLimitExceeded, err.to_string());
    }
    PageError::new(PageFailureKind::Network, err.to_string())
}

/// Serves pages already held in memory, such as saved snapshots.
///
/// A URL with no stored markup behaves like a tab whose content script never
/// answered.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPageLoader {
    pages: HashMap<String, String>,
}

impl SnapshotPageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.insert(url.into(), html.into());
    }
}

#[async_trait::async_trait]
impl PageLoader for SnapshotPageLoader {
    async fn load(&self, url: &str) -> Result<PageSnapshot, PageError> {
        match self.pages.get(url) {
            Some(html) => Ok(PageSnapshot::new(url, html.clone())),
            None => Err(PageError::new(
                PageFailureKind::Unavailable,
                "Could not establish connection. Receiving end does not exist.",
            )),
        }
    }
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng fallback.
///
/// Malformed sequences become U+FFFD, the way a browser would show them.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\'']).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> String {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        manual_warn!("Page bytes were not valid {}; replaced bad sequences", enc.name());
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::{decode_html, extract_charset};

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(
            extract_charset("text/html; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn header_charset_is_honoured() {
        let bytes = b"caf\xe9";
        assert_eq!(decode_html(bytes, Some("text/html; charset=ISO-8859-1")), "café");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        assert_eq!(decode_html(b"\xEF\xBB\xBFhello", Some("text/html")), "hello");
    }
}
