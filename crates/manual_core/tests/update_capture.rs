use std::sync::Once;

use manual_core::{
    update, ArticleRecord, CaptureError, CaptureResponse, Effect, ExtractionFailure, Msg,
    OrchestratorState, Phase, SiteProfile,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(manual_logging::initialize_for_tests);
}

fn wiki() -> SiteProfile {
    SiteProfile {
        name: "Wikipedia".to_string(),
        domain_match: "wikipedia.org".to_string(),
        base_url: "https://pt.wikipedia.org/".to_string(),
        title_selector: "h1#firstHeading".to_string(),
        content_selector: "div#mw-content-text".to_string(),
        article_links_selector: None,
    }
}

fn replies(effects: &[Effect]) -> Vec<CaptureResponse> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::ReplyCapture(reply) => Some(reply.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn matching_url_moves_to_capturing_and_requests_extraction() {
    init_logging();
    let state = OrchestratorState::with_sources(vec![wiki()]);
    let url = "https://pt.wikipedia.org/wiki/Rust".to_string();

    let (next, effects) = update(
        state,
        Msg::CaptureRequested {
            page_url: Some(url.clone()),
        },
    );

    assert_eq!(next.phase(), &Phase::Capturing { url: url.clone() });
    assert_eq!(
        effects,
        vec![
            Effect::Log(format!("Page capture requested for: {url}")),
            Effect::Capture {
                url,
                profile: wiki()
            },
        ]
    );
}

#[test]
fn missing_page_fails_without_capture_effect() {
    init_logging();
    let state = OrchestratorState::with_sources(vec![wiki()]);

    let (next, effects) = update(state, Msg::CaptureRequested { page_url: None });

    assert!(matches!(next.phase(), Phase::CaptureFailed { .. }));
    assert!(next.phase().is_ready());
    assert!(!effects.iter().any(|e| matches!(e, Effect::Capture { .. })));
    assert_eq!(
        replies(&effects),
        vec![CaptureResponse::Error {
            message: CaptureError::NoActivePage.to_string()
        }]
    );
}

#[test]
fn unmatched_url_reports_no_source() {
    init_logging();
    let state = OrchestratorState::with_sources(vec![wiki()]);

    let (_next, effects) = update(
        state,
        Msg::CaptureRequested {
            page_url: Some("https://example.com".to_string()),
        },
    );

    let replies = replies(&effects);
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies[0].message(),
        "No source configuration found for URL: https://example.com"
    );
    assert!(!effects.iter().any(|e| matches!(e, Effect::Capture { .. })));
}

#[test]
fn finished_capture_replies_success_and_returns_to_idle() {
    init_logging();
    let state = OrchestratorState::with_sources(vec![wiki()]);
    let (state, _) = update(
        state,
        Msg::CaptureRequested {
            page_url: Some("https://pt.wikipedia.org/wiki/A".to_string()),
        },
    );

    let (next, effects) = update(
        state,
        Msg::CaptureFinished(Ok(ArticleRecord::new("A", "<p>a</p>"))),
    );

    assert_eq!(next.phase(), &Phase::Idle);
    assert_eq!(replies(&effects), vec![CaptureResponse::saved()]);
    assert!(effects.contains(&Effect::Log("Article saved: \"A\"".to_string())));
}

#[test]
fn extraction_failure_is_reported_verbatim() {
    init_logging();
    let state = OrchestratorState::with_sources(vec![wiki()]);
    let failure = ExtractionFailure::title_not_found("h1#firstHeading");

    let (next, effects) = update(
        state,
        Msg::CaptureFinished(Err(CaptureError::Extraction(failure))),
    );

    assert_eq!(
        next.phase(),
        &Phase::CaptureFailed {
            message: "title not found".to_string()
        }
    );
    assert_eq!(
        replies(&effects),
        vec![CaptureResponse::Error {
            message: "title not found".to_string()
        }]
    );
}

#[test]
fn sources_changed_is_used_by_the_next_capture() {
    init_logging();
    let state = OrchestratorState::with_sources(vec![wiki()]);
    let mut docs = wiki();
    docs.name = "Docs".to_string();
    docs.domain_match = "docs.rs".to_string();

    let (state, effects) = update(state, Msg::SourcesChanged(vec![docs.clone()]));
    assert_eq!(effects.len(), 1);

    let (_state, effects) = update(
        state,
        Msg::CaptureRequested {
            page_url: Some("https://docs.rs/serde".to_string()),
        },
    );
    assert!(effects.contains(&Effect::Capture {
        url: "https://docs.rs/serde".to_string(),
        profile: docs,
    }));
}

#[test]
fn noop_leaves_state_untouched() {
    let state = OrchestratorState::default();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
