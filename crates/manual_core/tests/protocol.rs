use manual_core::{
    ArticleRecord, CaptureResponse, ExtractRequest, ExtractResponse, ExtractionFailure,
    ExtractionFailureKind, Notification, Request, SourceRegistry,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn requests_use_action_tags() {
    let parsed: Request = serde_json::from_value(json!({"action": "capturePage"})).unwrap();
    assert_eq!(parsed, Request::CapturePage);
    assert_eq!(
        serde_json::to_value(Request::GetDefaultSources).unwrap(),
        json!({"action": "getDefaultSources"})
    );
}

#[test]
fn capture_replies_use_status_tags() {
    assert_eq!(
        serde_json::to_value(CaptureResponse::saved()).unwrap(),
        json!({"status": "success", "message": "Article saved!"})
    );
    let error: CaptureResponse =
        serde_json::from_value(json!({"status": "error", "message": "boom"})).unwrap();
    assert!(!error.is_success());
    assert_eq!(error.message(), "boom");
}

#[test]
fn notifications_match_listener_shapes() {
    assert_eq!(
        serde_json::to_value(Notification::ProgressUpdate { current: 1, total: 3 }).unwrap(),
        json!({"action": "progressUpdate", "current": 1, "total": 3})
    );
    assert_eq!(
        serde_json::to_value(Notification::GenerationComplete {
            download_ready: Some(true)
        })
        .unwrap(),
        json!({"action": "generationComplete", "downloadReady": true})
    );
    assert_eq!(
        serde_json::to_value(Notification::GenerationComplete {
            download_ready: None
        })
        .unwrap(),
        json!({"action": "generationComplete"})
    );
}

#[test]
fn extraction_messages_carry_profile_and_article() {
    let profile = SourceRegistry::default().profiles()[1].clone();
    let request = serde_json::to_value(ExtractRequest::ExtractContent {
        config: profile.clone(),
    })
    .unwrap();
    assert_eq!(request["action"], "extractContent");
    assert_eq!(request["config"]["domain_match"], "wikipedia.org");
    assert_eq!(request["config"]["title_selector"], "h1#firstHeading");

    let ok = ExtractResponse::from(Ok(ArticleRecord::new("T", "<p>x</p>")));
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({"status": "success", "data": {"title": "T", "htmlContent": "<p>x</p>"}})
    );
}

#[test]
fn extraction_failure_survives_the_wire() {
    let failure = ExtractionFailure::title_not_found("h1.missing");
    let response = ExtractResponse::from(Err(failure.clone()));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "title not found");
    assert_eq!(json["error"]["kind"], "TitleNotFound");

    let decoded: ExtractResponse = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.into_result(), Err(failure));

    let bare: ExtractResponse =
        serde_json::from_value(json!({"status": "error", "message": "odd"})).unwrap();
    let err = bare.into_result().unwrap_err();
    assert_eq!(err.kind, ExtractionFailureKind::Unexpected);
    assert_eq!(err.message, "odd");
}
