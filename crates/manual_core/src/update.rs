use crate::{CaptureError, CaptureResponse, Effect, Msg, Notification, OrchestratorState, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Requests are not rejected while another flow is in flight; callers that
/// need serialization feed messages one at a time.
pub fn update(mut state: OrchestratorState, msg: Msg) -> (OrchestratorState, Vec<Effect>) {
    let effects = match msg {
        Msg::SourcesChanged(profiles) => {
            let count = profiles.len();
            state.registry_mut().replace(profiles);
            vec![Effect::Log(format!(
                "Source configuration updated ({count} sources)."
            ))]
        }
        Msg::CaptureRequested { page_url } => {
            let Some(url) = page_url.filter(|url| !url.trim().is_empty()) else {
                return fail_capture(state, CaptureError::NoActivePage, Vec::new());
            };
            let requested = Effect::Log(format!("Page capture requested for: {url}"));
            let Some(profile) = state.registry().match_profile(Some(url.as_str())).cloned() else {
                let error = CaptureError::NoMatchingProfile { url };
                return fail_capture(state, error, vec![requested]);
            };
            state.set_phase(Phase::Capturing { url: url.clone() });
            vec![requested, Effect::Capture { url, profile }]
        }
        Msg::CaptureFinished(Ok(article)) => {
            state.set_phase(Phase::Idle);
            vec![
                Effect::Log(format!("Article saved: \"{}\"", article.title)),
                Effect::ReplyCapture(CaptureResponse::saved()),
            ]
        }
        Msg::CaptureFinished(Err(error)) => return fail_capture(state, error, Vec::new()),
        Msg::GenerateRequested { article_count } => {
            let mut effects = vec![Effect::Log("Manual generation started.".to_string())];
            if article_count == 0 {
                state.set_phase(Phase::Idle);
                effects.push(Effect::Log(
                    "Manual generation skipped: no articles to process.".to_string(),
                ));
                effects.push(Effect::Notify(Notification::GenerationComplete {
                    download_ready: None,
                }));
            } else {
                state.set_phase(Phase::Generating {
                    current: 0,
                    total: article_count,
                });
                effects.push(Effect::Log(format!(
                    "Found {article_count} articles to process."
                )));
                effects.push(Effect::Notify(Notification::ProgressUpdate {
                    current: 0,
                    total: article_count,
                }));
                effects.push(Effect::RenderManual);
            }
            effects
        }
        Msg::GenerationAdvanced {
            completed,
            total,
            title,
        } => {
            state.set_phase(Phase::Generating {
                current: completed,
                total,
            });
            vec![
                Effect::Log(format!("Processed article {completed}/{total}: \"{title}\"")),
                Effect::Notify(Notification::ProgressUpdate {
                    current: completed,
                    total,
                }),
            ]
        }
        Msg::GenerationFinished(Ok(())) => {
            state.set_phase(Phase::Idle);
            vec![
                Effect::Log("Manual generated and saved for download.".to_string()),
                Effect::Notify(Notification::GenerationComplete {
                    download_ready: Some(true),
                }),
            ]
        }
        Msg::GenerationFinished(Err(message)) => {
            state.set_phase(Phase::GenerationFailed {
                message: message.clone(),
            });
            vec![
                Effect::Log(format!("Manual generation failed: {message}")),
                Effect::Notify(Notification::CriticalError { message }),
            ]
        }
        Msg::ClearRequested => vec![
            Effect::ClearArticles,
            Effect::Log("All articles were cleared.".to_string()),
        ],
        Msg::HarvestRequested {
            profile_name,
            links,
        } => {
            let profile = state.registry().find_by_name(&profile_name).cloned();
            match profile {
                Some(profile) if !links.is_empty() => {
                    state.set_phase(Phase::Harvesting {
                        profile: profile_name.clone(),
                    });
                    vec![
                        Effect::Log(format!(
                            "Harvest requested for {profile_name} with {} listed links",
                            links.len()
                        )),
                        Effect::Harvest { profile, links },
                    ]
                }
                Some(profile) if profile.article_links_selector.is_some() => {
                    state.set_phase(Phase::Harvesting {
                        profile: profile_name.clone(),
                    });
                    vec![
                        Effect::Log(format!(
                            "Harvest requested for {profile_name} from {}",
                            profile.base_url
                        )),
                        Effect::Harvest {
                            profile,
                            links: Vec::new(),
                        },
                    ]
                }
                Some(_) => {
                    return fail_harvest(
                        state,
                        format!("Source {profile_name} has no article links selector."),
                    )
                }
                None => return fail_harvest(state, format!("No source named {profile_name}.")),
            }
        }
        Msg::HarvestFinished(Ok(report)) => {
            state.set_phase(Phase::Idle);
            let mut effects = Vec::with_capacity(report.failures.len() + 2);
            for failure in &report.failures {
                effects.push(Effect::Log(format!(
                    "Harvest skipped {}: {}",
                    failure.url, failure.message
                )));
            }
            effects.push(Effect::Log(format!(
                "Harvest of {} finished: {} of {} articles saved.",
                report.profile, report.captured, report.discovered
            )));
            effects.push(Effect::ReplyHarvest(Ok(report)));
            effects
        }
        Msg::HarvestFinished(Err(message)) => return fail_harvest(state, message),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fail_capture(
    mut state: OrchestratorState,
    error: CaptureError,
    mut effects: Vec<Effect>,
) -> (OrchestratorState, Vec<Effect>) {
    state.set_phase(Phase::CaptureFailed {
        message: error.to_string(),
    });
    effects.push(Effect::Log(format!("Capture failed: {error}")));
    effects.push(Effect::ReplyCapture(CaptureResponse::failed(&error)));
    (state, effects)
}

fn fail_harvest(mut state: OrchestratorState, message: String) -> (OrchestratorState, Vec<Effect>) {
    state.set_phase(Phase::HarvestFailed {
        message: message.clone(),
    });
    let effects = vec![
        Effect::Log(format!("Harvest failed: {message}")),
        Effect::ReplyHarvest(Err(message)),
    ];
    (state, effects)
}
