use manual_core::{
    update, Effect, HarvestFailure, HarvestReport, Msg, Notification, OrchestratorState, Phase,
    SiteProfile,
};
use pretty_assertions::assert_eq;

fn notifications(effects: &[Effect]) -> Vec<Notification> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify(n) => Some(n.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_article_list_completes_without_download() {
    let (next, effects) = update(
        OrchestratorState::default(),
        Msg::GenerateRequested { article_count: 0 },
    );

    assert_eq!(next.phase(), &Phase::Idle);
    assert!(!effects.contains(&Effect::RenderManual));
    assert_eq!(
        notifications(&effects),
        vec![Notification::GenerationComplete {
            download_ready: None
        }]
    );
}

#[test]
fn generation_reports_progress_then_download_ready() {
    let (state, effects) = update(
        OrchestratorState::default(),
        Msg::GenerateRequested { article_count: 2 },
    );
    assert_eq!(state.phase(), &Phase::Generating { current: 0, total: 2 });
    assert!(effects.contains(&Effect::RenderManual));
    assert_eq!(
        notifications(&effects),
        vec![Notification::ProgressUpdate { current: 0, total: 2 }]
    );

    let (state, effects) = update(
        state,
        Msg::GenerationAdvanced {
            completed: 1,
            total: 2,
            title: "A".to_string(),
        },
    );
    assert_eq!(state.phase(), &Phase::Generating { current: 1, total: 2 });
    assert_eq!(
        notifications(&effects),
        vec![Notification::ProgressUpdate { current: 1, total: 2 }]
    );

    let (state, effects) = update(state, Msg::GenerationFinished(Ok(())));
    assert_eq!(state.phase(), &Phase::Idle);
    assert_eq!(
        notifications(&effects),
        vec![Notification::GenerationComplete {
            download_ready: Some(true)
        }]
    );
}

#[test]
fn generation_failure_is_a_critical_error() {
    let (state, _) = update(
        OrchestratorState::default(),
        Msg::GenerateRequested { article_count: 1 },
    );
    let (state, effects) = update(
        state,
        Msg::GenerationFinished(Err("disk full".to_string())),
    );

    assert!(state.phase().is_ready());
    assert_eq!(
        notifications(&effects),
        vec![Notification::CriticalError {
            message: "disk full".to_string()
        }]
    );
}

#[test]
fn clear_emits_clear_effect() {
    let (state, effects) = update(OrchestratorState::default(), Msg::ClearRequested);

    assert_eq!(state.phase(), &Phase::Idle);
    assert_eq!(effects[0], Effect::ClearArticles);
}

#[test]
fn harvest_requires_a_links_selector() {
    let state = OrchestratorState::default();

    let (state, effects) = update(
        state,
        Msg::HarvestRequested {
            profile_name: "Wikipedia".to_string(),
            links: Vec::new(),
        },
    );
    assert!(effects.contains(&Effect::ReplyHarvest(Err(
        "Source Wikipedia has no article links selector.".to_string()
    ))));
    assert!(matches!(state.phase(), Phase::HarvestFailed { .. }));
    assert!(state.phase().is_ready());

    let (state, effects) = update(
        state,
        Msg::HarvestRequested {
            profile_name: "Nope".to_string(),
            links: Vec::new(),
        },
    );
    assert!(effects.contains(&Effect::ReplyHarvest(Err("No source named Nope.".to_string()))));

    let (state, effects) = update(
        state,
        Msg::HarvestRequested {
            profile_name: "Oobj BC".to_string(),
            links: Vec::new(),
        },
    );
    assert_eq!(
        state.phase(),
        &Phase::Harvesting {
            profile: "Oobj BC".to_string()
        }
    );
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::Harvest { profile, links } if profile.name == "Oobj BC" && links.is_empty())));
}

#[test]
fn listed_links_harvest_without_a_links_selector() {
    let links = vec![
        "https://pt.wikipedia.org/wiki/Rust".to_string(),
        "https://pt.wikipedia.org/wiki/Cargo".to_string(),
    ];

    let (state, effects) = update(
        OrchestratorState::default(),
        Msg::HarvestRequested {
            profile_name: "Wikipedia".to_string(),
            links: links.clone(),
        },
    );

    assert_eq!(
        state.phase(),
        &Phase::Harvesting {
            profile: "Wikipedia".to_string()
        }
    );
    assert_eq!(
        effects[0],
        Effect::Log("Harvest requested for Wikipedia with 2 listed links".to_string())
    );
    assert!(matches!(
        &effects[1],
        Effect::Harvest { profile, links: listed } if profile.name == "Wikipedia" && listed == &links
    ));
}

#[test]
fn harvest_failing_midway_uses_the_same_phase_as_a_rejection() {
    let (state, effects) = update(
        OrchestratorState::default(),
        Msg::HarvestFinished(Err("could not load index".to_string())),
    );

    assert_eq!(
        state.phase(),
        &Phase::HarvestFailed {
            message: "could not load index".to_string()
        }
    );
    assert_eq!(
        effects,
        vec![
            Effect::Log("Harvest failed: could not load index".to_string()),
            Effect::ReplyHarvest(Err("could not load index".to_string())),
        ]
    );
}

#[test]
fn harvest_report_logs_each_failure() {
    let report = HarvestReport {
        profile: "Docs".to_string(),
        discovered: 3,
        captured: 2,
        failures: vec![HarvestFailure {
            url: "https://docs.example/c".to_string(),
            message: "title not found".to_string(),
        }],
    };
    let state = OrchestratorState::with_sources(Vec::<SiteProfile>::new());

    let (state, effects) = update(state, Msg::HarvestFinished(Ok(report.clone())));

    assert_eq!(state.phase(), &Phase::Idle);
    assert_eq!(
        effects,
        vec![
            Effect::Log("Harvest skipped https://docs.example/c: title not found".to_string()),
            Effect::Log("Harvest of Docs finished: 2 of 3 articles saved.".to_string()),
            Effect::ReplyHarvest(Ok(report)),
        ]
    );
}
