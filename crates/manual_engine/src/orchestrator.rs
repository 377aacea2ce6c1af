use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{stream, StreamExt};
use manual_core::{
    update, ActivityLog, ArticleRecord, CaptureError, CaptureResponse,
    DefaultSourcesResponse, Effect, ExtractRequest, HarvestFailure, HarvestReport, Msg,
    Notification, OrchestratorState, Request, SiteProfile,
};
use manual_logging::{manual_debug, manual_error, manual_info, manual_warn};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::context::PageContext;
use crate::extract::Extractor;
use crate::links::discover_article_links;
use crate::page::PageLoader;
use crate::render::ManualRenderer;
use crate::store::{KeyValueStore, Storage};

/// Produces the timestamp written in front of each activity log line.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

#[derive(Clone)]
pub struct OrchestratorConfig {
    /// Pause after each article while generating the manual.
    pub progress_delay: Duration,
    /// Pages fetched concurrently during a harvest.
    pub harvest_workers: usize,
    pub clock: Clock,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            progress_delay: Duration::from_millis(50),
            harvest_workers: 10,
            clock: Arc::new(rfc3339_now),
        }
    }
}

fn rfc3339_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("orchestrator is not running")]
    Closed,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Rejected(String),
}

/// Reply to a [`Request`] sent through [`OrchestratorHandle::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Capture(CaptureResponse),
    DefaultSources(DefaultSourcesResponse),
    /// Fire-and-forget requests; completion is reported via notifications.
    Accepted,
}

type Responder<T> = oneshot::Sender<T>;

enum Command {
    Capture {
        page_url: Option<String>,
        reply: Responder<CaptureResponse>,
    },
    Generate {
        done: Responder<()>,
    },
    Clear {
        done: Responder<Result<(), String>>,
    },
    DefaultSources {
        reply: Responder<DefaultSourcesResponse>,
    },
    SetSources {
        sources: Vec<SiteProfile>,
        reply: Responder<Result<(), String>>,
    },
    Harvest {
        profile_name: String,
        links: Vec<String>,
        reply: Responder<Result<HarvestReport, String>>,
    },
    Sources {
        reply: Responder<Vec<SiteProfile>>,
    },
    Articles {
        reply: Responder<Result<Vec<ArticleRecord>, String>>,
    },
    ActivityLog {
        reply: Responder<Result<ActivityLog, String>>,
    },
    LastManual {
        reply: Responder<Result<Option<String>, String>>,
    },
    ClearLogs {
        reply: Responder<Result<(), String>>,
    },
}

/// Cloneable front door to the orchestrator task.
///
/// Every call is queued; the task handles one at a time, so a capture and a
/// generation never interleave.
#[derive(Clone)]
pub struct OrchestratorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl OrchestratorHandle {
    /// Captures the page at `page_url`; `None` means no page is active.
    pub async fn capture_page(
        &self,
        page_url: Option<String>,
    ) -> Result<CaptureResponse, OrchestratorError> {
        self.call(|reply| Command::Capture { page_url, reply }).await
    }

    /// Resolves once generation has finished or failed. Progress and the
    /// outcome arrive as notifications.
    pub async fn generate_manual(&self) -> Result<(), OrchestratorError> {
        self.call(|done| Command::Generate { done }).await
    }

    pub async fn clear_articles(&self) -> Result<(), OrchestratorError> {
        self.call(|done| Command::Clear { done })
            .await?
            .map_err(OrchestratorError::Storage)
    }

    pub async fn default_sources(&self) -> Result<DefaultSourcesResponse, OrchestratorError> {
        self.call(|reply| Command::DefaultSources { reply }).await
    }

    /// Stores `sources` and makes them the active configuration.
    pub async fn set_sources(&self, sources: Vec<SiteProfile>) -> Result<(), OrchestratorError> {
        self.call(|reply| Command::SetSources { sources, reply })
            .await?
            .map_err(OrchestratorError::Storage)
    }

    /// Harvests every article linked from the profile's index page.
    pub async fn harvest(&self, profile_name: &str) -> Result<HarvestReport, OrchestratorError> {
        self.harvest_links(profile_name, Vec::new()).await
    }

    /// Harvests exactly `links` with the named profile, skipping discovery.
    /// An empty list falls back to discovery.
    pub async fn harvest_links(
        &self,
        profile_name: &str,
        links: Vec<String>,
    ) -> Result<HarvestReport, OrchestratorError> {
        let profile_name = profile_name.to_string();
        self.call(|reply| Command::Harvest {
            profile_name,
            links,
            reply,
        })
        .await?
        .map_err(OrchestratorError::Rejected)
    }

    pub async fn sources(&self) -> Result<Vec<SiteProfile>, OrchestratorError> {
        self.call(|reply| Command::Sources { reply }).await
    }

    pub async fn articles(&self) -> Result<Vec<ArticleRecord>, OrchestratorError> {
        self.call(|reply| Command::Articles { reply })
            .await?
            .map_err(OrchestratorError::Storage)
    }

    pub async fn activity_log(&self) -> Result<ActivityLog, OrchestratorError> {
        self.call(|reply| Command::ActivityLog { reply })
            .await?
            .map_err(OrchestratorError::Storage)
    }

    pub async fn last_manual(&self) -> Result<Option<String>, OrchestratorError> {
        self.call(|reply| Command::LastManual { reply })
            .await?
            .map_err(OrchestratorError::Storage)
    }

    pub async fn clear_logs(&self) -> Result<(), OrchestratorError> {
        self.call(|reply| Command::ClearLogs { reply })
            .await?
            .map_err(OrchestratorError::Storage)
    }

    /// Handles a wire-level control request. `active_page` is the URL of the
    /// page the user is looking at, if any.
    pub async fn dispatch(
        &self,
        request: Request,
        active_page: Option<String>,
    ) -> Result<Reply, OrchestratorError> {
        match request {
            Request::CapturePage => self.capture_page(active_page).await.map(Reply::Capture),
            Request::GenerateManual => self.generate_manual().await.map(|()| Reply::Accepted),
            Request::ClearArticles => self.clear_articles().await.map(|()| Reply::Accepted),
            Request::GetDefaultSources => self.default_sources().await.map(Reply::DefaultSources),
        }
    }

    async fn call<T>(
        &self,
        command: impl FnOnce(Responder<T>) -> Command,
    ) -> Result<T, OrchestratorError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .map_err(|_| OrchestratorError::Closed)?;
        rx.await.map_err(|_| OrchestratorError::Closed)
    }
}

/// Starts the orchestrator on the current tokio runtime.
///
/// The stored source list (or the defaults) is loaded before the first
/// command is handled. The task stops once every handle is dropped.
pub fn spawn<S>(
    storage: Storage<S>,
    loader: Arc<dyn PageLoader>,
    extractor: Arc<dyn Extractor>,
    config: OrchestratorConfig,
) -> (OrchestratorHandle, NotificationReceiver)
where
    S: KeyValueStore + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (note_tx, note_rx) = mpsc::unbounded_channel();

    let sources = storage.sources().unwrap_or_else(|err| {
        manual_warn!("Could not read stored sources, using defaults: {}", err);
        manual_core::default_sources()
    });
    manual_info!("Orchestrator starting with {} sources", sources.len());

    let runner = Runner {
        state: OrchestratorState::with_sources(sources),
        storage,
        context: PageContext::new(loader, extractor),
        notifications: note_tx,
        config,
        pending_capture: None,
        pending_harvest: None,
        clear_failure: None,
        pending_logs: Vec::new(),
    };
    tokio::spawn(runner.run(cmd_rx));

    (OrchestratorHandle { commands: cmd_tx }, note_rx)
}

struct Runner<S> {
    state: OrchestratorState,
    storage: Storage<S>,
    context: PageContext,
    notifications: mpsc::UnboundedSender<Notification>,
    config: OrchestratorConfig,
    pending_capture: Option<Responder<CaptureResponse>>,
    pending_harvest: Option<Responder<Result<HarvestReport, String>>>,
    clear_failure: Option<String>,
    /// `(timestamp, message)` lines written once the current command is done.
    pending_logs: Vec<(String, String)>,
}

impl<S: KeyValueStore> Runner<S> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.execute(command).await;
            self.flush_logs();
        }
        manual_info!("Orchestrator stopped");
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Capture { page_url, reply } => {
                self.pending_capture = Some(reply);
                self.handle(Msg::CaptureRequested { page_url }).await;
            }
            Command::Generate { done } => {
                let msg = match self.storage.articles() {
                    Ok(articles) => Msg::GenerateRequested {
                        article_count: articles.len(),
                    },
                    Err(err) => Msg::GenerationFinished(Err(err.to_string())),
                };
                self.handle(msg).await;
                let _ = done.send(());
            }
            Command::Clear { done } => {
                self.handle(Msg::ClearRequested).await;
                let result = self.clear_failure.take().map_or(Ok(()), Err);
                let _ = done.send(result);
            }
            Command::DefaultSources { reply } => {
                let _ = reply.send(DefaultSourcesResponse {
                    data: manual_core::default_sources(),
                });
            }
            Command::SetSources { sources, reply } => {
                let result = match self.storage.set_sources(&sources) {
                    Ok(()) => {
                        self.handle(Msg::SourcesChanged(sources)).await;
                        Ok(())
                    }
                    Err(err) => Err(err.to_string()),
                };
                let _ = reply.send(result);
            }
            Command::Harvest {
                profile_name,
                links,
                reply,
            } => {
                self.pending_harvest = Some(reply);
                self.handle(Msg::HarvestRequested {
                    profile_name,
                    links,
                })
                .await;
            }
            Command::Sources { reply } => {
                let _ = reply.send(self.state.registry().profiles().to_vec());
            }
            Command::Articles { reply } => {
                let _ = reply.send(self.storage.articles().map_err(|err| err.to_string()));
            }
            Command::ActivityLog { reply } => {
                let _ = reply.send(self.storage.activity_log().map_err(|err| err.to_string()));
            }
            Command::LastManual { reply } => {
                let _ = reply.send(self.storage.last_manual().map_err(|err| err.to_string()));
            }
            Command::ClearLogs { reply } => {
                let _ = reply.send(self.storage.clear_logs().map_err(|err| err.to_string()));
            }
        }
    }

    /// Feeds `msg` through `update` and runs effects until the flow settles.
    async fn handle(&mut self, msg: Msg) {
        let mut deferred: VecDeque<Effect> = self.apply(msg).into();
        while let Some(effect) = deferred.pop_front() {
            let follow_up = match effect {
                Effect::Capture { url, profile } => {
                    Msg::CaptureFinished(self.capture(&url, &profile).await)
                }
                Effect::RenderManual => Msg::GenerationFinished(self.render_manual().await),
                Effect::Harvest { profile, links } => {
                    Msg::HarvestFinished(self.harvest(&profile, links).await)
                }
                other => {
                    manual_warn!("Unexpected deferred effect {:?}", other);
                    continue;
                }
            };
            deferred.extend(self.apply(follow_up));
        }
    }

    /// Runs the immediate effects of `msg` and returns the ones that need I/O.
    fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut deferred = Vec::new();
        for effect in effects {
            match effect {
                Effect::Log(message) => self.log(&message),
                Effect::Notify(notification) => {
                    // No listener is fine.
                    let _ = self.notifications.send(notification);
                }
                Effect::ReplyCapture(response) => {
                    if let Some(reply) = self.pending_capture.take() {
                        let _ = reply.send(response);
                    }
                }
                Effect::ReplyHarvest(result) => {
                    if let Some(reply) = self.pending_harvest.take() {
                        let _ = reply.send(result);
                    }
                }
                Effect::ClearArticles => {
                    if let Err(err) = self.storage.clear_articles() {
                        manual_error!("Clearing articles failed: {}", err);
                        self.clear_failure = Some(err.to_string());
                    }
                }
                io_effect => deferred.push(io_effect),
            }
        }
        deferred
    }

    fn log(&mut self, message: &str) {
        let timestamp = (self.config.clock)();
        manual_info!("{}", message);
        self.pending_logs.push((timestamp, message.to_string()));
    }

    fn flush_logs(&mut self) {
        let lines = std::mem::take(&mut self.pending_logs);
        if let Err(err) = self.storage.record_logs(&lines) {
            manual_warn!("Could not store {} activity log entries: {}", lines.len(), err);
        }
    }

    async fn capture(
        &mut self,
        url: &str,
        profile: &SiteProfile,
    ) -> Result<ArticleRecord, CaptureError> {
        let request = ExtractRequest::ExtractContent {
            config: profile.clone(),
        };
        let response = self
            .context
            .send(url, request)
            .await
            .map_err(|err| CaptureError::MessageDelivery(err.to_string()))?;
        let article = response.into_result()?;
        let count = self
            .storage
            .append_article(article.clone())
            .map_err(|err| CaptureError::Storage(err.to_string()))?;
        manual_debug!("Article count is now {}", count);
        Ok(article)
    }

    async fn render_manual(&mut self) -> Result<(), String> {
        let articles = self.storage.articles().map_err(|err| err.to_string())?;
        let renderer = ManualRenderer::new();
        let total = articles.len();

        let mut html = renderer.header(&articles);
        for (index, article) in articles.iter().enumerate() {
            html.push_str(&renderer.article_section(article, index));
            if !self.config.progress_delay.is_zero() {
                tokio::time::sleep(self.config.progress_delay).await;
            }
            let stray = self.apply(Msg::GenerationAdvanced {
                completed: index + 1,
                total,
                title: article.title.clone(),
            });
            if !stray.is_empty() {
                manual_warn!("Ignoring {} effects raised mid-generation", stray.len());
            }
        }
        html.push_str(&renderer.footer());

        self.storage
            .set_last_manual(&html)
            .map_err(|err| err.to_string())
    }

    async fn harvest(
        &mut self,
        profile: &SiteProfile,
        listed: Vec<String>,
    ) -> Result<HarvestReport, String> {
        let links = if listed.is_empty() {
            let index = self
                .context
                .loader()
                .load(&profile.base_url)
                .await
                .map_err(|err| format!("could not load {}: {err}", profile.base_url))?;
            let links = discover_article_links(profile, &index).map_err(|err| err.to_string())?;
            manual_info!("Found {} article links for {}", links.len(), profile.name);
            links
        } else {
            listed
        };

        let workers = self.config.harvest_workers.max(1);
        let context = self.context.clone();
        let mut results: Vec<(String, Result<ArticleRecord, String>)> =
            stream::iter(links.iter().cloned())
                .map(|url| {
                    let context = context.clone();
                    let request = ExtractRequest::ExtractContent {
                        config: profile.clone(),
                    };
                    async move {
                        let result = match context.send(&url, request).await {
                            Ok(response) => response.into_result().map_err(|err| err.to_string()),
                            Err(err) => Err(err.to_string()),
                        };
                        (url, result)
                    }
                })
                .buffer_unordered(workers)
                .collect()
                .await;
        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut captured = Vec::new();
        let mut failures = Vec::new();
        for (url, result) in results {
            match result {
                Ok(article) => captured.push(article),
                Err(message) => failures.push(HarvestFailure { url, message }),
            }
        }
        captured.sort_by(|a, b| a.title.cmp(&b.title));

        let report = HarvestReport {
            profile: profile.name.clone(),
            discovered: links.len(),
            captured: captured.len(),
            failures,
        };
        if !captured.is_empty() {
            self.storage
                .append_articles(captured)
                .map_err(|err| err.to_string())?;
        }
        Ok(report)
    }
}
