use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use manual_core::{default_sources, Notification, Request, SiteProfile};
use manual_engine::{
    decode_html, spawn, AtomicFileWriter, HttpPageLoader, JsonFileStore, NotificationReceiver,
    OrchestratorHandle, PageLoader, Reply, SelectorExtractor, SnapshotPageLoader, Storage,
};
use manual_logging::{manual_error, manual_info};

use crate::cli::{Command, SourcesCommand};
use crate::config::AppConfig;

pub async fn run(command: Command, config: &AppConfig, store_path: &Path) -> Result<()> {
    let loader = page_loader(&command, config)?;
    let store = JsonFileStore::open(store_path)
        .with_context(|| format!("Failed to open store {:?}", store_path))?;
    let (handle, mut notifications) = spawn(
        Storage::new(store),
        loader,
        Arc::new(SelectorExtractor),
        config.orchestrator_config(),
    );

    execute(&handle, &mut notifications, command).await
}

fn page_loader(command: &Command, config: &AppConfig) -> Result<Arc<dyn PageLoader>> {
    if let Command::Capture {
        url,
        html: Some(file),
    } = command
    {
        let bytes = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
        let loader = SnapshotPageLoader::new().with_page(url.clone(), decode_html(&bytes, None));
        return Ok(Arc::new(loader));
    }
    Ok(Arc::new(HttpPageLoader::new(config.fetch_settings())?))
}

async fn execute(
    handle: &OrchestratorHandle,
    notifications: &mut NotificationReceiver,
    command: Command,
) -> Result<()> {
    match command {
        Command::Capture { url, .. } => {
            match handle.dispatch(Request::CapturePage, Some(url)).await? {
                Reply::Capture(response) if response.is_success() => {
                    println!("{}", response.message());
                }
                Reply::Capture(response) => bail!("{}", response.message()),
                other => bail!("Unexpected reply to capture: {other:?}"),
            }
        }
        Command::Harvest { profile, urls } => {
            let report = handle.harvest_links(&profile, urls).await?;
            for failure in &report.failures {
                println!("  skipped {}: {}", failure.url, failure.message);
            }
            println!(
                "Harvested {} of {} articles from {}.",
                report.captured, report.discovered, report.profile
            );
        }
        Command::Generate { out } => {
            generate(handle, notifications).await?;
            if let Some(out) = out {
                download(handle, &out).await?;
            }
        }
        Command::Download { out } => download(handle, &out).await?,
        Command::Clear => {
            handle.dispatch(Request::ClearArticles, None).await?;
            println!("All articles were cleared.");
        }
        Command::Articles => {
            let articles = handle.articles().await?;
            if articles.is_empty() {
                println!("No articles stored.");
            }
            for (index, article) in articles.iter().enumerate() {
                println!("{:>3}. {}", index + 1, article.title);
            }
        }
        Command::Sources(sources) => execute_sources(handle, sources).await?,
        Command::Logs { clear: true } => {
            handle.clear_logs().await?;
            println!("Activity log cleared.");
        }
        Command::Logs { clear: false } => {
            let log = handle.activity_log().await?;
            if log.is_empty() {
                println!("No activity recorded.");
            }
            for entry in log.latest_first() {
                println!("{entry}");
            }
        }
    }
    Ok(())
}

async fn execute_sources(handle: &OrchestratorHandle, command: SourcesCommand) -> Result<()> {
    match command {
        SourcesCommand::List => {
            for profile in handle.sources().await? {
                let harvest = if profile.article_links_selector.is_some() {
                    " (harvestable)"
                } else {
                    ""
                };
                println!(
                    "{}\t{}\t{}{}",
                    profile.name, profile.domain_match, profile.base_url, harvest
                );
            }
        }
        SourcesCommand::Defaults => match handle.dispatch(Request::GetDefaultSources, None).await? {
            Reply::DefaultSources(response) => {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            other => bail!("Unexpected reply to getDefaultSources: {other:?}"),
        },
        SourcesCommand::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let sources: Vec<SiteProfile> = serde_json::from_str(&text)
                .with_context(|| format!("{:?} is not a JSON list of sources", file))?;
            let count = sources.len();
            handle.set_sources(sources).await?;
            println!("Imported {count} sources.");
        }
        SourcesCommand::Reset => {
            let sources = default_sources();
            let count = sources.len();
            handle.set_sources(sources).await?;
            println!("Restored {count} default sources.");
        }
    }
    Ok(())
}

/// Runs a generation while echoing progress notifications.
async fn generate(
    handle: &OrchestratorHandle,
    notifications: &mut NotificationReceiver,
) -> Result<()> {
    let mut outcome = None;
    let generation = handle.dispatch(Request::GenerateManual, None);
    tokio::pin!(generation);
    loop {
        tokio::select! {
            result = &mut generation => {
                result?;
                break;
            }
            Some(note) = notifications.recv() => report(note, &mut outcome),
        }
    }
    while let Ok(note) = notifications.try_recv() {
        report(note, &mut outcome);
    }

    match outcome {
        Some(Ok(true)) => println!("Manual generated and saved for download."),
        Some(Ok(false)) => println!("No articles to process."),
        Some(Err(message)) => bail!("Manual generation failed: {message}"),
        None => bail!("Manual generation ended without a result"),
    }
    Ok(())
}

fn report(note: Notification, outcome: &mut Option<Result<bool, String>>) {
    match note {
        Notification::ProgressUpdate { current, total } => {
            println!("Processing article {current}/{total}");
        }
        Notification::GenerationComplete { download_ready } => {
            *outcome = Some(Ok(download_ready.unwrap_or(false)));
        }
        Notification::CriticalError { message } => {
            manual_error!("Generation error: {}", message);
            *outcome = Some(Err(message));
        }
    }
}

async fn download(handle: &OrchestratorHandle, out: &Path) -> Result<()> {
    let Some(html) = handle.last_manual().await? else {
        bail!("No manual has been generated yet. Run `manual generate` first.");
    };
    let written = write_manual(out, &html)?;
    manual_info!("Manual written to {:?}", written);
    println!("Manual written to {}", written.display());
    Ok(())
}

fn write_manual(path: &Path, html: &str) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid output path {:?}", path))?;
    Ok(AtomicFileWriter::new(dir).write(filename, html)?)
}
