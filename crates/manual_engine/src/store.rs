use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use manual_core::{default_sources, ActivityLog, ArticleRecord, SiteProfile};
use manual_logging::manual_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

pub const SOURCES_KEY: &str = "sources";
pub const ARTICLES_KEY: &str = "articles";
pub const MANUAL_KEY: &str = "lastGeneratedManualHtml";
pub const LOGS_KEY: &str = "manualGeneratorLogs";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {path:?} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("value under {key:?} has an unexpected shape: {source}")]
    Shape {
        key: String,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Local key-value storage holding JSON values.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys live in one JSON object file, rewritten atomically on each change.
///
/// A change reaches the in-memory map only after the file was written, so a
/// failed write leaves both untouched.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        manual_debug!("Opened store {:?} with {} keys", path, entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PersistError::OutputDir(format!("bad store path {:?}", self.path)))?;
        let text = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Shape {
                key: "*".to_string(),
                source,
            }
        })?;
        AtomicFileWriter::new(dir).write(filename, &text)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut candidate = self.entries.clone();
        candidate.insert(key.to_string(), value);
        self.flush(&candidate)?;
        self.entries = candidate;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut candidate = self.entries.clone();
        candidate.remove(key);
        self.flush(&candidate)?;
        self.entries = candidate;
        Ok(())
    }
}

/// Typed access to the four keys the manual harvester persists.
pub struct Storage<S> {
    inner: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// The stored source list, or the built-in defaults when none is stored.
    pub fn sources(&self) -> Result<Vec<SiteProfile>, StoreError> {
        Ok(self.read(SOURCES_KEY)?.unwrap_or_else(default_sources))
    }

    pub fn set_sources(&mut self, sources: &[SiteProfile]) -> Result<(), StoreError> {
        self.write(SOURCES_KEY, sources)
    }

    pub fn articles(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        Ok(self.read(ARTICLES_KEY)?.unwrap_or_default())
    }

    /// Appends one article and returns the new article count.
    pub fn append_article(&mut self, article: ArticleRecord) -> Result<usize, StoreError> {
        self.append_articles(vec![article])
    }

    pub fn append_articles(&mut self, new: Vec<ArticleRecord>) -> Result<usize, StoreError> {
        let mut articles = self.articles()?;
        articles.extend(new);
        self.write(ARTICLES_KEY, &articles)?;
        Ok(articles.len())
    }

    /// Empties the article list and drops the cached manual.
    pub fn clear_articles(&mut self) -> Result<(), StoreError> {
        self.write(ARTICLES_KEY, &Vec::<ArticleRecord>::new())?;
        self.inner.remove(MANUAL_KEY)
    }

    pub fn last_manual(&self) -> Result<Option<String>, StoreError> {
        self.read(MANUAL_KEY)
    }

    pub fn set_last_manual(&mut self, html: &str) -> Result<(), StoreError> {
        self.write(MANUAL_KEY, html)
    }

    pub fn activity_log(&self) -> Result<ActivityLog, StoreError> {
        let entries: Vec<String> = self.read(LOGS_KEY)?.unwrap_or_default();
        Ok(ActivityLog::from_entries(entries))
    }

    /// Appends `(timestamp, message)` lines to the activity log in one write.
    pub fn record_logs(&mut self, lines: &[(String, String)]) -> Result<(), StoreError> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut log = self.activity_log()?;
        for (timestamp, message) in lines {
            log.record(timestamp, message);
        }
        self.write(LOGS_KEY, &log.into_entries())
    }

    pub fn clear_logs(&mut self) -> Result<(), StoreError> {
        self.inner.remove(LOGS_KEY)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.inner.get(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Shape {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Shape {
            key: key.to_string(),
            source,
        })?;
        self.inner.set(key, value)
    }
}
