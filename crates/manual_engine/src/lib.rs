//! I/O side of the manual harvester: page loading, selector extraction, link
//! discovery, manual rendering, persistence and the orchestrator task that
//! drives `manual_core::update`.
mod context;
mod extract;
mod links;
mod orchestrator;
mod page;
mod render;
mod rewrite;
mod store;

pub use context::PageContext;
pub use extract::{Extractor, SelectorExtractor};
pub use links::discover_article_links;
pub use orchestrator::{
    spawn, Clock, NotificationReceiver, OrchestratorConfig, OrchestratorError,
    OrchestratorHandle, Reply,
};
pub use page::{
    decode_html, FetchSettings, HttpPageLoader, PageError, PageFailureKind, PageLoader,
    PageSnapshot, SnapshotPageLoader,
};
pub use render::{
    anchor, render, FragmentFilter, ManualRenderer, Verbatim, MANUAL_CONTENT_TYPE,
    MANUAL_FILENAME, MANUAL_TITLE,
};
pub use store::{
    ensure_output_dir, AtomicFileWriter, JsonFileStore, KeyValueStore, MemoryStore,
    PersistError, Storage, StoreError, ARTICLES_KEY, LOGS_KEY, MANUAL_KEY, SOURCES_KEY,
};
