//! Manual harvester core: domain types, source registry and the pure
//! orchestrator state machine.
mod activity_log;
mod effect;
mod error;
mod msg;
mod profile;
mod protocol;
mod registry;
mod state;
mod update;

pub use activity_log::{format_entry, ActivityLog, LOG_CAPACITY};
pub use effect::Effect;
pub use error::{CaptureError, ExtractionFailure, ExtractionFailureKind};
pub use msg::Msg;
pub use profile::{ArticleRecord, HarvestFailure, HarvestReport, SiteProfile, EMPTY_CONTENT_PLACEHOLDER};
pub use protocol::{
    CaptureResponse, DefaultSourcesResponse, ErrorDetail, ExtractRequest, ExtractResponse,
    Notification, Request,
};
pub use registry::{default_sources, SourceRegistry};
pub use state::{OrchestratorState, Phase};
pub use update::update;
