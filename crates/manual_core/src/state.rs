use crate::{SiteProfile, SourceRegistry};

/// Where the orchestrator is in its current flow.
///
/// The failure phases accept new requests exactly like `Idle`; they only
/// remember how the last flow ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Capturing {
        url: String,
    },
    CaptureFailed {
        message: String,
    },
    Generating {
        current: usize,
        total: usize,
    },
    GenerationFailed {
        message: String,
    },
    Harvesting {
        profile: String,
    },
    HarvestFailed {
        message: String,
    },
}

impl Phase {
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            Phase::Idle
                | Phase::CaptureFailed { .. }
                | Phase::GenerationFailed { .. }
                | Phase::HarvestFailed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrchestratorState {
    phase: Phase,
    registry: SourceRegistry,
}

impl OrchestratorState {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            phase: Phase::Idle,
            registry,
        }
    }

    pub fn with_sources(profiles: Vec<SiteProfile>) -> Self {
        Self::new(SourceRegistry::new(profiles))
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn registry_mut(&mut self) -> &mut SourceRegistry {
        &mut self.registry
    }
}
