use thiserror::Error;

#[derive(Debug, Error)]
pub enum DmaicError {
    #[error("not initialized: run 'dmaic init'")]
    NotInitialized,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("cannot start phase '{phase}' of '{project}': {reason}")]
    PhaseOrderViolation {
        project: String,
        phase: String,
        reason: String,
    },

    #[error("cannot complete phase '{phase}' of '{project}': phase is {status}")]
    InvalidPhaseTransition {
        project: String,
        phase: String,
        status: String,
    },

    #[error("no meaningful content for tool '{tool}': add at least one filled-in entry")]
    EmptyToolData { tool: String },

    #[error("version {version} of tool '{tool}' not found")]
    VersionNotFound { tool: String, version: u32 },

    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    #[error("invalid tool type: {0}")]
    InvalidToolType(String),

    #[error("invalid project status: {0}")]
    InvalidStatus(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DmaicError>;
