//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every validation failure is detected and returned before any event is
/// recorded; an aggregate never appends an event it cannot justify. Each
/// variant carries a stable machine-readable kind (see [`DomainError::kind`])
/// plus a human-readable message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or empty input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The aggregate (or an index into it) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate creation guard.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Duplicate registration guard.
    #[error("already registered: {0}")]
    AlreadyRegistered(String),

    /// A drop/removal referenced a player that was never registered.
    #[error("not registered: {0}")]
    NotRegistered(String),

    /// Fixtures were already generated, or a start was already recorded.
    #[error("already scheduled: {0}")]
    AlreadyScheduled(String),

    /// The game, match, tournament or season has already ended.
    #[error("already ended: {0}")]
    AlreadyEnded(String),

    /// The operation is not permitted in the aggregate's current phase.
    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    /// The optimistic append lost the race; reload and retry.
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// The aggregate has been tombstoned.
    #[error("deleted: {0}")]
    Deleted(String),

    /// The command surface received an unknown action name.
    #[error("unrecognized action: {0}")]
    UnrecognizedAction(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn already_registered(msg: impl Into<String>) -> Self {
        Self::AlreadyRegistered(msg.into())
    }

    pub fn not_registered(msg: impl Into<String>) -> Self {
        Self::NotRegistered(msg.into())
    }

    pub fn already_scheduled(msg: impl Into<String>) -> Self {
        Self::AlreadyScheduled(msg.into())
    }

    pub fn already_ended(msg: impl Into<String>) -> Self {
        Self::AlreadyEnded(msg.into())
    }

    pub fn invalid_phase(msg: impl Into<String>) -> Self {
        Self::InvalidPhase(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::ConcurrencyConflict(msg.into())
    }

    pub fn deleted(msg: impl Into<String>) -> Self {
        Self::Deleted(msg.into())
    }

    pub fn unrecognized_action(msg: impl Into<String>) -> Self {
        Self::UnrecognizedAction(msg.into())
    }

    /// Stable machine-readable kind for transports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid-argument",
            Self::NotFound(_) => "not-found",
            Self::AlreadyExists(_) => "already-exists",
            Self::AlreadyRegistered(_) => "already-registered",
            Self::NotRegistered(_) => "not-registered",
            Self::AlreadyScheduled(_) => "already-scheduled",
            Self::AlreadyEnded(_) => "already-ended",
            Self::InvalidPhase(_) => "invalid-phase",
            Self::ConcurrencyConflict(_) => "concurrency-conflict",
            Self::Deleted(_) => "deleted",
            Self::UnrecognizedAction(_) => "unrecognized-action",
        }
    }
}
