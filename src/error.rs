use thiserror::Error;

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-wide error taxonomy.
///
/// Repos stay on `sqlx::Result`; services lift storage failures into
/// `Transient` and translate domain rejections into the other variants.
#[derive(Debug, Error)]
pub enum EngineError {
    /// User-correctable: the viewer's profile is not ready for discovery.
    #[error("precondition failed: {0}")]
    Precondition(Precondition),

    /// Rejected write: duplicate signal, self-swipe, blocked pair.
    #[error("conflict: {0}")]
    Conflict(Conflict),

    #[error("not found: {0}")]
    NotFound(String),

    /// Store/index failure; safe to retry with backoff at the caller.
    #[error("transient storage failure: {0}")]
    Transient(#[from] sqlx::Error),

    /// The uniqueness / compare-and-set invariant was bypassed. Never
    /// swallowed; always logged at error level before surfacing.
    #[error("data integrity violation: {0}")]
    Integrity(String),
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound(what.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The viewer has no location set.
    NoLocation,
    /// The viewer has no preferences row.
    IncompleteProfile,
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precondition::NoLocation => write!(f, "no location set"),
            Precondition::IncompleteProfile => write!(f, "profile incomplete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    SelfSwipe,
    /// A signal already exists for this ordered (actor, target) pair.
    DuplicateSignal,
    /// The pair is in a block relation (either direction).
    BlockedPair,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::SelfSwipe => write!(f, "cannot swipe on yourself"),
            Conflict::DuplicateSignal => write!(f, "swipe already recorded"),
            Conflict::BlockedPair => write!(f, "pair is blocked"),
        }
    }
}

/// True when the underlying driver rejected an insert on a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |db| db.is_unique_violation())
}
