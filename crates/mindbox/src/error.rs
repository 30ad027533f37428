use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Which table a missing reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Box,
    Thought,
    Keyword,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Box => write!(f, "Box"),
            EntityKind::Thought => write!(f, "Thought"),
            EntityKind::Keyword => write!(f, "Keyword"),
        }
    }
}

/// Failures of the durable write/read capability.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

#[derive(Error, Debug)]
pub enum MindBoxError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot move box {box_id} under {parent_id}: it would create a cycle")]
    CycleDetected { box_id: Uuid, parent_id: Uuid },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Config error: {0}")]
    Config(String),
}

impl MindBoxError {
    /// `id` is a full id or whatever the user typed to look one up.
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        MindBoxError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MindBoxError>;
