use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Error type for precondition failures raised by the engine and its generators.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }
}

/// Data-integrity findings that are reported alongside results instead of failing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWarning {
    /// The amount could not be read as a number; the record contributes zero.
    MalformedAmount { id: Option<Uuid>, raw: String },
    /// The amount was numeric but not strictly positive.
    NonPositiveAmount { id: Uuid },
    /// The record was neither income nor expense and was left out of aggregates.
    UnknownKind { id: Option<Uuid>, raw: String },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::MalformedAmount { id, raw } => {
                write!(f, "malformed amount `{}` on {}", raw, describe_id(id))
            }
            DataWarning::NonPositiveAmount { id } => {
                write!(f, "non-positive amount on transaction {}", id)
            }
            DataWarning::UnknownKind { id, raw } => {
                write!(f, "unknown type `{}` on {}", raw, describe_id(id))
            }
        }
    }
}

fn describe_id(id: &Option<Uuid>) -> String {
    match id {
        Some(id) => format!("transaction {}", id),
        None => "transaction without id".into(),
    }
}
