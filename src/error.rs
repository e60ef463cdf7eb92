//! Error types for query compilation.

use crate::config::ConfigError;
use crate::representation::{Datatype, PropertyValueRelation};
use thiserror::Error;

/// Failure of a single compile call. Nothing is recovered; the first error
/// aborts the whole compilation.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Unexpected value for datatype '{datatype}': expected {expected}, found {found}")]
    UnexpectedValue {
        datatype: Datatype,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unexpected datatype '{datatype}' for the {builder} pattern builder")]
    UnexpectedDatatype {
        builder: &'static str,
        datatype: Datatype,
    },

    #[error("Unsupported relation '{relation}' for datatype '{datatype}'")]
    UnsupportedRelation {
        datatype: Datatype,
        relation: PropertyValueRelation,
    },

    #[error("Date string not in expected format: {0}")]
    MalformedDate(String),

    #[error("Unexpected precision value: {0}")]
    UnexpectedPrecision(u8),

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Condition index was not initialized before requesting a condition variable")]
    UninitializedConditionIndex,
}

impl BuildError {
    /// True when the failure comes from deployment configuration rather than
    /// from the condition being compiled.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, BuildError::Configuration(_))
    }
}
