//! Error types for building values from parsed specs
//!
//! Parse-phase errors live in `spec_core::error`; this module covers
//! resolution and construction, plus the facade error returned by `Repo`.

use spec_core::ParseError;
use thiserror::Error;

use crate::value::{join_types, ArgType};

/// Failure inside a registered constructor
#[derive(Error, Debug)]
pub enum ConstructorError {
    #[error("invalid argument {index} for '{type_name}': {message}")]
    InvalidArgument {
        type_name: String,
        index: usize,
        message: String,
    },

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ConstructorError {
    pub fn invalid_argument(
        type_name: impl Into<String>,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        ConstructorError::InvalidArgument {
            type_name: type_name.into(),
            index,
            message: message.into(),
        }
    }
}

/// Failure of `instantiate`
///
/// Building stops at the first failing node in evaluation order.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("type '{type_name}' is not registered")]
    NotFound { type_name: String },

    #[error("no constructor of '{type_name}' accepts ({})", join_types(.arg_types))]
    Resolution {
        type_name: String,
        arg_types: Vec<ArgType>,
    },

    #[error(transparent)]
    Constructor(#[from] ConstructorError),
}

impl BuildError {
    /// Type name as written in the spec, when the error concerns one
    pub fn type_name(&self) -> Option<&str> {
        match self {
            BuildError::NotFound { type_name } | BuildError::Resolution { type_name, .. } => {
                Some(type_name)
            }
            BuildError::Constructor(ConstructorError::InvalidArgument { type_name, .. }) => {
                Some(type_name)
            }
            BuildError::Constructor(ConstructorError::Failed(_)) => None,
        }
    }
}

/// Main error type of the repo facade
#[derive(Error, Debug)]
pub enum SpecError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
