//! Error types for request pipeline processing.
//!
//! This module provides [`PipelineError`], the single error type produced by
//! stages, handlers and routing glue. Every variant maps to a well-defined
//! piece of the error taxonomy:
//!
//! | Variant | Meaning | HTTP status |
//! |---|---|---|
//! | `ClientInput` | missing/invalid content type, malformed body | 400 |
//! | `Validation` | schema validation failure with field detail | 400 |
//! | `MappingDispatch` | no schema entry for a runtime type | 500 |
//! | `StageConfiguration` | a stage was given an unusable value/config | 500 |
//! | `ReverseLookup` | no route under a name during URL generation | 500 |
//! | `Domain` | an uncaught handler error | 500 |
//!
//! Client-side variants are translated to responses by the stages that raise
//! them; server-side variants escape the pipeline so the hosting server can
//! log them and answer with an opaque 500.

use std::any::TypeId;
use std::collections::HashMap;

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Result type alias using [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Coarse classification of a [`PipelineError`].
///
/// Used by tests and by the hosting server to tell configuration faults
/// apart from ordinary client errors without matching on variant payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineErrorKind {
    /// Malformed request input (content type, body, query).
    ClientInput,
    /// Schema validation failure.
    Validation,
    /// Serializer mapping had no entry for the value's runtime type.
    MappingDispatch,
    /// A stage received a value or configuration it cannot process.
    StageConfiguration,
    /// Reverse URL lookup failed.
    ReverseLookup,
    /// Uncaught domain error raised by a handler.
    Domain,
}

/// The error type for everything that can go wrong inside a request pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request input could not be read as JSON at all.
    #[error("{message}")]
    ClientInput {
        /// Human-readable error message.
        message: String,
    },

    /// The request body failed schema validation.
    #[error("{message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// Field-level validation detail.
        #[source]
        errors: ValidationErrors,
    },

    /// A serialize stage was configured with a type mapping and the value's
    /// runtime type has no entry.
    ///
    /// This is a configuration mismatch on the server side, deliberately
    /// distinct from a validation error: it must never degrade into a
    /// silently empty response body.
    #[error("no schema registered for runtime type {type_id:?}")]
    MappingDispatch {
        /// Type identity of the value that had no matching schema.
        type_id: TypeId,
    },

    /// A stage was handed a value it cannot process (e.g. a paginated
    /// serializer receiving something that is not a pagination envelope).
    #[error("stage configuration error: {message}")]
    StageConfiguration {
        /// Human-readable error message.
        message: String,
    },

    /// Reverse URL lookup failed for an endpoint name.
    #[error("no route registered under the name '{name}'")]
    ReverseLookup {
        /// The endpoint name that could not be resolved.
        name: String,
    },

    /// An error raised by a handler that no catch stage intercepted.
    #[error(transparent)]
    Domain(#[from] anyhow::Error),
}

impl PipelineError {
    /// Creates a client input error.
    #[must_use]
    pub fn client_input(message: impl Into<String>) -> Self {
        Self::ClientInput {
            message: message.into(),
        }
    }

    /// Creates a validation error with field detail.
    #[must_use]
    pub fn validation(message: impl Into<String>, errors: ValidationErrors) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Creates a stage configuration error.
    #[must_use]
    pub fn stage_configuration(message: impl Into<String>) -> Self {
        Self::StageConfiguration {
            message: message.into(),
        }
    }

    /// Creates a mapping dispatch failure for the given runtime type.
    #[must_use]
    pub fn mapping_dispatch(type_id: TypeId) -> Self {
        Self::MappingDispatch { type_id }
    }

    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            Self::ClientInput { .. } => PipelineErrorKind::ClientInput,
            Self::Validation { .. } => PipelineErrorKind::Validation,
            Self::MappingDispatch { .. } => PipelineErrorKind::MappingDispatch,
            Self::StageConfiguration { .. } => PipelineErrorKind::StageConfiguration,
            Self::ReverseLookup { .. } => PipelineErrorKind::ReverseLookup,
            Self::Domain(_) => PipelineErrorKind::Domain,
        }
    }

    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            PipelineErrorKind::ClientInput | PipelineErrorKind::Validation => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if the error is the client's fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Field-level validation errors reported by a schema.
#[derive(Debug, Clone, Default, Serialize, Error)]
#[error("field validation errors")]
pub struct ValidationErrors {
    /// Map of field path to the error messages reported for it.
    pub fields: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates a new empty set of validation errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Records a deserialization failure that is not tied to one field.
    #[must_use]
    pub fn schema_level(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add("_schema", message);
        errors
    }

    /// Returns `true` if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
