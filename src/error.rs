// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use thiserror::Error;

/// Every failure surfaced by the compiler and the index façade.
///
/// All variants except [`SearchError::Transport`] are raised locally, before
/// any command is handed to the transport.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid schema field '{field}': {message}")]
    SchemaValidation { field: String, message: String },

    #[error("type mismatch for field '{field}': expected {expected}, got {actual}")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
        actual: String,
    },

    #[error("query builder error: {0}")]
    QueryBuilder(String),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("unexpected reply shape: {0}")]
    UnexpectedReply(String),
}

impl SearchError {
    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::SchemaValidation { .. } => "schema_validation",
            SearchError::FieldTypeMismatch { .. } => "field_type_mismatch",
            SearchError::QueryBuilder(_) => "query_builder",
            SearchError::Transport(_) => "transport",
            SearchError::UnexpectedReply(_) => "unexpected_reply",
        }
    }
}

impl From<redis::RedisError> for SearchError {
    fn from(err: redis::RedisError) -> Self {
        SearchError::Transport(Box::new(err))
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
