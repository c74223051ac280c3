// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the index façade.
//!
//! # Example
//!
//! ```
//! use redisearch_builder::{BuilderConfig, StorageKind};
//!
//! // Minimal config (uses defaults)
//! let config = BuilderConfig::default();
//! assert_eq!(config.default_dialect, 2);
//! assert_eq!(config.key_separator, ":");
//!
//! // JSON documents, ids returned with their prefix
//! let config = BuilderConfig {
//!     storage: StorageKind::Json,
//!     strip_prefix_on_read: false,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

use crate::index::StorageKind;

/// Defaults applied by [`Index`](crate::Index) when the caller does not say
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuilderConfig {
    /// Dialect used by `FT.SEARCH` / `FT.EXPLAIN` when the query sets none
    #[serde(default = "default_dialect")]
    pub default_dialect: u32,

    /// Joins the key prefix and the document id
    #[serde(default = "default_key_separator")]
    pub key_separator: String,

    /// Document storage for new indexes
    #[serde(default)]
    pub storage: StorageKind,

    /// Remove the key prefix from ids in search replies
    #[serde(default = "default_strip_prefix_on_read")]
    pub strip_prefix_on_read: bool,
}

fn default_dialect() -> u32 { 2 }
fn default_key_separator() -> String { ":".to_string() }
fn default_strip_prefix_on_read() -> bool { true }

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_dialect: default_dialect(),
            key_separator: default_key_separator(),
            storage: StorageKind::default(),
            strip_prefix_on_read: default_strip_prefix_on_read(),
        }
    }
}
