// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # RediSearch Builder
//!
//! A typed command compiler for the RediSearch `FT.*` family.
//!
//! ## Architecture
//!
//! Builders are plain values; compiling one is a pure read that yields a flat
//! token list. Only the [`Index`] façade talks to a [`Transport`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Builders                            │
//! │  • Schema / Field        → SCHEMA ...                      │
//! │  • Query + predicates    → FT.SEARCH args                  │
//! │  • AggregatePipeline     → FT.AGGREGATE args               │
//! │  • HybridQuery           → FT.HYBRID args                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                       compile(&self)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Index façade                          │
//! │  • Validates documents against the schema                  │
//! │  • Key prefix translation (INKEYS in, ids out)             │
//! │  • tracing spans + metrics per command                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                     Transport::send(tokens)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Transport (ConnectionManager,               │
//! │                 RecordingTransport, your own)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                         redis::Value
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Reply shaping                         │
//! │  • search / aggregate rows, config, syndump, spellcheck    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use redisearch_builder::{Query, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .text_field("$.model", json!({"as": "model"}))
//!     .numeric_field("$.price", json!({"as": "price"}))
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.len(), 2);
//!
//! let query = Query::new("@model:Jigger").return_field("price");
//! assert_eq!(
//!     query.compile().unwrap(),
//!     ["@model:Jigger", "RETURN", "1", "price", "DIALECT", "2"]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: fields and schema definitions
//! - [`search`]: predicate trees and `FT.SEARCH` queries
//! - [`aggregate`]: `FT.AGGREGATE` pipelines, reducers, cursors
//! - [`hybrid`]: `FT.HYBRID` lexical + vector queries
//! - [`index`]: the façade that sends compiled commands
//! - [`reply`]: reshaping of raw replies
//! - [`transport`]: the send seam
//! - [`metrics`]: counters and histograms

pub mod aggregate;
pub mod config;
pub mod error;
pub mod hybrid;
pub mod index;
pub mod metrics;
pub mod reply;
pub mod schema;
pub mod search;
pub mod token;
pub mod transport;

pub use aggregate::{reducers, AggregatePipeline, CursorOptions, Reducer, SortKey, Step};
pub use config::BuilderConfig;
pub use error::{Result, SearchError};
pub use hybrid::{CombineMethod, HybridQuery, PostProcessing, SearchClause, VsimClause, VsimMethod};
pub use index::{
    CreateOptions, Index, IndexDefinition, ProfileTarget, SearchInput, SearchOptions,
    SpellcheckOptions, StorageKind,
};
pub use reply::{AggregateResults, Document, SearchResults, SpellcheckReply, Suggestion};
pub use schema::{Field, FieldType, Schema, SchemaBuilder};
pub use search::{Connective, Predicate, PredicateCollection, Query, SortOrder};
pub use token::{f32_blob, Token};
pub use transport::{RecordingTransport, Transport};
