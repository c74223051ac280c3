// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search queries.
//!
//! # Architecture
//!
//! ```text
//! Predicate / PredicateCollection (tree)
//!     ↓ render
//! Query (query string + result shaping options)
//!     ↓ compile
//! FT.SEARCH <index> <args...>
//! ```
//!
//! # Query Language (RediSearch syntax)
//!
//! ```text
//! (@city:{NY})                  - Tag equality
//! (@age:[30 35])                - Numeric range
//! (@name:ali*)                  - Text match (pattern passed through)
//! ((@a:{x}) (@b:[1 2]))         - AND
//! ((@a:{x}) | (@a:{y}))         - OR
//! ```

mod predicate;
mod query;

pub use predicate::{
    escape_tag_value, Connective, Predicate, PredicateCollection, PredicateNode, PredicateScopes,
};
pub use query::{
    GeoFilter, GeoUnit, Highlight, NumericFilter, Query, SortOrder, Summarize, DEFAULT_DIALECT,
};
pub(crate) use query::{bind_param, write_params};
