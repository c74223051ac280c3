// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Aggregations.
//!
//! ```
//! use redisearch_builder::aggregate::{reducers, AggregatePipeline};
//!
//! let pipeline = AggregatePipeline::new("*")
//!     .load_all()
//!     .group_by(["@condition"], [reducers::count().alias("n")]);
//!
//! assert_eq!(
//!     pipeline.compile(),
//!     ["*", "LOAD", "*", "GROUPBY", "1", "@condition", "REDUCE", "COUNT", "0", "AS", "n"]
//! );
//! ```

mod cursor;
mod pipeline;
mod reducer;

pub use cursor::{cursor_del_command, cursor_read_command, CursorOptions};
pub use pipeline::{AggregatePipeline, Load, SortKey, Step};
pub use reducer::{Reducer, ReducerFn};
pub(crate) use pipeline::{write_apply, write_group_by};

/// Reducer constructors.
pub mod reducers {
    pub use super::reducer::{
        avg, count, count_distinct, count_distinctish, first_value, max, min, quantile,
        random_sample, stddev, sum, to_list,
    };
}
