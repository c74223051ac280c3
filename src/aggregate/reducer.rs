// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! GROUPBY reducers.
//!
//! Each reducer owns its positional argument list; the `REDUCE` count is
//! always derived from that list, never supplied by the caller.
//!
//! ```text
//! REDUCE COUNT 0 AS n
//! REDUCE SUM 1 @price AS total
//! REDUCE QUANTILE 2 @price 0.5
//! REDUCE FIRST_VALUE 4 @name BY @age DESC
//! ```

use crate::search::SortOrder;
use crate::token::Token;

/// Reducer catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerFn {
    Count,
    CountDistinct,
    CountDistinctish,
    Sum,
    Min,
    Max,
    Avg,
    StdDev,
    Quantile,
    ToList,
    FirstValue,
    RandomSample,
}

impl ReducerFn {
    pub fn as_str(self) -> &'static str {
        match self {
            ReducerFn::Count => "COUNT",
            ReducerFn::CountDistinct => "COUNT_DISTINCT",
            ReducerFn::CountDistinctish => "COUNT_DISTINCTISH",
            ReducerFn::Sum => "SUM",
            ReducerFn::Min => "MIN",
            ReducerFn::Max => "MAX",
            ReducerFn::Avg => "AVG",
            ReducerFn::StdDev => "STDDEV",
            ReducerFn::Quantile => "QUANTILE",
            ReducerFn::ToList => "TOLIST",
            ReducerFn::FirstValue => "FIRST_VALUE",
            ReducerFn::RandomSample => "RANDOM_SAMPLE",
        }
    }
}

/// One `REDUCE` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Reducer {
    function: ReducerFn,
    args: Vec<Token>,
    alias: Option<String>,
}

impl Reducer {
    pub fn new(function: ReducerFn, args: Vec<Token>) -> Self {
        Self {
            function,
            args,
            alias: None,
        }
    }

    /// Output name (`AS alias`).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn function(&self) -> ReducerFn {
        self.function
    }

    pub fn args(&self) -> &[Token] {
        &self.args
    }

    pub fn write(&self, out: &mut Vec<Token>) {
        out.push("REDUCE".into());
        out.push(self.function.as_str().into());
        out.push(self.args.len().into());
        out.extend(self.args.iter().cloned());
        if let Some(alias) = &self.alias {
            out.push("AS".into());
            out.push(alias.into());
        }
    }
}

fn property_token(property: impl Into<String>) -> Token {
    let property: String = property.into();
    Token::from(property)
}

fn unary(function: ReducerFn, property: impl Into<String>) -> Reducer {
    Reducer::new(function, vec![property_token(property)])
}

pub fn count() -> Reducer {
    Reducer::new(ReducerFn::Count, Vec::new())
}

pub fn count_distinct(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::CountDistinct, property)
}

pub fn count_distinctish(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::CountDistinctish, property)
}

pub fn sum(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::Sum, property)
}

pub fn min(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::Min, property)
}

pub fn max(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::Max, property)
}

pub fn avg(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::Avg, property)
}

pub fn stddev(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::StdDev, property)
}

/// `quantile` is in `[0, 1]`.
pub fn quantile(property: impl Into<String>, quantile: f64) -> Reducer {
    Reducer::new(
        ReducerFn::Quantile,
        vec![property_token(property), quantile.into()],
    )
}

pub fn to_list(property: impl Into<String>) -> Reducer {
    unary(ReducerFn::ToList, property)
}

/// First value of `property`, optionally ordered `BY field [ASC|DESC]`.
pub fn first_value(property: impl Into<String>, by: Option<(&str, SortOrder)>) -> Reducer {
    let mut args = vec![property_token(property)];
    if let Some((field, order)) = by {
        args.push("BY".into());
        args.push(field.into());
        args.push(order.as_str().into());
    }
    Reducer::new(ReducerFn::FirstValue, args)
}

pub fn random_sample(property: impl Into<String>, size: u64) -> Reducer {
    Reducer::new(
        ReducerFn::RandomSample,
        vec![property_token(property), size.into()],
    )
}
