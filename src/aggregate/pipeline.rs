// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Aggregation pipeline.
//!
//! Steps are stored in append order. At compile time they are split with a
//! stable partition: every `LOAD` goes before the `DIALECT` marker, every
//! other step after it. This is what the aggregate grammar expects, so the
//! relative order of loads (and of the remaining steps) is kept but the two
//! groups never interleave.
//!
//! ```text
//! <query> WITHCURSOR [COUNT n] [MAXIDLE ms] ADDSCORES TIMEOUT ms
//!   LOAD .. PARAMS .. DIALECT d
//!   GROUPBY .. REDUCE .. SORTBY .. APPLY .. LIMIT .. FILTER ..
//! ```

use super::cursor::CursorOptions;
use super::reducer::Reducer;
use crate::search::{bind_param, write_params, SortOrder};
use crate::token::{push_counted, Token};

/// Field list of a `LOAD` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Load {
    /// `LOAD *`
    All,
    /// `LOAD n f..`
    Fields(Vec<String>),
}

/// One `SORTBY` key. Directional keys take two tokens, plain keys one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Plain(String),
    Asc(String),
    Desc(String),
}

impl SortKey {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortKey::Asc(field.into()),
            SortOrder::Desc => SortKey::Desc(field.into()),
        }
    }

    fn write(&self, args: &mut Vec<Token>) {
        match self {
            SortKey::Plain(f) => args.push(f.into()),
            SortKey::Asc(f) => args.extend([Token::from(f), "ASC".into()]),
            SortKey::Desc(f) => args.extend([Token::from(f), "DESC".into()]),
        }
    }

    fn arg_count(&self) -> usize {
        match self {
            SortKey::Plain(_) => 1,
            SortKey::Asc(_) | SortKey::Desc(_) => 2,
        }
    }
}

impl From<&str> for SortKey {
    fn from(field: &str) -> Self {
        SortKey::Plain(field.to_string())
    }
}

impl From<String> for SortKey {
    fn from(field: String) -> Self {
        SortKey::Plain(field)
    }
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Load(Load),
    GroupBy { fields: Vec<String>, reducers: Vec<Reducer> },
    SortBy { keys: Vec<SortKey>, max: Option<u64> },
    Apply(Vec<(String, String)>),
    Limit { offset: u64, count: u64 },
    Filter(String),
}

impl Step {
    pub fn is_load(&self) -> bool {
        matches!(self, Step::Load(_))
    }

    pub fn write(&self, args: &mut Vec<Token>) {
        match self {
            Step::Load(Load::All) => args.extend(["LOAD".into(), "*".into()]),
            Step::Load(Load::Fields(fields)) => {
                args.push("LOAD".into());
                push_counted(args, fields);
            }
            Step::GroupBy { fields, reducers } => {
                write_group_by(args, fields, reducers);
            }
            Step::SortBy { keys, max } => {
                args.push("SORTBY".into());
                args.push(keys.iter().map(SortKey::arg_count).sum::<usize>().into());
                for key in keys {
                    key.write(args);
                }
                if let Some(max) = max {
                    args.push("MAX".into());
                    args.push((*max).into());
                }
            }
            Step::Apply(pairs) => write_apply(args, pairs),
            Step::Limit { offset, count } => {
                args.extend(["LIMIT".into(), (*offset).into(), (*count).into()]);
            }
            Step::Filter(expr) => args.extend(["FILTER".into(), Token::from(expr)]),
        }
    }
}

pub(crate) fn write_group_by(args: &mut Vec<Token>, fields: &[String], reducers: &[Reducer]) {
    args.push("GROUPBY".into());
    push_counted(args, fields);
    for reducer in reducers {
        reducer.write(args);
    }
}

pub(crate) fn write_apply(args: &mut Vec<Token>, pairs: &[(String, String)]) {
    for (alias, expr) in pairs {
        args.extend(["APPLY".into(), Token::from(expr), "AS".into(), Token::from(alias)]);
    }
}

/// An `FT.AGGREGATE` request.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePipeline {
    query: String,
    steps: Vec<Step>,
    cursor: Option<CursorOptions>,
    add_scores: bool,
    timeout: Option<u64>,
    params: Vec<(String, Token)>,
    dialect: Option<u32>,
}

impl Default for AggregatePipeline {
    fn default() -> Self {
        Self::new("*")
    }
}

impl AggregatePipeline {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            steps: Vec::new(),
            cursor: None,
            add_scores: false,
            timeout: None,
            params: Vec::new(),
            dialect: None,
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// `LOAD *` when `fields` is empty, `LOAD n f..` otherwise.
    pub fn load<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            self.step(Step::Load(Load::All))
        } else {
            self.step(Step::Load(Load::Fields(fields)))
        }
    }

    pub fn load_all(self) -> Self {
        self.step(Step::Load(Load::All))
    }

    pub fn group_by<I, S, R>(self, fields: I, reducers: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Reducer>,
    {
        self.step(Step::GroupBy {
            fields: fields.into_iter().map(Into::into).collect(),
            reducers: reducers.into_iter().collect(),
        })
    }

    pub fn sort_by<I, K>(self, keys: I, max: Option<u64>) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SortKey>,
    {
        self.step(Step::SortBy {
            keys: keys.into_iter().map(Into::into).collect(),
            max,
        })
    }

    /// One `APPLY expr AS alias` per `(alias, expr)` pair.
    pub fn apply<I, A, E>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, E)>,
        A: Into<String>,
        E: Into<String>,
    {
        self.step(Step::Apply(
            pairs.into_iter().map(|(a, e)| (a.into(), e.into())).collect(),
        ))
    }

    pub fn limit(self, offset: u64, count: u64) -> Self {
        self.step(Step::Limit { offset, count })
    }

    pub fn filter(self, expression: impl Into<String>) -> Self {
        self.step(Step::Filter(expression.into()))
    }

    pub fn with_cursor(mut self, options: CursorOptions) -> Self {
        self.cursor = Some(options);
        self
    }

    pub fn add_scores(mut self) -> Self {
        self.add_scores = true;
        self
    }

    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Token>) -> Self {
        bind_param(&mut self.params, name.into(), value.into());
        self
    }

    pub fn dialect(mut self, dialect: u32) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// `FT.AGGREGATE` arguments following the index name.
    pub fn compile(&self) -> Vec<Token> {
        let mut args = vec![Token::from(&self.query)];

        if let Some(cursor) = &self.cursor {
            cursor.write(&mut args);
        }
        if self.add_scores {
            args.push("ADDSCORES".into());
        }
        if let Some(timeout) = self.timeout {
            args.push("TIMEOUT".into());
            args.push(timeout.into());
        }

        let (loads, rest): (Vec<&Step>, Vec<&Step>) = self.steps.iter().partition(|s| s.is_load());
        for step in loads {
            step.write(&mut args);
        }
        write_params(&mut args, &self.params);
        if let Some(dialect) = self.dialect {
            args.push("DIALECT".into());
            args.push(dialect.into());
        }
        for step in rest {
            step.write(&mut args);
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::reducer::{avg, count, sum};

    #[test]
    fn test_load_all_then_group() {
        let pipeline = AggregatePipeline::new("*")
            .load(Vec::<String>::new())
            .group_by(["@condition"], [count().alias("n")]);
        assert_eq!(
            pipeline.compile(),
            ["*", "LOAD", "*", "GROUPBY", "1", "@condition", "REDUCE", "COUNT", "0", "AS", "n"]
        );
    }

    #[test]
    fn test_loads_move_before_dialect() {
        let pipeline = AggregatePipeline::new("@brand:{trek}")
            .group_by(["@model"], [sum("@price").alias("total")])
            .load(["@model", "@price"])
            .limit(0, 5)
            .load(["@year"])
            .dialect(2);

        assert_eq!(
            pipeline.compile(),
            [
                "@brand:{trek}",
                "LOAD", "2", "@model", "@price",
                "LOAD", "1", "@year",
                "DIALECT", "2",
                "GROUPBY", "1", "@model", "REDUCE", "SUM", "1", "@price", "AS", "total",
                "LIMIT", "0", "5"
            ]
        );
    }

    #[test]
    fn test_sort_by_counts_directional_keys() {
        let pipeline = AggregatePipeline::new("*").sort_by(
            [SortKey::new("@price", SortOrder::Desc), SortKey::from("@name")],
            Some(10),
        );
        assert_eq!(
            pipeline.compile(),
            ["*", "SORTBY", "3", "@price", "DESC", "@name", "MAX", "10"]
        );
    }

    #[test]
    fn test_apply_pairs_and_filter() {
        let pipeline = AggregatePipeline::new("*")
            .apply([("discounted", "@price * 0.9"), ("year", "year(@ts)")])
            .filter("@discounted > 100");
        assert_eq!(
            pipeline.compile(),
            [
                "*", "APPLY", "@price * 0.9", "AS", "discounted", "APPLY", "year(@ts)", "AS",
                "year", "FILTER", "@discounted > 100"
            ]
        );
    }

    #[test]
    fn test_cursor_and_scores_precede_loads() {
        let pipeline = AggregatePipeline::new("*")
            .group_by(["@type"], [avg("@price")])
            .load(["@type"])
            .add_scores()
            .with_cursor(CursorOptions::new().count(100).max_idle(5000))
            .dialect(3);
        assert_eq!(
            pipeline.compile(),
            [
                "*", "WITHCURSOR", "COUNT", "100", "MAXIDLE", "5000", "ADDSCORES",
                "LOAD", "1", "@type", "DIALECT", "3",
                "GROUPBY", "1", "@type", "REDUCE", "AVG", "1", "@price"
            ]
        );
    }

    #[test]
    fn test_rebinding_param_replaces() {
        let pipeline = AggregatePipeline::new("@price:[$lo +inf]")
            .param("lo", 10u64)
            .param("lo", 20u64)
            .dialect(2);
        assert_eq!(
            pipeline.compile(),
            ["@price:[$lo +inf]", "PARAMS", "2", "lo", "20", "DIALECT", "2"]
        );
    }
}
