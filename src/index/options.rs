// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::aggregate::AggregatePipeline;
use crate::search::{Query, SortOrder};
use crate::token::Token;

/// What [`Index::search`](super::Index::search) accepts.
pub enum SearchInput {
    Raw(String),
    Query(Query),
    /// Applied to a fresh wildcard query.
    Builder(Box<dyn FnOnce(Query) -> Query + Send>),
}

impl SearchInput {
    pub fn build(f: impl FnOnce(Query) -> Query + Send + 'static) -> Self {
        SearchInput::Builder(Box::new(f))
    }

    pub(crate) fn into_query(self) -> Query {
        match self {
            SearchInput::Raw(base) => Query::new(base),
            SearchInput::Query(query) => query,
            SearchInput::Builder(f) => f(Query::all()),
        }
    }
}

impl std::fmt::Debug for SearchInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchInput::Raw(base) => f.debug_tuple("Raw").field(base).finish(),
            SearchInput::Query(query) => f.debug_tuple("Query").field(query).finish(),
            SearchInput::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

impl From<&str> for SearchInput {
    fn from(base: &str) -> Self {
        SearchInput::Raw(base.to_string())
    }
}

impl From<String> for SearchInput {
    fn from(base: String) -> Self {
        SearchInput::Raw(base)
    }
}

impl From<Query> for SearchInput {
    fn from(query: Query) -> Self {
        SearchInput::Query(query)
    }
}

/// Per-call overrides for a search. Anything set here wins over the
/// query's own state.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub dialect: Option<u32>,
    pub params: Vec<(String, Token)>,
    pub sort_by: Option<(String, Option<SortOrder>)>,
    pub limit: Option<(u64, u64)>,
    pub return_fields: Option<Vec<String>>,
    pub limit_ids: Option<Vec<String>>,
    pub timeout: Option<u64>,
    pub language: Option<String>,
    pub scorer: Option<String>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: u32) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Token>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: Option<SortOrder>) -> Self {
        self.sort_by = Some((field.into(), order));
        self
    }

    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some((offset, count));
        self
    }

    pub fn return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limit_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn scorer(mut self, scorer: impl Into<String>) -> Self {
        self.scorer = Some(scorer.into());
        self
    }

    pub(crate) fn apply(self, mut query: Query) -> Query {
        if let Some(fields) = self.return_fields {
            query.set_return_fields(fields);
        }
        if let Some(ids) = self.limit_ids {
            query.set_limit_ids(ids);
        }
        for (name, value) in self.params {
            query = query.param(name, value);
        }
        if let Some(dialect) = self.dialect {
            query = query.dialect(dialect);
        }
        if let Some((field, order)) = self.sort_by {
            query = query.sort_by(field, order);
        }
        if let Some((offset, count)) = self.limit {
            query = query.limit(offset, count);
        }
        if let Some(timeout) = self.timeout {
            query = query.timeout(timeout);
        }
        if let Some(language) = self.language {
            query = query.language(language);
        }
        if let Some(scorer) = self.scorer {
            query = query.scorer(scorer);
        }
        query
    }
}

/// `TERMS INCLUDE|EXCLUDE` dictionary selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsMode {
    Include,
    Exclude,
}

impl TermsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TermsMode::Include => "INCLUDE",
            TermsMode::Exclude => "EXCLUDE",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpellcheckOptions {
    pub distance: Option<u32>,
    pub terms: Vec<(TermsMode, String)>,
    pub dialect: Option<u32>,
    /// Reshape the reply into term → suggestions.
    pub parse: bool,
}

impl SpellcheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn include(mut self, dictionary: impl Into<String>) -> Self {
        self.terms.push((TermsMode::Include, dictionary.into()));
        self
    }

    pub fn exclude(mut self, dictionary: impl Into<String>) -> Self {
        self.terms.push((TermsMode::Exclude, dictionary.into()));
        self
    }

    pub fn dialect(mut self, dialect: u32) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn parsed(mut self) -> Self {
        self.parse = true;
        self
    }

    pub(crate) fn write(&self, args: &mut Vec<Token>) {
        if let Some(distance) = self.distance {
            args.push("DISTANCE".into());
            args.push(distance.into());
        }
        for (mode, dictionary) in &self.terms {
            args.extend(["TERMS".into(), mode.as_str().into(), Token::from(dictionary)]);
        }
        if let Some(dialect) = self.dialect {
            args.push("DIALECT".into());
            args.push(dialect.into());
        }
    }
}

/// What `FT.PROFILE` runs.
#[derive(Debug, Clone)]
pub enum ProfileTarget {
    Search(Query),
    Aggregate(AggregatePipeline),
}

impl From<Query> for ProfileTarget {
    fn from(query: Query) -> Self {
        ProfileTarget::Search(query)
    }
}

impl From<AggregatePipeline> for ProfileTarget {
    fn from(pipeline: AggregatePipeline) -> Self {
        ProfileTarget::Aggregate(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_options_win() {
        let query = Query::new("@model:Jigger")
            .limit(0, 5)
            .dialect(3)
            .return_field("model");
        let query = SearchOptions::new()
            .limit(10, 20)
            .dialect(4)
            .return_fields(["price"])
            .apply(query);

        assert_eq!(
            query.compile().unwrap(),
            ["@model:Jigger", "RETURN", "1", "price", "LIMIT", "10", "20", "DIALECT", "4"]
        );
    }

    #[test]
    fn test_empty_options_keep_query() {
        let query = Query::new("hello").limit(0, 5);
        let applied = SearchOptions::default().apply(query.clone());
        assert_eq!(applied, query);
    }

    #[test]
    fn test_builder_input_starts_from_wildcard() {
        let query = SearchInput::build(|q| q.tag("city", "NY")).into_query();
        assert_eq!(query.query_string().unwrap(), "((@city:{NY}))");
    }

    #[test]
    fn test_spellcheck_args() {
        let mut args = Vec::new();
        SpellcheckOptions::new()
            .distance(2)
            .include("dict1")
            .exclude("dict2")
            .write(&mut args);
        assert_eq!(
            args,
            ["DISTANCE", "2", "TERMS", "INCLUDE", "dict1", "TERMS", "EXCLUDE", "dict2"]
        );
    }
}
