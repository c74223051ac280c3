// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Hybrid (lexical + vector) queries for `FT.HYBRID`.
//!
//! # Command layout
//!
//! ```text
//! FT.HYBRID <index>
//!   SEARCH <query> [SCORER s] [YIELD_SCORE_AS a]
//!   VSIM <field> <vector> [KNN|RANGE <2n> K V..] [FILTER expr] [YIELD_SCORE_AS a]
//!   [COMBINE RRF|LINEAR <2n> K V..]
//!   [LOAD ..] [GROUPBY .. REDUCE ..] [APPLY ..] [SORTBY <2n> f DIR..] [FILTER ..] [LIMIT o n]
//!   [PARAMS <2n> k v..] [TIMEOUT ms] [WITHCURSOR ..]
//! ```
//!
//! # Example
//!
//! ```
//! use redisearch_builder::hybrid::{CombineMethod, HybridQuery, SearchClause, VsimClause};
//!
//! let query = HybridQuery::new(
//!     SearchClause::new("@title:bike"),
//!     VsimClause::new("@embedding", "$vec"),
//! )
//! .combine(CombineMethod::rrf().window(20))
//! .param("vec", vec![0u8; 8]);
//!
//! let args = query.compile("bikes");
//! assert_eq!(args[0], "bikes");
//! assert_eq!(args[1], "SEARCH");
//! ```

use crate::aggregate::{write_apply, write_group_by, CursorOptions, Load, Reducer, Step};
use crate::search::{bind_param, write_params, SortOrder};
use crate::token::Token;

/// Lexical half: `SEARCH <query> [SCORER s] [YIELD_SCORE_AS a]`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchClause {
    query: String,
    scorer: Option<String>,
    yield_score_as: Option<String>,
}

impl SearchClause {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            scorer: None,
            yield_score_as: None,
        }
    }

    pub fn scorer(mut self, scorer: impl Into<String>) -> Self {
        self.scorer = Some(scorer.into());
        self
    }

    pub fn yield_score_as(mut self, alias: impl Into<String>) -> Self {
        self.yield_score_as = Some(alias.into());
        self
    }

    pub fn compile(&self) -> Vec<Token> {
        let mut args: Vec<Token> = vec!["SEARCH".into(), Token::from(&self.query)];
        if let Some(scorer) = &self.scorer {
            args.push("SCORER".into());
            args.push(scorer.into());
        }
        if let Some(alias) = &self.yield_score_as {
            args.push("YIELD_SCORE_AS".into());
            args.push(alias.into());
        }
        args
    }
}

/// Vector similarity method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsimMethod {
    Knn,
    Range,
}

impl VsimMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            VsimMethod::Knn => "KNN",
            VsimMethod::Range => "RANGE",
        }
    }
}

/// Vector half: `VSIM <field> <vector> [METHOD <2n> K V..] [FILTER expr] [YIELD_SCORE_AS a]`
#[derive(Debug, Clone, PartialEq)]
pub struct VsimClause {
    field: String,
    vector: Token,
    method: Option<(VsimMethod, Vec<(String, Token)>)>,
    filter: Option<String>,
    yield_score_as: Option<String>,
}

impl VsimClause {
    /// `vector` is either a blob or a `$param` reference.
    pub fn new(field: impl Into<String>, vector: impl Into<Token>) -> Self {
        Self {
            field: field.into(),
            vector: vector.into(),
            method: None,
            filter: None,
            yield_score_as: None,
        }
    }

    /// Construct with an optional method and optional parameters. The method
    /// block is only kept when both are supplied.
    pub fn with_method(
        field: impl Into<String>,
        vector: impl Into<Token>,
        method: Option<VsimMethod>,
        params: Option<Vec<(String, Token)>>,
    ) -> Self {
        let mut clause = Self::new(field, vector);
        if let (Some(method), Some(params)) = (method, params) {
            clause.method = Some((method, params));
        }
        clause
    }

    /// Set the method block unconditionally; emitted even with no params.
    pub fn set_method_params(mut self, method: VsimMethod, params: Vec<(String, Token)>) -> Self {
        self.method = Some((method, params));
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    pub fn yield_score_as(mut self, alias: impl Into<String>) -> Self {
        self.yield_score_as = Some(alias.into());
        self
    }

    pub fn compile(&self) -> Vec<Token> {
        let mut args: Vec<Token> = vec!["VSIM".into(), Token::from(&self.field), self.vector.clone()];
        if let Some((method, params)) = &self.method {
            args.push(method.as_str().into());
            args.push((params.len() * 2).into());
            for (key, value) in params {
                args.push(key.into());
                args.push(value.clone());
            }
        }
        if let Some(filter) = &self.filter {
            args.push("FILTER".into());
            args.push(filter.into());
        }
        if let Some(alias) = &self.yield_score_as {
            args.push("YIELD_SCORE_AS".into());
            args.push(alias.into());
        }
        args
    }
}

/// Score fusion strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombineMethod {
    /// Reciprocal rank fusion.
    Rrf {
        window: Option<u32>,
        constant: Option<f64>,
    },
    /// Weighted sum: `alpha * text + beta * vector`.
    Linear { alpha: Option<f64>, beta: Option<f64> },
}

impl CombineMethod {
    pub fn rrf() -> Self {
        CombineMethod::Rrf {
            window: None,
            constant: None,
        }
    }

    pub fn linear() -> Self {
        CombineMethod::Linear {
            alpha: None,
            beta: None,
        }
    }

    /// RRF window; ignored for linear.
    pub fn window(mut self, value: u32) -> Self {
        if let CombineMethod::Rrf { window, .. } = &mut self {
            *window = Some(value);
        }
        self
    }

    /// RRF constant; ignored for linear.
    pub fn constant(mut self, value: f64) -> Self {
        if let CombineMethod::Rrf { constant, .. } = &mut self {
            *constant = Some(value);
        }
        self
    }

    /// Linear text weight; ignored for RRF.
    pub fn alpha(mut self, value: f64) -> Self {
        if let CombineMethod::Linear { alpha, .. } = &mut self {
            *alpha = Some(value);
        }
        self
    }

    /// Linear vector weight; ignored for RRF.
    pub fn beta(mut self, value: f64) -> Self {
        if let CombineMethod::Linear { beta, .. } = &mut self {
            *beta = Some(value);
        }
        self
    }

    /// `COMBINE <name> <2n> K V..` counting only explicitly set parameters.
    pub fn compile(&self) -> Vec<Token> {
        let (name, params): (&str, Vec<(&str, Token)>) = match *self {
            CombineMethod::Rrf { window, constant } => (
                "RRF",
                [
                    window.map(|w| ("WINDOW", Token::from(w))),
                    constant.map(|c| ("CONSTANT", Token::from(c))),
                ]
                .into_iter()
                .flatten()
                .collect(),
            ),
            CombineMethod::Linear { alpha, beta } => (
                "LINEAR",
                [
                    alpha.map(|a| ("ALPHA", Token::from(a))),
                    beta.map(|b| ("BETA", Token::from(b))),
                ]
                .into_iter()
                .flatten()
                .collect(),
            ),
        };

        let mut args: Vec<Token> = vec!["COMBINE".into(), name.into(), (params.len() * 2).into()];
        for (key, value) in params {
            args.push(key.into());
            args.push(value);
        }
        args
    }
}

/// Shared post-processing applied to the fused results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostProcessing {
    load: Option<Load>,
    group_by: Option<(Vec<String>, Vec<Reducer>)>,
    apply: Vec<(String, String)>,
    sort_by: Vec<(String, SortOrder)>,
    filter: Option<String>,
    limit: Option<(u64, u64)>,
}

impl PostProcessing {
    pub fn new() -> Self {
        Self::default()
    }

    /// `LOAD *` when `fields` is empty.
    pub fn load<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.load = Some(if fields.is_empty() {
            Load::All
        } else {
            Load::Fields(fields)
        });
        self
    }

    pub fn group_by<I, S, R>(mut self, fields: I, reducers: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Reducer>,
    {
        self.group_by = Some((
            fields.into_iter().map(Into::into).collect(),
            reducers.into_iter().collect(),
        ));
        self
    }

    pub fn apply(mut self, alias: impl Into<String>, expression: impl Into<String>) -> Self {
        self.apply.push((alias.into(), expression.into()));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by.push((field.into(), order));
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some((offset, count));
        self
    }

    /// load → group-by → apply → sort → filter → limit
    pub fn compile(&self) -> Vec<Token> {
        let mut args = Vec::new();
        if let Some(load) = &self.load {
            Step::Load(load.clone()).write(&mut args);
        }
        if let Some((fields, reducers)) = &self.group_by {
            write_group_by(&mut args, fields, reducers);
        }
        write_apply(&mut args, &self.apply);
        if !self.sort_by.is_empty() {
            args.push("SORTBY".into());
            args.push((self.sort_by.len() * 2).into());
            for (field, order) in &self.sort_by {
                args.push(field.into());
                args.push(order.as_str().into());
            }
        }
        if let Some(filter) = &self.filter {
            args.push("FILTER".into());
            args.push(filter.into());
        }
        if let Some((offset, count)) = self.limit {
            args.extend(["LIMIT".into(), offset.into(), count.into()]);
        }
        args
    }
}

/// A full `FT.HYBRID` request.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridQuery {
    search: SearchClause,
    vsim: VsimClause,
    combine: Option<CombineMethod>,
    post_processing: Option<PostProcessing>,
    params: Vec<(String, Token)>,
    timeout: Option<u64>,
    cursor: Option<CursorOptions>,
}

impl HybridQuery {
    pub fn new(search: SearchClause, vsim: VsimClause) -> Self {
        Self {
            search,
            vsim,
            combine: None,
            post_processing: None,
            params: Vec::new(),
            timeout: None,
            cursor: None,
        }
    }

    pub fn combine(mut self, method: CombineMethod) -> Self {
        self.combine = Some(method);
        self
    }

    pub fn post_processing(mut self, post: PostProcessing) -> Self {
        self.post_processing = Some(post);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Token>) -> Self {
        bind_param(&mut self.params, name.into(), value.into());
        self
    }

    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn with_cursor(mut self, cursor: CursorOptions) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// `FT.HYBRID` arguments, starting with the index name.
    pub fn compile(&self, index: &str) -> Vec<Token> {
        let mut args = vec![Token::from(index)];
        args.extend(self.search.compile());
        args.extend(self.vsim.compile());
        if let Some(combine) = &self.combine {
            args.extend(combine.compile());
        }
        if let Some(post) = &self.post_processing {
            args.extend(post.compile());
        }
        write_params(&mut args, &self.params);
        if let Some(timeout) = self.timeout {
            args.push("TIMEOUT".into());
            args.push(timeout.into());
        }
        if let Some(cursor) = &self.cursor {
            cursor.write(&mut args);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::reducers;

    #[test]
    fn test_search_clause() {
        let clause = SearchClause::new("@title:bike").scorer("BM25").yield_score_as("text_score");
        assert_eq!(
            clause.compile(),
            ["SEARCH", "@title:bike", "SCORER", "BM25", "YIELD_SCORE_AS", "text_score"]
        );
    }

    #[test]
    fn test_vsim_constructor_requires_method_and_params() {
        let only_method = VsimClause::with_method("@v", "$vec", Some(VsimMethod::Knn), None);
        assert_eq!(only_method.compile(), ["VSIM", "@v", "$vec"]);

        let only_params =
            VsimClause::with_method("@v", "$vec", None, Some(vec![("K".into(), 10u64.into())]));
        assert_eq!(only_params.compile(), ["VSIM", "@v", "$vec"]);

        let both = VsimClause::with_method(
            "@v",
            "$vec",
            Some(VsimMethod::Knn),
            Some(vec![("K".into(), 10u64.into()), ("EF_RUNTIME".into(), 50u64.into())]),
        );
        assert_eq!(
            both.compile(),
            ["VSIM", "@v", "$vec", "KNN", "4", "K", "10", "EF_RUNTIME", "50"]
        );
    }

    #[test]
    fn test_vsim_setter_always_emits() {
        let clause = VsimClause::new("@v", "$vec").set_method_params(VsimMethod::Range, Vec::new());
        assert_eq!(clause.compile(), ["VSIM", "@v", "$vec", "RANGE", "0"]);
    }

    #[test]
    fn test_vsim_filter_and_yield() {
        let clause = VsimClause::new("@v", "$vec")
            .filter("@brand:{trek}")
            .yield_score_as("vector_score");
        assert_eq!(
            clause.compile(),
            ["VSIM", "@v", "$vec", "FILTER", "@brand:{trek}", "YIELD_SCORE_AS", "vector_score"]
        );
    }

    #[test]
    fn test_combine_counts_only_set_params() {
        assert_eq!(CombineMethod::rrf().compile(), ["COMBINE", "RRF", "0"]);
        assert_eq!(
            CombineMethod::rrf().constant(60.0).compile(),
            ["COMBINE", "RRF", "2", "CONSTANT", "60"]
        );
        assert_eq!(
            CombineMethod::linear().alpha(0.3).beta(0.7).compile(),
            ["COMBINE", "LINEAR", "4", "ALPHA", "0.3", "BETA", "0.7"]
        );
    }

    #[test]
    fn test_post_processing_order() {
        let post = PostProcessing::new()
            .limit(0, 10)
            .filter("@price > 10")
            .sort_by("@price", SortOrder::Asc)
            .apply("p2", "@price * 2")
            .group_by(["@brand"], [reducers::count().alias("n")])
            .load(["@brand", "@price"]);
        assert_eq!(
            post.compile(),
            [
                "LOAD", "2", "@brand", "@price",
                "GROUPBY", "1", "@brand", "REDUCE", "COUNT", "0", "AS", "n",
                "APPLY", "@price * 2", "AS", "p2",
                "SORTBY", "2", "@price", "ASC",
                "FILTER", "@price > 10",
                "LIMIT", "0", "10"
            ]
        );
    }

    #[test]
    fn test_full_hybrid_layout() {
        let query = HybridQuery::new(
            SearchClause::new("@title:bike"),
            VsimClause::new("@embedding", "$vec"),
        )
        .with_cursor(CursorOptions::new().count(10))
        .timeout(1000)
        .param("vec", "abc")
        .post_processing(PostProcessing::new().limit(0, 5))
        .combine(CombineMethod::rrf().window(20));

        assert_eq!(
            query.compile("bikes"),
            [
                "bikes", "SEARCH", "@title:bike", "VSIM", "@embedding", "$vec",
                "COMBINE", "RRF", "2", "WINDOW", "20",
                "LIMIT", "0", "5",
                "PARAMS", "2", "vec", "abc",
                "TIMEOUT", "1000",
                "WITHCURSOR", "COUNT", "10"
            ]
        );
    }

    #[test]
    fn test_rebinding_param_replaces() {
        let query = HybridQuery::new(SearchClause::new("*"), VsimClause::new("@v", "$vec"))
            .param("vec", "first")
            .param("vec", "second");
        assert_eq!(
            query.compile("idx"),
            ["idx", "SEARCH", "*", "VSIM", "@v", "$vec", "PARAMS", "2", "vec", "second"]
        );
    }
}
