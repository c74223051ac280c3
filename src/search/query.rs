// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search request model.
//!
//! [`Query`] holds a base string and/or predicate tree plus every result
//! shaping option of `FT.SEARCH`. [`Query::compile`] emits the arguments after
//! the index name in the order the engine parses them:
//!
//! ```text
//! <query> NOCONTENT VERBATIM NOSTOPWORDS WITHPAYLOADS SCORER s WITHSCORES
//!   INFIELDS n f.. INKEYS n k.. FILTER f min max.. GEOFILTER f lon lat r unit..
//!   RETURN n f [AS a].. SUMMARIZE .. HIGHLIGHT .. SLOP n TIMEOUT ms LANGUAGE l
//!   EXPANDER e INORDER SORTBY f [ASC|DESC] LIMIT o n PARAMS n k v.. DIALECT d
//! ```
//!
//! # Example
//!
//! ```
//! use redisearch_builder::search::Query;
//!
//! let query = Query::new("@model:Jigger").return_field("price");
//! assert_eq!(
//!     query.compile().unwrap(),
//!     ["@model:Jigger", "RETURN", "1", "price", "DIALECT", "2"]
//! );
//! ```

use super::predicate::{Connective, Predicate, PredicateCollection, PredicateNode, PredicateScopes};
use crate::error::{Result, SearchError};
use crate::token::{push_counted, Token};

/// Dialect used when none is set.
pub const DEFAULT_DIALECT: u32 = 2;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// `FILTER field min max`
#[derive(Debug, Clone, PartialEq)]
pub struct NumericFilter {
    pub field: String,
    pub min: f64,
    pub max: f64,
}

/// Distance unit for geo filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoUnit {
    M,
    #[default]
    Km,
    Mi,
    Ft,
}

impl GeoUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            GeoUnit::M => "m",
            GeoUnit::Km => "km",
            GeoUnit::Mi => "mi",
            GeoUnit::Ft => "ft",
        }
    }
}

/// `GEOFILTER field lon lat radius unit`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFilter {
    pub field: String,
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
    pub unit: GeoUnit,
}

/// `SUMMARIZE [FIELDS n f..] [FRAGS n] [LEN n] [SEPARATOR s]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summarize {
    pub fields: Vec<String>,
    pub frags: Option<u32>,
    pub len: Option<u32>,
    pub separator: Option<String>,
}

impl Summarize {
    fn write(&self, args: &mut Vec<Token>) {
        args.push("SUMMARIZE".into());
        if !self.fields.is_empty() {
            args.push("FIELDS".into());
            push_counted(args, &self.fields);
        }
        if let Some(frags) = self.frags {
            args.push("FRAGS".into());
            args.push(frags.into());
        }
        if let Some(len) = self.len {
            args.push("LEN".into());
            args.push(len.into());
        }
        if let Some(separator) = &self.separator {
            args.push("SEPARATOR".into());
            args.push(separator.into());
        }
    }
}

/// `HIGHLIGHT [FIELDS n f..] [TAGS open close]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Highlight {
    pub fields: Vec<String>,
    pub tags: Option<(String, String)>,
}

impl Highlight {
    fn write(&self, args: &mut Vec<Token>) {
        args.push("HIGHLIGHT".into());
        if !self.fields.is_empty() {
            args.push("FIELDS".into());
            push_counted(args, &self.fields);
        }
        if let Some((open, close)) = &self.tags {
            args.push("TAGS".into());
            args.push(open.into());
            args.push(close.into());
        }
    }
}

/// A full `FT.SEARCH` request.
///
/// Builder methods consume and return `self`. Not meant for concurrent
/// mutation; compiling only reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    base: Option<String>,
    predicates: PredicateScopes,
    scope_error: Option<String>,
    no_content: bool,
    verbatim: bool,
    no_stopwords: bool,
    with_payloads: bool,
    with_scores: bool,
    in_order: bool,
    scorer: Option<String>,
    in_fields: Vec<String>,
    in_keys: Vec<String>,
    filters: Vec<NumericFilter>,
    geo_filters: Vec<GeoFilter>,
    return_fields: Vec<(String, Option<String>)>,
    summarize: Option<Summarize>,
    highlight: Option<Highlight>,
    slop: Option<u32>,
    timeout: Option<u64>,
    language: Option<String>,
    expander: Option<String>,
    sort_by: Option<(String, Option<SortOrder>)>,
    limit: Option<(u64, u64)>,
    params: Vec<(String, Token)>,
    dialect: Option<u32>,
}

impl Query {
    /// Query with a base string.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::default()
        }
    }

    /// Match-all query (`*`) to be refined with predicates.
    pub fn all() -> Self {
        Self::default()
    }

    /// Query whose root is an already-built collection.
    pub fn from_predicates(root: PredicateCollection) -> Self {
        Self {
            predicates: PredicateScopes::with_root(root),
            ..Self::default()
        }
    }

    // ── Predicates ─────────────────────────────────────────────────────────

    /// Add a predicate or collection to the currently open collection.
    pub fn predicate(mut self, node: impl Into<PredicateNode>) -> Self {
        self.predicates.add(node);
        self
    }

    pub fn tag(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicate(Predicate::tag(field, value))
    }

    pub fn tag_escaped(self, field: impl Into<String>, value: &str) -> Self {
        self.predicate(Predicate::tag_escaped(field, value))
    }

    pub fn text(self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.predicate(Predicate::text(field, pattern))
    }

    pub fn numeric(self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.predicate(Predicate::numeric(field, min, max))
    }

    /// Open a nested collection; pair with [`close`](Self::close).
    pub fn open(mut self, connective: Connective) -> Self {
        self.predicates.open(connective);
        self
    }

    /// Close the current collection. An unbalanced close is reported by
    /// [`compile`](Self::compile).
    pub fn close(mut self) -> Self {
        if let Err(e) = self.predicates.close() {
            self.scope_error.get_or_insert(e.to_string());
        }
        self
    }

    /// Evaluate `build` inside a new AND collection.
    pub fn and(self, build: impl FnOnce(Self) -> Self) -> Self {
        build(self.open(Connective::And)).close()
    }

    /// Evaluate `build` inside a new OR collection.
    pub fn or(self, build: impl FnOnce(Self) -> Self) -> Self {
        build(self.open(Connective::Or)).close()
    }

    // ── Flags ──────────────────────────────────────────────────────────────

    pub fn no_content(mut self) -> Self {
        self.no_content = true;
        self
    }

    pub fn verbatim(mut self) -> Self {
        self.verbatim = true;
        self
    }

    pub fn no_stopwords(mut self) -> Self {
        self.no_stopwords = true;
        self
    }

    pub fn with_payloads(mut self) -> Self {
        self.with_payloads = true;
        self
    }

    pub fn with_scores(mut self) -> Self {
        self.with_scores = true;
        self
    }

    pub fn in_order(mut self) -> Self {
        self.in_order = true;
        self
    }

    // ── Options ────────────────────────────────────────────────────────────

    pub fn scorer(mut self, scorer: impl Into<String>) -> Self {
        self.scorer = Some(scorer.into());
        self
    }

    pub fn in_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Restrict the search to these document keys (`INKEYS`).
    pub fn limit_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_keys.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn filter(mut self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.filters.push(NumericFilter {
            field: field.into(),
            min,
            max,
        });
        self
    }

    pub fn geo_filter(
        mut self,
        field: impl Into<String>,
        lon: f64,
        lat: f64,
        radius: f64,
        unit: GeoUnit,
    ) -> Self {
        self.geo_filters.push(GeoFilter {
            field: field.into(),
            lon,
            lat,
            radius,
            unit,
        });
        self
    }

    pub fn return_field(mut self, field: impl Into<String>) -> Self {
        self.return_fields.push((field.into(), None));
        self
    }

    pub fn return_as(mut self, field: impl Into<String>, alias: impl Into<String>) -> Self {
        self.return_fields.push((field.into(), Some(alias.into())));
        self
    }

    pub fn return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields
            .extend(fields.into_iter().map(|f| (f.into(), None)));
        self
    }

    pub fn summarize(mut self, summarize: Summarize) -> Self {
        self.summarize = Some(summarize);
        self
    }

    pub fn highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn slop(mut self, slop: u32) -> Self {
        self.slop = Some(slop);
        self
    }

    /// Timeout in milliseconds.
    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn expander(mut self, expander: impl Into<String>) -> Self {
        self.expander = Some(expander.into());
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

    /// Bind a `$name` query parameter. Rebinding a name replaces its value.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Token>) -> Self {
        bind_param(&mut self.params, name.into(), value.into());
        self
    }

    pub fn dialect(mut self, dialect: u32) -> Self {
        self.dialect = Some(dialect);
        self
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn limit_id_list(&self) -> &[String] {
        &self.in_keys
    }

    /// Replace the `INKEYS` list (used for prefix translation).
    pub(crate) fn set_limit_ids(&mut self, ids: Vec<String>) {
        self.in_keys = ids;
    }

    pub(crate) fn set_return_fields(&mut self, fields: Vec<String>) {
        self.return_fields = fields.into_iter().map(|f| (f, None)).collect();
    }

    pub fn dialect_value(&self) -> Option<u32> {
        self.dialect
    }

    pub fn returns_content(&self) -> bool {
        !self.no_content
    }

    pub fn returns_scores(&self) -> bool {
        self.with_scores
    }

    pub fn returns_payloads(&self) -> bool {
        self.with_payloads
    }

    /// The query-string token: base and/or rendered tree, `*` when both are
    /// absent.
    pub fn query_string(&self) -> Result<String> {
        if let Some(err) = &self.scope_error {
            return Err(SearchError::QueryBuilder(err.clone()));
        }
        let root = self.predicates.root()?;
        Ok(match (&self.base, root.is_empty()) {
            (Some(base), false) => format!("{} {}", base, root.render()),
            (base, _) => root.to_query_string(base.as_deref()),
        })
    }

    /// `FT.SEARCH` arguments following the index name.
    pub fn compile(&self) -> Result<Vec<Token>> {
        let mut args = vec![Token::from(self.query_string()?)];

        let flags = [
            (self.no_content, "NOCONTENT"),
            (self.verbatim, "VERBATIM"),
            (self.no_stopwords, "NOSTOPWORDS"),
            (self.with_payloads, "WITHPAYLOADS"),
        ];
        args.extend(flags.into_iter().filter(|(on, _)| *on).map(|(_, t)| Token::from(t)));

        if let Some(scorer) = &self.scorer {
            args.push("SCORER".into());
            args.push(scorer.into());
        }
        if self.with_scores {
            args.push("WITHSCORES".into());
        }
        if !self.in_fields.is_empty() {
            args.push("INFIELDS".into());
            push_counted(&mut args, &self.in_fields);
        }
        if !self.in_keys.is_empty() {
            args.push("INKEYS".into());
            push_counted(&mut args, &self.in_keys);
        }
        for f in &self.filters {
            args.extend(["FILTER".into(), Token::from(&f.field), f.min.into(), f.max.into()]);
        }
        for g in &self.geo_filters {
            args.extend([
                "GEOFILTER".into(),
                Token::from(&g.field),
                g.lon.into(),
                g.lat.into(),
                g.radius.into(),
                g.unit.as_str().into(),
            ]);
        }
        if !self.return_fields.is_empty() {
            let mut fields: Vec<Token> = Vec::new();
            for (field, alias) in &self.return_fields {
                fields.push(field.into());
                if let Some(alias) = alias {
                    fields.push("AS".into());
                    fields.push(alias.into());
                }
            }
            args.push("RETURN".into());
            push_counted(&mut args, fields);
        }
        if let Some(summarize) = &self.summarize {
            summarize.write(&mut args);
        }
        if let Some(highlight) = &self.highlight {
            highlight.write(&mut args);
        }
        if let Some(slop) = self.slop {
            args.push("SLOP".into());
            args.push(slop.into());
        }
        if let Some(timeout) = self.timeout {
            args.push("TIMEOUT".into());
            args.push(timeout.into());
        }
        if let Some(language) = &self.language {
            args.push("LANGUAGE".into());
            args.push(language.into());
        }
        if let Some(expander) = &self.expander {
            args.push("EXPANDER".into());
            args.push(expander.into());
        }
        if self.in_order {
            args.push("INORDER".into());
        }
        if let Some((field, order)) = &self.sort_by {
            args.push("SORTBY".into());
            args.push(field.into());
            if let Some(order) = order {
                args.push(order.as_str().into());
            }
        }
        if let Some((offset, count)) = self.limit {
            args.extend(["LIMIT".into(), offset.into(), count.into()]);
        }
        write_params(&mut args, &self.params);
        args.push("DIALECT".into());
        args.push(self.dialect.unwrap_or(DEFAULT_DIALECT).into());

        Ok(args)
    }
}

impl From<&str> for Query {
    fn from(base: &str) -> Self {
        Query::new(base)
    }
}

impl From<String> for Query {
    fn from(base: String) -> Self {
        Query::new(base)
    }
}

/// Bind `name`, replacing an earlier value of the same name.
pub(crate) fn bind_param(params: &mut Vec<(String, Token)>, name: String, value: Token) {
    match params.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => params.push((name, value)),
    }
}

/// `PARAMS <2n> name value ...`, omitted when empty.
pub(crate) fn write_params(args: &mut Vec<Token>, params: &[(String, Token)]) {
    if params.is_empty() {
        return;
    }
    args.push("PARAMS".into());
    args.push((params.len() * 2).into());
    for (name, value) in params {
        args.push(name.into());
        args.push(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_with_default_dialect() {
        let query = Query::new("@model:Jigger").return_field("price");
        assert_eq!(
            query.compile().unwrap(),
            ["@model:Jigger", "RETURN", "1", "price", "DIALECT", "2"]
        );
    }

    #[test]
    fn test_empty_query_is_wildcard() {
        assert_eq!(Query::all().compile().unwrap(), ["*", "DIALECT", "2"]);
    }

    #[test]
    fn test_predicate_query() {
        let query = Query::all().tag("city", "NY").numeric("age", 30.0, 35.0);
        assert_eq!(query.query_string().unwrap(), "((@city:{NY}) (@age:[30 35]))");
    }

    #[test]
    fn test_nested_or_block() {
        let query = Query::all()
            .tag("city", "NY")
            .or(|q| q.numeric("age", 18.0, 25.0).numeric("age", 60.0, f64::INFINITY));
        assert_eq!(
            query.query_string().unwrap(),
            "((@city:{NY}) ((@age:[18 25]) | (@age:[60 +inf])))"
        );
    }

    #[test]
    fn test_base_and_predicates_combine() {
        let query = Query::new("@title:bike").tag("color", "red");
        assert_eq!(query.query_string().unwrap(), "@title:bike ((@color:{red}))");
    }

    #[test]
    fn test_unbalanced_close_fails_compile() {
        let query = Query::all().close();
        assert!(matches!(query.compile(), Err(SearchError::QueryBuilder(_))));

        let query = Query::all().open(Connective::Or).tag("a", "b");
        assert!(matches!(query.compile(), Err(SearchError::QueryBuilder(_))));
    }

    #[test]
    fn test_full_option_order() {
        let query = Query::new("hello")
            .dialect(3)
            .limit(0, 10)
            .sort_by("price", Some(SortOrder::Desc))
            .in_order()
            .expander("SYNONYM")
            .language("english")
            .timeout(500)
            .slop(1)
            .highlight(Highlight {
                fields: vec!["title".into()],
                tags: Some(("<b>".into(), "</b>".into())),
            })
            .summarize(Summarize {
                fields: vec!["body".into()],
                frags: Some(3),
                len: Some(20),
                separator: Some("...".into()),
            })
            .return_as("price", "cost")
            .geo_filter("loc", -122.4, 37.7, 5.0, GeoUnit::Km)
            .filter("price", 10.0, 100.0)
            .limit_ids(["doc:1"])
            .in_fields(["title"])
            .with_scores()
            .scorer("BM25")
            .with_payloads()
            .no_stopwords()
            .verbatim()
            .no_content();

        assert_eq!(
            query.compile().unwrap(),
            [
                "hello", "NOCONTENT", "VERBATIM", "NOSTOPWORDS", "WITHPAYLOADS",
                "SCORER", "BM25", "WITHSCORES",
                "INFIELDS", "1", "title",
                "INKEYS", "1", "doc:1",
                "FILTER", "price", "10", "100",
                "GEOFILTER", "loc", "-122.4", "37.7", "5", "km",
                "RETURN", "3", "price", "AS", "cost",
                "SUMMARIZE", "FIELDS", "1", "body", "FRAGS", "3", "LEN", "20", "SEPARATOR", "...",
                "HIGHLIGHT", "FIELDS", "1", "title", "TAGS", "<b>", "</b>",
                "SLOP", "1", "TIMEOUT", "500", "LANGUAGE", "english", "EXPANDER", "SYNONYM",
                "INORDER", "SORTBY", "price", "DESC", "LIMIT", "0", "10", "DIALECT", "3"
            ]
        );
    }

    #[test]
    fn test_params_precede_dialect() {
        let query = Query::new("@v:[VECTOR_RANGE $r $vec]")
            .param("r", 0.5f64)
            .param("vec", Token::bytes(vec![0u8, 1, 2, 3]));
        let args = query.compile().unwrap();
        assert_eq!(args[1], "PARAMS");
        assert_eq!(args[2], "4");
        assert_eq!(args[3], "r");
        assert_eq!(args[4], "0.5");
        assert_eq!(args[6].as_bytes(), &[0u8, 1, 2, 3]);
        assert_eq!(args[7], "DIALECT");
    }

    #[test]
    fn test_compile_does_not_mutate() {
        let query = Query::all().tag("a", "b").limit(0, 5);
        let first = query.compile().unwrap();
        assert_eq!(first, query.compile().unwrap());
    }

    #[test]
    fn test_rebinding_param_replaces() {
        let args = Query::new("@price:[$lo +inf]").param("lo", 10u64).param("lo", 20u64).compile().unwrap();
        assert_eq!(args, ["@price:[$lo +inf]", "PARAMS", "2", "lo", "20", "DIALECT", "2"]);
    }
}
