// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index façade.
//!
//! Binds a [`Schema`], a storage kind, an optional key prefix and a
//! [`Transport`]. Every operation is a pure `*_command` compile step followed
//! by a single `send`; local failures are returned before anything is sent.
//!
//! # Prefix translation
//!
//! ```text
//! search("*", limit_ids ["doc1"])       prefix "bike"
//!       │
//!       ├─→ INKEYS 1 bike:doc1          (ids gain "bike:")
//!       │
//!       └─→ reply id "bike:doc1" → "doc1"  (ids lose it again)
//! ```
//!
//! # Example
//!
//! ```
//! # use redisearch_builder::{Index, RecordingTransport, Schema};
//! # use serde_json::json;
//! # async fn example() -> redisearch_builder::Result<()> {
//! let schema = Schema::builder()
//!     .text_field("model", json!({}))
//!     .numeric_field("price", json!({"sortable": true}))
//!     .build()?;
//!
//! let index = Index::new("idx:bikes", schema, RecordingTransport::new()).prefix("bike");
//! index.create().await?;
//! # Ok(())
//! # }
//! ```

mod definition;
mod options;

pub use definition::{CreateOptions, IndexDefinition, StorageKind};
pub use options::{ProfileTarget, SearchInput, SearchOptions, SpellcheckOptions, TermsMode};

use redis::Value;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{cursor_del_command, cursor_read_command, AggregatePipeline};
use crate::config::BuilderConfig;
use crate::error::{Result, SearchError};
use crate::hybrid::HybridQuery;
use crate::metrics::{self, CommandTimer};
use crate::reply::{self, AggregateResults, SearchLayout, SearchResults, SpellcheckReply};
use crate::schema::{Field, FieldType, Schema};
use crate::search::Query;
use crate::token::{f32_blob, Token};
use crate::transport::Transport;

/// A search index bound to a transport.
///
/// Holds no query state; concurrent calls are as safe as the transport.
pub struct Index<T: Transport> {
    name: String,
    schema: Schema,
    storage: StorageKind,
    prefix: Option<String>,
    definition: IndexDefinition,
    create_options: CreateOptions,
    config: BuilderConfig,
    transport: T,
}

impl<T: Transport> Index<T> {
    pub fn new(name: impl Into<String>, schema: Schema, transport: T) -> Self {
        Self::with_config(name, schema, transport, BuilderConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        schema: Schema,
        transport: T,
        config: BuilderConfig,
    ) -> Self {
        Self {
            name: name.into(),
            schema,
            storage: config.storage,
            prefix: None,
            definition: IndexDefinition::default(),
            create_options: CreateOptions::default(),
            config,
            transport,
        }
    }

    /// Key prefix, without the separator (`"bike"` → keys `bike:<id>`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    pub fn definition(mut self, definition: IndexDefinition) -> Self {
        self.definition = definition;
        self
    }

    pub fn create_options(mut self, options: CreateOptions) -> Self {
        self.create_options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage
    }

    pub fn key_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Prefix plus separator, e.g. `bike:`.
    fn full_prefix(&self) -> Option<String> {
        self.prefix
            .as_ref()
            .map(|p| format!("{}{}", p, self.config.key_separator))
    }

    /// Storage key for a document id.
    pub fn key_for(&self, doc_id: &str) -> String {
        match self.full_prefix() {
            Some(prefix) => format!("{prefix}{doc_id}"),
            None => doc_id.to_string(),
        }
    }

    fn command(&self, name: &str) -> Vec<Token> {
        vec![name.into(), Token::from(&self.name)]
    }

    fn rejected<R>(&self, command: &str, err: SearchError) -> Result<R> {
        metrics::record_validation_failure(err.kind());
        warn!(index = %self.name, command, error = %err, "Rejected before send");
        Err(err)
    }

    async fn execute(&self, command: Vec<Token>) -> Result<Value> {
        let name = command
            .first()
            .map(|t| t.as_str().into_owned())
            .unwrap_or_default();
        debug!(index = %self.name, command = %name, argc = command.len(), "Sending command");

        let _timer = CommandTimer::new(name.clone());
        let result = self.transport.send(command).await;
        metrics::record_command(&name, result.is_ok());
        result
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Command compilers
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn create_command(&self) -> Vec<Token> {
        let mut args = self.command("FT.CREATE");
        let prefix = self.full_prefix();
        self.definition.write(&mut args, self.storage, prefix.as_deref());
        self.create_options.write(&mut args);
        args.extend(self.schema.to_args());
        args
    }

    /// Validate `fields` against the schema and build the write command.
    pub fn add_command(&self, doc_id: &str, fields: &Map<String, JsonValue>) -> Result<Vec<Token>> {
        for (key, value) in fields {
            let Some(field) = self.schema.field(key) else {
                continue;
            };
            if field.field_type() == FieldType::Numeric && !(value.is_number() || value.is_null()) {
                return Err(SearchError::FieldTypeMismatch {
                    field: key.clone(),
                    expected: "numeric",
                    actual: json_type_name(value).to_string(),
                });
            }
        }

        let key = self.key_for(doc_id);
        match self.storage {
            StorageKind::Json => {
                let doc = serde_json::to_string(fields)
                    .map_err(|e| SearchError::QueryBuilder(format!("document '{doc_id}': {e}")))?;
                Ok(vec!["JSON.SET".into(), key.into(), "$".into(), doc.into()])
            }
            StorageKind::Hash => {
                let mut args: Vec<Token> = vec!["HSET".into(), key.into()];
                for (name, value) in fields {
                    let is_vector = self
                        .schema
                        .field(name)
                        .is_some_and(|f| f.field_type() == FieldType::Vector);
                    if let Some(token) = hash_value(value, is_vector) {
                        args.push(name.into());
                        args.push(token);
                    }
                }
                if args.len() == 2 {
                    return Err(SearchError::QueryBuilder(format!(
                        "document '{doc_id}' has no fields to write"
                    )));
                }
                Ok(args)
            }
        }
    }

    /// `FT.SEARCH` with overrides and prefix translation applied, plus the
    /// reply layout to parse with.
    pub fn search_command(
        &self,
        input: impl Into<SearchInput>,
        options: SearchOptions,
    ) -> Result<(Vec<Token>, SearchLayout)> {
        let query = self.prepare_query(options.apply(input.into().into_query()));
        let layout = SearchLayout {
            content: query.returns_content(),
            scores: query.returns_scores(),
            payloads: query.returns_payloads(),
        };
        let mut args = self.command("FT.SEARCH");
        args.extend(query.compile()?);
        Ok((args, layout))
    }

    /// Default dialect and key prefix, as every search-shaped command sees them.
    fn prepare_query(&self, mut query: Query) -> Query {
        if query.dialect_value().is_none() {
            query = query.dialect(self.config.default_dialect);
        }
        if self.prefix.is_some() && !query.limit_id_list().is_empty() {
            let ids = query.limit_id_list().iter().map(|id| self.key_for(id)).collect();
            query.set_limit_ids(ids);
        }
        query
    }

    pub fn aggregate_command(&self, pipeline: &AggregatePipeline) -> Vec<Token> {
        let mut args = self.command("FT.AGGREGATE");
        args.extend(pipeline.compile());
        args
    }

    pub fn hybrid_command(&self, query: &HybridQuery) -> Vec<Token> {
        let mut args: Vec<Token> = vec!["FT.HYBRID".into()];
        args.extend(query.compile(&self.name));
        args
    }

    /// `FT.EXPLAIN idx q [DIALECT n]`
    pub fn explain_command(&self, query: &Query) -> Result<Vec<Token>> {
        let mut args = self.command("FT.EXPLAIN");
        args.push(query.query_string()?.into());
        args.push("DIALECT".into());
        args.push(query.dialect_value().unwrap_or(self.config.default_dialect).into());
        Ok(args)
    }

    pub fn alter_command(&self, field: &Field, skip_initial_scan: bool) -> Vec<Token> {
        let mut args = self.command("FT.ALTER");
        if skip_initial_scan {
            args.push("SKIPINITIALSCAN".into());
        }
        args.extend(["SCHEMA".into(), "ADD".into()]);
        args.extend(field.to_args());
        args
    }

    pub fn drop_command(&self, delete_documents: bool) -> Vec<Token> {
        let mut args = self.command("FT.DROPINDEX");
        if delete_documents {
            args.push("DD".into());
        }
        args
    }

    /// `FT.PROFILE idx SEARCH|AGGREGATE [LIMITED] QUERY <args...>`
    pub fn profile_command(&self, target: &ProfileTarget, limited: bool) -> Result<Vec<Token>> {
        let mut args = self.command("FT.PROFILE");
        let body = match target {
            ProfileTarget::Search(query) => {
                args.push("SEARCH".into());
                self.prepare_query(query.clone()).compile()?
            }
            ProfileTarget::Aggregate(pipeline) => {
                args.push("AGGREGATE".into());
                pipeline.compile()
            }
        };
        if limited {
            args.push("LIMITED".into());
        }
        args.push("QUERY".into());
        args.extend(body);
        Ok(args)
    }

    pub fn spellcheck_command(&self, query: &str, options: &SpellcheckOptions) -> Vec<Token> {
        let mut args = self.command("FT.SPELLCHECK");
        args.push(query.into());
        options.write(&mut args);
        args
    }

    pub fn synupdate_command<I, S>(&self, group: &str, terms: I, skip_initial_scan: bool) -> Vec<Token>
    where
        I: IntoIterator<Item = S>,
        S: Into<Token>,
    {
        let mut args = self.command("FT.SYNUPDATE");
        args.push(group.into());
        if skip_initial_scan {
            args.push("SKIPINITIALSCAN".into());
        }
        args.extend(terms.into_iter().map(Into::into));
        args
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Index lifecycle
    // ═══════════════════════════════════════════════════════════════════════════

    #[instrument(skip_all, fields(index = %self.name))]
    pub async fn create(&self) -> Result<()> {
        let reply = self.execute(self.create_command()).await?;
        reply::expect_ok(&reply, "FT.CREATE")?;
        info!(index = %self.name, fields = self.schema.len(), "Search index created");
        Ok(())
    }

    /// Add a field to the live index and to the local schema.
    #[instrument(skip_all, fields(index = %self.name, field = %field.name()))]
    pub async fn alter(&mut self, field: Field, skip_initial_scan: bool) -> Result<()> {
        let reply = self.execute(self.alter_command(&field, skip_initial_scan)).await?;
        reply::expect_ok(&reply, "FT.ALTER")?;
        info!(index = %self.name, field = %field.name(), "Search index altered");
        self.schema.push(field);
        Ok(())
    }

    #[instrument(skip_all, fields(index = %self.name))]
    pub async fn drop(&self, delete_documents: bool) -> Result<()> {
        let reply = self.execute(self.drop_command(delete_documents)).await?;
        reply::expect_ok(&reply, "FT.DROPINDEX")?;
        info!(index = %self.name, delete_documents, "Search index dropped");
        Ok(())
    }

    pub async fn info(&self) -> Result<HashMap<String, Value>> {
        let reply = self.execute(self.command("FT.INFO")).await?;
        reply::info_map(&reply)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Documents and queries
    // ═══════════════════════════════════════════════════════════════════════════

    /// Write one document. Numeric schema fields must receive numbers.
    #[instrument(skip_all, fields(index = %self.name, doc_id = %doc_id))]
    pub async fn add(&self, doc_id: &str, fields: &Map<String, JsonValue>) -> Result<()> {
        let command = match self.add_command(doc_id, fields) {
            Ok(command) => command,
            Err(e) => return self.rejected("add", e),
        };
        self.execute(command).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(index = %self.name))]
    pub async fn search(
        &self,
        input: impl Into<SearchInput>,
        options: SearchOptions,
    ) -> Result<SearchResults> {
        let (command, layout) = match self.search_command(input, options) {
            Ok(compiled) => compiled,
            Err(e) => return self.rejected("FT.SEARCH", e),
        };
        let reply = self.execute(command).await?;

        let mut results = reply::search_results(&reply, layout)?;
        if self.config.strip_prefix_on_read {
            if let Some(prefix) = self.full_prefix() {
                results.strip_prefix(&prefix);
            }
        }
        metrics::record_search_results(results.documents.len());
        Ok(results)
    }

    #[instrument(skip_all, fields(index = %self.name))]
    pub async fn aggregate(&self, pipeline: &AggregatePipeline) -> Result<AggregateResults> {
        let reply = self.execute(self.aggregate_command(pipeline)).await?;
        reply::aggregate_results(&reply)
    }

    pub async fn cursor_read(
        &self,
        cursor_id: u64,
        max_idle: Option<u64>,
        count: Option<u64>,
    ) -> Result<AggregateResults> {
        let reply = self
            .execute(cursor_read_command(&self.name, cursor_id, max_idle, count))
            .await?;
        reply::aggregate_results(&reply)
    }

    pub async fn cursor_del(&self, cursor_id: u64) -> Result<()> {
        let reply = self.execute(cursor_del_command(&self.name, cursor_id)).await?;
        reply::expect_ok(&reply, "FT.CURSOR DEL")
    }

    /// Raw `FT.HYBRID` reply.
    #[instrument(skip_all, fields(index = %self.name))]
    pub async fn hybrid(&self, query: &HybridQuery) -> Result<Value> {
        self.execute(self.hybrid_command(query)).await
    }

    /// Execution plan as text.
    pub async fn explain(&self, query: impl Into<Query>) -> Result<String> {
        let command = match self.explain_command(&query.into()) {
            Ok(command) => command,
            Err(e) => return self.rejected("FT.EXPLAIN", e),
        };
        let reply = self.execute(command).await?;
        match reply::value_to_string(&reply) {
            Some(plan) => Ok(plan),
            None => Ok(reply::string_list(&reply, "FT.EXPLAIN")?.join("\n")),
        }
    }

    /// Raw `FT.PROFILE` reply.
    pub async fn profile(&self, target: impl Into<ProfileTarget>, limited: bool) -> Result<Value> {
        let command = match self.profile_command(&target.into(), limited) {
            Ok(command) => command,
            Err(e) => return self.rejected("FT.PROFILE", e),
        };
        self.execute(command).await
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Spelling, synonyms, tags
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn spellcheck(&self, query: &str, options: SpellcheckOptions) -> Result<SpellcheckReply> {
        let reply = self.execute(self.spellcheck_command(query, &options)).await?;
        if options.parse {
            Ok(SpellcheckReply::Parsed(reply::spellcheck_map(&reply)?))
        } else {
            Ok(SpellcheckReply::Raw(reply))
        }
    }

    pub async fn synupdate<I, S>(&self, group: &str, terms: I, skip_initial_scan: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Token>,
    {
        let command = self.synupdate_command(group, terms, skip_initial_scan);
        let reply = self.execute(command).await?;
        reply::expect_ok(&reply, "FT.SYNUPDATE")
    }

    pub async fn syndump(&self) -> Result<HashMap<String, Vec<String>>> {
        let reply = self.execute(self.command("FT.SYNDUMP")).await?;
        reply::syndump_map(&reply)
    }

    pub async fn tagvals(&self, field: &str) -> Result<Vec<String>> {
        let mut command = self.command("FT.TAGVALS");
        command.push(field.into());
        let reply = self.execute(command).await?;
        reply::string_list(&reply, "FT.TAGVALS")
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Server-wide: config, aliases, dictionaries
    // ═══════════════════════════════════════════════════════════════════════════

    pub async fn config_set(&self, option: &str, value: impl Into<Token>) -> Result<()> {
        let command = vec!["FT.CONFIG".into(), "SET".into(), option.into(), value.into()];
        let reply = self.execute(command).await?;
        reply::expect_ok(&reply, "FT.CONFIG SET")
    }

    pub async fn config_get(&self, option: &str) -> Result<HashMap<String, String>> {
        let command = vec!["FT.CONFIG".into(), "GET".into(), option.into()];
        let reply = self.execute(command).await?;
        reply::config_map(&reply)
    }

    pub async fn alias_add(&self, alias: &str) -> Result<()> {
        self.alias_command("FT.ALIASADD", alias).await
    }

    pub async fn alias_update(&self, alias: &str) -> Result<()> {
        self.alias_command("FT.ALIASUPDATE", alias).await
    }

    pub async fn alias_del(&self, alias: &str) -> Result<()> {
        let reply = self.execute(vec!["FT.ALIASDEL".into(), alias.into()]).await?;
        reply::expect_ok(&reply, "FT.ALIASDEL")
    }

    async fn alias_command(&self, name: &str, alias: &str) -> Result<()> {
        let command = vec![name.into(), alias.into(), Token::from(&self.name)];
        let reply = self.execute(command).await?;
        reply::expect_ok(&reply, name)
    }

    /// Returns the number of new terms.
    pub async fn dict_add<I, S>(&self, dictionary: &str, terms: I) -> Result<i64>
    where
        I: IntoIterator<Item = S>,
        S: Into<Token>,
    {
        let mut command: Vec<Token> = vec!["FT.DICTADD".into(), dictionary.into()];
        command.extend(terms.into_iter().map(Into::into));
        let reply = self.execute(command).await?;
        reply::integer(&reply, "FT.DICTADD")
    }

    /// Returns the number of removed terms.
    pub async fn dict_del<I, S>(&self, dictionary: &str, terms: I) -> Result<i64>
    where
        I: IntoIterator<Item = S>,
        S: Into<Token>,
    {
        let mut command: Vec<Token> = vec!["FT.DICTDEL".into(), dictionary.into()];
        command.extend(terms.into_iter().map(Into::into));
        let reply = self.execute(command).await?;
        reply::integer(&reply, "FT.DICTDEL")
    }

    pub async fn dict_dump(&self, dictionary: &str) -> Result<Vec<String>> {
        let reply = self
            .execute(vec!["FT.DICTDUMP".into(), dictionary.into()])
            .await?;
        reply::string_list(&reply, "FT.DICTDUMP")
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Hash field value. Null fields are skipped; number arrays on vector fields
/// become FLOAT32 blobs.
fn hash_value(value: &JsonValue, is_vector: bool) -> Option<Token> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.into()),
        JsonValue::Number(n) => Some(n.to_string().into()),
        JsonValue::Bool(b) => Some(b.to_string().into()),
        JsonValue::Array(items) if is_vector => {
            let vector: Option<Vec<f32>> = items.iter().map(|v| v.as_f64().map(|f| f as f32)).collect();
            match vector {
                Some(vector) => Some(f32_blob(&vector)),
                None => Some(value.to_string().into()),
            }
        }
        other => Some(other.to_string().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, VectorAlgorithm, VectorOptions};
    use crate::transport::RecordingTransport;
    use serde_json::json;

    fn bikes() -> Index<RecordingTransport> {
        let schema = Schema::builder()
            .text_field("model", json!({}))
            .numeric_field("price", json!({"sortable": true}))
            .build()
            .unwrap();
        Index::new("idx:bikes", schema, RecordingTransport::new()).prefix("bike")
    }

    fn doc(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_create_command() {
        assert_eq!(
            bikes().create_command(),
            [
                "FT.CREATE", "idx:bikes", "ON", "HASH", "PREFIX", "1", "bike:", "SCHEMA", "model",
                "TEXT", "price", "NUMERIC", "SORTABLE"
            ]
        );
    }

    #[test]
    fn test_create_command_definition_then_flags() {
        let index = bikes()
            .definition(
                IndexDefinition::new()
                    .prefix("b:")
                    .filter("@price > 0")
                    .language("english")
                    .score(0.5),
            )
            .create_options(CreateOptions {
                max_text_fields: true,
                temporary: Some(60),
                no_offsets: true,
                skip_initial_scan: true,
                stopwords: Some(vec!["the".into()]),
                ..Default::default()
            });
        assert_eq!(
            index.create_command(),
            [
                "FT.CREATE", "idx:bikes", "ON", "HASH", "PREFIX", "1", "b:", "FILTER", "@price > 0",
                "LANGUAGE", "english", "SCORE", "0.5", "MAXTEXTFIELDS", "TEMPORARY", "60",
                "NOOFFSETS", "SKIPINITIALSCAN", "STOPWORDS", "1", "the", "SCHEMA", "model", "TEXT",
                "price", "NUMERIC", "SORTABLE"
            ]
        );
    }

    #[test]
    fn test_add_command_hash() {
        let args = bikes()
            .add_command("1", &doc(json!({"model": "Jigger", "price": 270})))
            .unwrap();
        assert_eq!(args, ["HSET", "bike:1", "model", "Jigger", "price", "270"]);
    }

    #[test]
    fn test_add_command_json() {
        let index = bikes().storage(StorageKind::Json);
        let args = index
            .add_command("1", &doc(json!({"model": "Jigger", "price": 270})))
            .unwrap();
        assert_eq!(args[0], "JSON.SET");
        assert_eq!(args[1], "bike:1");
        assert_eq!(args[2], "$");
        assert_eq!(args[3], r#"{"model":"Jigger","price":270}"#);
    }

    #[test]
    fn test_add_numeric_mismatch() {
        let err = bikes()
            .add_command("1", &doc(json!({"price": "cheap"})))
            .unwrap_err();
        match err {
            SearchError::FieldTypeMismatch { field, expected, actual } => {
                assert_eq!(field, "price");
                assert_eq!(expected, "numeric");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_add_numeric_null_skipped() {
        let args = bikes()
            .add_command("1", &doc(json!({"model": "Jigger", "price": null})))
            .unwrap();
        assert_eq!(args, ["HSET", "bike:1", "model", "Jigger"]);
    }

    #[test]
    fn test_add_vector_packed() {
        let schema = Schema::from_fields([Field::vector(
            "embedding",
            VectorOptions::new(VectorAlgorithm::Flat).attribute("dim", 2),
        )]);
        let index = Index::new("idx:vec", schema, RecordingTransport::new());
        let args = index
            .add_command("a", &doc(json!({"embedding": [1.0, 2.0]})))
            .unwrap();
        assert_eq!(args[1], "a");
        assert_eq!(args[3], f32_blob(&[1.0, 2.0]));
    }

    #[test]
    fn test_search_prefixes_limit_ids() {
        let (args, layout) = bikes()
            .search_command("*", SearchOptions::new().limit_ids(["doc1"]))
            .unwrap();
        assert_eq!(
            args,
            ["FT.SEARCH", "idx:bikes", "*", "INKEYS", "1", "bike:doc1", "DIALECT", "2"]
        );
        assert!(layout.content);
    }

    #[test]
    fn test_search_uses_config_dialect() {
        let config = BuilderConfig {
            default_dialect: 3,
            ..Default::default()
        };
        let index = Index::with_config("idx", Schema::default(), RecordingTransport::new(), config);
        let (args, _) = index.search_command("hello", SearchOptions::new()).unwrap();
        assert_eq!(args, ["FT.SEARCH", "idx", "hello", "DIALECT", "3"]);
    }

    #[test]
    fn test_alter_command() {
        let args = bikes().alter_command(&Field::tag("color"), true);
        assert_eq!(
            args,
            ["FT.ALTER", "idx:bikes", "SKIPINITIALSCAN", "SCHEMA", "ADD", "color", "TAG"]
        );
    }

    #[test]
    fn test_explain_and_drop() {
        let index = bikes();
        assert_eq!(
            index.explain_command(&Query::new("@model:Jigger")).unwrap(),
            ["FT.EXPLAIN", "idx:bikes", "@model:Jigger", "DIALECT", "2"]
        );
        assert_eq!(index.drop_command(true), ["FT.DROPINDEX", "idx:bikes", "DD"]);
    }

    #[test]
    fn test_profile_command() {
        let args = bikes()
            .profile_command(&ProfileTarget::Search(Query::new("hello")), true)
            .unwrap();
        assert_eq!(
            args,
            ["FT.PROFILE", "idx:bikes", "SEARCH", "LIMITED", "QUERY", "hello", "DIALECT", "2"]
        );
    }

    #[test]
    fn test_profile_matches_search_args() {
        let config = BuilderConfig {
            default_dialect: 3,
            ..Default::default()
        };
        let index = Index::with_config("idx:bikes", Schema::default(), RecordingTransport::new(), config)
            .prefix("bike");
        let query = Query::all().limit_ids(["doc1"]);

        let (search, _) = index.search_command(query.clone(), SearchOptions::new()).unwrap();
        let profile = index
            .profile_command(&ProfileTarget::Search(query), false)
            .unwrap();

        assert_eq!(&search[2..], ["*", "INKEYS", "1", "bike:doc1", "DIALECT", "3"]);
        assert_eq!(&profile[..4], ["FT.PROFILE", "idx:bikes", "SEARCH", "QUERY"]);
        assert_eq!(&profile[4..], &search[2..]);
    }

    #[test]
    fn test_synupdate_command() {
        let args = bikes().synupdate_command("g1", ["hello", "hi"], true);
        assert_eq!(
            args,
            ["FT.SYNUPDATE", "idx:bikes", "g1", "SKIPINITIALSCAN", "hello", "hi"]
        );
    }
}
