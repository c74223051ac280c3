// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Reply shaping.
//!
//! Turns the flat, positional replies of the search engine into keyed
//! structures. Only RESP2-style arrays and RESP3 maps are understood; anything
//! else is reported as [`SearchError::UnexpectedReply`].

use redis::Value;
use std::collections::HashMap;

use crate::error::{Result, SearchError};

/// Scalar reply → string. `None` for arrays, maps and nil.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(s) => Some(s.clone()),
        Value::Okay => Some("OK".to_string()),
        Value::Int(v) => Some(v.to_string()),
        Value::Double(v) => Some(v.to_string()),
        Value::Boolean(v) => Some(v.to_string()),
        Value::VerbatimString { text, .. } => Some(text.clone()),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Double(v) => Some(*v),
        Value::Int(v) => Some(*v as f64),
        other => value_to_string(other)?.parse().ok(),
    }
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Int(v) => u64::try_from(*v).ok(),
        other => value_to_string(other)?.parse().ok(),
    }
}

fn expect_string(value: &Value, context: &str) -> Result<String> {
    value_to_string(value)
        .ok_or_else(|| SearchError::UnexpectedReply(format!("{context}: expected a string, got {value:?}")))
}

fn expect_array<'a>(value: &'a Value, context: &str) -> Result<&'a [Value]> {
    match value {
        Value::Array(items) | Value::Set(items) => Ok(items),
        Value::Nil => Ok(&[]),
        other => Err(SearchError::UnexpectedReply(format!(
            "{context}: expected an array, got {other:?}"
        ))),
    }
}

/// Split a reply into key/value pairs.
///
/// Accepts a flat alternating array, an array of two-element arrays, or a
/// RESP3 map.
fn pairs<'a>(value: &'a Value, context: &str) -> Result<Vec<(&'a Value, &'a Value)>> {
    if let Value::Map(entries) = value {
        return Ok(entries.iter().map(|(k, v)| (k, v)).collect());
    }

    let items = expect_array(value, context)?;
    let nested = !items.is_empty()
        && items
            .iter()
            .all(|item| matches!(item, Value::Array(pair) if pair.len() == 2));
    if nested {
        return Ok(items
            .iter()
            .filter_map(|item| match item {
                Value::Array(pair) => Some((&pair[0], &pair[1])),
                _ => None,
            })
            .collect());
    }

    if items.len() % 2 != 0 {
        return Err(SearchError::UnexpectedReply(format!(
            "{context}: odd number of elements ({})",
            items.len()
        )));
    }
    Ok(items.chunks(2).map(|pair| (&pair[0], &pair[1])).collect())
}

/// Status replies (`OK`).
pub(crate) fn expect_ok(value: &Value, command: &str) -> Result<()> {
    match value {
        Value::Okay => Ok(()),
        Value::SimpleString(s) if s.eq_ignore_ascii_case("OK") => Ok(()),
        other => Err(SearchError::UnexpectedReply(format!("{command}: expected OK, got {other:?}"))),
    }
}

pub(crate) fn string_list(value: &Value, command: &str) -> Result<Vec<String>> {
    expect_array(value, command)?
        .iter()
        .map(|item| expect_string(item, command))
        .collect()
}

pub(crate) fn integer(value: &Value, command: &str) -> Result<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        other => value_to_string(other)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SearchError::UnexpectedReply(format!("{command}: expected an integer, got {other:?}"))),
    }
}

/// `FT.CONFIG GET` → option → value.
pub fn config_map(value: &Value) -> Result<HashMap<String, String>> {
    pairs(value, "FT.CONFIG GET")?
        .into_iter()
        .map(|(k, v)| {
            let key = expect_string(k, "FT.CONFIG GET")?;
            Ok((key, value_to_string(v).unwrap_or_default()))
        })
        .collect()
}

/// `FT.SYNDUMP` → term → synonym group ids.
pub fn syndump_map(value: &Value) -> Result<HashMap<String, Vec<String>>> {
    pairs(value, "FT.SYNDUMP")?
        .into_iter()
        .map(|(term, groups)| {
            let term = expect_string(term, "FT.SYNDUMP")?;
            let groups = expect_array(groups, "FT.SYNDUMP")?
                .iter()
                .map(|g| expect_string(g, "FT.SYNDUMP"))
                .collect::<Result<Vec<_>>>()?;
            Ok((term, groups))
        })
        .collect()
}

/// `FT.INFO` → attribute → raw value.
pub fn info_map(value: &Value) -> Result<HashMap<String, Value>> {
    pairs(value, "FT.INFO")?
        .into_iter()
        .map(|(k, v)| Ok((expect_string(k, "FT.INFO")?, v.clone())))
        .collect()
}

/// One spelling suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub score: f64,
    pub suggestion: String,
}

/// `FT.SPELLCHECK` reply, either untouched or keyed by misspelled term.
#[derive(Debug, Clone, PartialEq)]
pub enum SpellcheckReply {
    Raw(Value),
    Parsed(HashMap<String, Vec<Suggestion>>),
}

impl SpellcheckReply {
    pub fn parsed(&self) -> Option<&HashMap<String, Vec<Suggestion>>> {
        match self {
            SpellcheckReply::Parsed(map) => Some(map),
            SpellcheckReply::Raw(_) => None,
        }
    }
}

/// Restructure `[["TERM", term, [[score, suggestion], ...]], ...]`.
pub fn spellcheck_map(value: &Value) -> Result<HashMap<String, Vec<Suggestion>>> {
    let mut out = HashMap::new();
    for entry in expect_array(value, "FT.SPELLCHECK")? {
        let parts = expect_array(entry, "FT.SPELLCHECK")?;
        let [_, term, suggestions] = parts else {
            return Err(SearchError::UnexpectedReply(format!(
                "FT.SPELLCHECK: expected [TERM, term, suggestions], got {} elements",
                parts.len()
            )));
        };

        let term = expect_string(term, "FT.SPELLCHECK")?;
        let mut list = Vec::new();
        for pair in expect_array(suggestions, "FT.SPELLCHECK")? {
            let [score, suggestion] = expect_array(pair, "FT.SPELLCHECK")? else {
                return Err(SearchError::UnexpectedReply(
                    "FT.SPELLCHECK: suggestion must be [score, term]".to_string(),
                ));
            };
            let score = value_to_f64(score).ok_or_else(|| {
                SearchError::UnexpectedReply(format!("FT.SPELLCHECK: bad score {score:?}"))
            })?;
            list.push(Suggestion {
                score,
                suggestion: expect_string(suggestion, "FT.SPELLCHECK")?,
            });
        }
        out.insert(term, list);
    }
    Ok(out)
}

/// Which optional columns an `FT.SEARCH` reply carries per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLayout {
    pub content: bool,
    pub scores: bool,
    pub payloads: bool,
}

impl Default for SearchLayout {
    fn default() -> Self {
        Self {
            content: true,
            scores: false,
            payloads: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub id: String,
    pub score: Option<f64>,
    pub payload: Option<String>,
    pub fields: HashMap<String, String>,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub total: u64,
    pub documents: Vec<Document>,
}

impl SearchResults {
    /// Remove `prefix` from the front of every document id that carries it.
    pub fn strip_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() {
            return;
        }
        for doc in &mut self.documents {
            if let Some(rest) = doc.id.strip_prefix(prefix) {
                doc.id = rest.to_string();
            }
        }
    }
}

/// Parse `[total, id, [score], [payload], [fields], ...]`.
pub fn search_results(value: &Value, layout: SearchLayout) -> Result<SearchResults> {
    let items = expect_array(value, "FT.SEARCH")?;
    let Some((total, rest)) = items.split_first() else {
        return Ok(SearchResults::default());
    };
    let total = value_to_u64(total)
        .ok_or_else(|| SearchError::UnexpectedReply(format!("FT.SEARCH: bad total {total:?}")))?;

    let stride = 1 + layout.scores as usize + layout.payloads as usize + layout.content as usize;
    if rest.len() % stride != 0 {
        return Err(SearchError::UnexpectedReply(format!(
            "FT.SEARCH: {} elements do not divide into documents of {stride}",
            rest.len()
        )));
    }

    let mut documents = Vec::with_capacity(rest.len() / stride);
    for chunk in rest.chunks(stride) {
        let mut cols = chunk.iter();
        let mut doc = Document::default();
        if let Some(id) = cols.next() {
            doc.id = expect_string(id, "FT.SEARCH")?;
        }
        if layout.scores {
            if let Some(score) = cols.next() {
                doc.score = value_to_f64(score);
            }
        }
        if layout.payloads {
            if let Some(payload) = cols.next() {
                doc.payload = value_to_string(payload);
            }
        }
        if layout.content {
            if let Some(fields) = cols.next() {
                for (k, v) in pairs(fields, "FT.SEARCH")? {
                    doc.fields
                        .insert(expect_string(k, "FT.SEARCH")?, value_to_string(v).unwrap_or_default());
                }
            }
        }
        documents.push(doc);
    }

    Ok(SearchResults { total, documents })
}

/// Aggregate rows plus the cursor to continue from, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResults {
    pub total: u64,
    pub rows: Vec<HashMap<String, Value>>,
    /// `None` when no cursor was requested or the cursor is exhausted.
    pub cursor: Option<u64>,
}

/// Parse `[total, row...]` or, for cursor replies, `[[total, row...], cid]`.
pub fn aggregate_results(value: &Value) -> Result<AggregateResults> {
    let items = expect_array(value, "FT.AGGREGATE")?;

    let (body, cursor) = match items {
        [Value::Array(body), cid] if !matches!(cid, Value::Array(_)) => {
            let cid = value_to_u64(cid).ok_or_else(|| {
                SearchError::UnexpectedReply(format!("FT.AGGREGATE: bad cursor id {cid:?}"))
            })?;
            (body.as_slice(), (cid != 0).then_some(cid))
        }
        _ => (items, None),
    };

    let Some((total, rows)) = body.split_first() else {
        return Ok(AggregateResults {
            cursor,
            ..Default::default()
        });
    };
    let total = value_to_u64(total)
        .ok_or_else(|| SearchError::UnexpectedReply(format!("FT.AGGREGATE: bad total {total:?}")))?;

    let rows = rows
        .iter()
        .map(|row| {
            pairs(row, "FT.AGGREGATE")?
                .into_iter()
                .map(|(k, v)| Ok((expect_string(k, "FT.AGGREGATE")?, v.clone())))
                .collect::<Result<HashMap<_, _>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AggregateResults { total, rows, cursor })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    #[test]
    fn test_config_flat_pairs() {
        let reply = Value::Array(vec![bulk("TIMEOUT"), bulk("500"), bulk("MINPREFIX"), bulk("2")]);
        let map = config_map(&reply).unwrap();
        assert_eq!(map["TIMEOUT"], "500");
        assert_eq!(map["MINPREFIX"], "2");
    }

    #[test]
    fn test_config_nested_pairs() {
        let reply = Value::Array(vec![
            Value::Array(vec![bulk("TIMEOUT"), bulk("500")]),
            Value::Array(vec![bulk("MAXEXPANSIONS"), Value::Nil]),
        ]);
        let map = config_map(&reply).unwrap();
        assert_eq!(map["TIMEOUT"], "500");
        assert_eq!(map["MAXEXPANSIONS"], "");
    }

    #[test]
    fn test_config_odd_length_rejected() {
        let reply = Value::Array(vec![bulk("TIMEOUT")]);
        assert!(matches!(config_map(&reply), Err(SearchError::UnexpectedReply(_))));
    }

    #[test]
    fn test_syndump() {
        let reply = Value::Array(vec![
            bulk("shalom"),
            Value::Array(vec![bulk("g1")]),
            bulk("hello"),
            Value::Array(vec![bulk("g1"), bulk("g2")]),
        ]);
        let map = syndump_map(&reply).unwrap();
        assert_eq!(map["shalom"], vec!["g1"]);
        assert_eq!(map["hello"], vec!["g1", "g2"]);
    }

    #[test]
    fn test_spellcheck() {
        let reply = Value::Array(vec![Value::Array(vec![
            bulk("TERM"),
            bulk("impornant"),
            Value::Array(vec![
                Value::Array(vec![bulk("0.5"), bulk("important")]),
                Value::Array(vec![Value::Double(0.25), bulk("imported")]),
            ]),
        ])]);
        let map = spellcheck_map(&reply).unwrap();
        let suggestions = &map["impornant"];
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].suggestion, "important");
        assert_eq!(suggestions[0].score, 0.5);
        assert_eq!(suggestions[1].score, 0.25);
    }

    #[test]
    fn test_spellcheck_bad_entry() {
        let reply = Value::Array(vec![Value::Array(vec![bulk("TERM")])]);
        assert!(spellcheck_map(&reply).is_err());
    }

    #[test]
    fn test_search_with_content() {
        let reply = Value::Array(vec![
            Value::Int(2),
            bulk("bike:1"),
            Value::Array(vec![bulk("model"), bulk("Jigger"), bulk("price"), bulk("270")]),
            bulk("bike:2"),
            Value::Array(vec![bulk("model"), bulk("Hillcraft")]),
        ]);
        let mut results = search_results(&reply, SearchLayout::default()).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.documents[0].get("price"), Some("270"));

        results.strip_prefix("bike:");
        assert_eq!(results.documents[0].id, "1");
        assert_eq!(results.documents[1].id, "2");
    }

    #[test]
    fn test_search_scores_no_content() {
        let layout = SearchLayout {
            content: false,
            scores: true,
            payloads: false,
        };
        let reply = Value::Array(vec![Value::Int(1), bulk("doc1"), bulk("1.5")]);
        let results = search_results(&reply, layout).unwrap();
        assert_eq!(results.documents[0].id, "doc1");
        assert_eq!(results.documents[0].score, Some(1.5));
        assert!(results.documents[0].fields.is_empty());
    }

    #[test]
    fn test_search_misaligned() {
        let reply = Value::Array(vec![Value::Int(1), bulk("doc1")]);
        assert!(search_results(&reply, SearchLayout::default()).is_err());
    }

    #[test]
    fn test_aggregate_plain() {
        let reply = Value::Array(vec![
            Value::Int(1),
            Value::Array(vec![bulk("condition"), bulk("new"), bulk("n"), bulk("3")]),
        ]);
        let results = aggregate_results(&reply).unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.rows[0]["n"], bulk("3"));
        assert_eq!(results.cursor, None);
    }

    #[test]
    fn test_aggregate_cursor() {
        let reply = Value::Array(vec![
            Value::Array(vec![Value::Int(5), Value::Array(vec![bulk("n"), bulk("1")])]),
            Value::Int(42),
        ]);
        let results = aggregate_results(&reply).unwrap();
        assert_eq!(results.rows.len(), 1);
        assert_eq!(results.cursor, Some(42));

        let done = Value::Array(vec![Value::Array(vec![Value::Int(5)]), Value::Int(0)]);
        assert_eq!(aggregate_results(&done).unwrap().cursor, None);
    }

    #[test]
    fn test_info_map() {
        let reply = Value::Array(vec![bulk("index_name"), bulk("idx"), bulk("num_docs"), Value::Int(3)]);
        let info = info_map(&reply).unwrap();
        assert_eq!(info["num_docs"], Value::Int(3));
    }
}
