// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! `FT.CREATE` pieces that sit between the index name and `SCHEMA`.

use serde::Deserialize;

use crate::token::{push_counted, Token};

/// How documents are stored under the indexed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Hash,
    Json,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Hash => "HASH",
            StorageKind::Json => "JSON",
        }
    }
}

/// Index definition block: `ON`, `PREFIX`, `FILTER`, language and score
/// fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDefinition {
    prefixes: Vec<String>,
    filter: Option<String>,
    language_field: Option<String>,
    language: Option<String>,
    score_field: Option<String>,
    score: Option<f64>,
    payload_field: Option<String>,
}

impl IndexDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filter = Some(expression.into());
        self
    }

    pub fn language_field(mut self, field: impl Into<String>) -> Self {
        self.language_field = Some(field.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn score_field(mut self, field: impl Into<String>) -> Self {
        self.score_field = Some(field.into());
        self
    }

    /// Default document score, `0.0..=1.0`.
    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn payload_field(mut self, field: impl Into<String>) -> Self {
        self.payload_field = Some(field.into());
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Emit the block. `key_prefix` is used when no explicit prefix was set.
    pub fn write(&self, args: &mut Vec<Token>, storage: StorageKind, key_prefix: Option<&str>) {
        args.push("ON".into());
        args.push(storage.as_str().into());

        if !self.prefixes.is_empty() {
            args.push("PREFIX".into());
            push_counted(args, &self.prefixes);
        } else if let Some(prefix) = key_prefix {
            args.extend(["PREFIX".into(), "1".into(), Token::from(prefix)]);
        }

        let optional = [
            ("FILTER", &self.filter),
            ("LANGUAGE_FIELD", &self.language_field),
            ("LANGUAGE", &self.language),
            ("SCORE_FIELD", &self.score_field),
        ];
        for (keyword, value) in optional {
            if let Some(value) = value {
                args.push(keyword.into());
                args.push(value.into());
            }
        }
        if let Some(score) = self.score {
            args.push("SCORE".into());
            args.push(score.into());
        }
        if let Some(field) = &self.payload_field {
            args.push("PAYLOAD_FIELD".into());
            args.push(field.into());
        }
    }
}

/// Index-wide flags emitted after the definition block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    pub max_text_fields: bool,
    /// Seconds of inactivity before the index expires.
    pub temporary: Option<u64>,
    pub no_offsets: bool,
    pub no_highlight: bool,
    pub no_fields: bool,
    pub no_freqs: bool,
    pub skip_initial_scan: bool,
    /// `Some(vec![])` disables stopwords entirely.
    pub stopwords: Option<Vec<String>>,
}

impl CreateOptions {
    pub fn write(&self, args: &mut Vec<Token>) {
        if self.max_text_fields {
            args.push("MAXTEXTFIELDS".into());
        }
        if let Some(secs) = self.temporary {
            args.push("TEMPORARY".into());
            args.push(secs.into());
        }
        let flags = [
            (self.no_offsets, "NOOFFSETS"),
            (self.no_highlight, "NOHL"),
            (self.no_fields, "NOFIELDS"),
            (self.no_freqs, "NOFREQS"),
            (self.skip_initial_scan, "SKIPINITIALSCAN"),
        ];
        args.extend(flags.into_iter().filter(|(on, _)| *on).map(|(_, t)| Token::from(t)));
        if let Some(words) = &self.stopwords {
            args.push("STOPWORDS".into());
            push_counted(args, words);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_uses_key_prefix() {
        let mut args = Vec::new();
        IndexDefinition::new().write(&mut args, StorageKind::Json, Some("bike:"));
        assert_eq!(args, ["ON", "JSON", "PREFIX", "1", "bike:"]);
    }

    #[test]
    fn test_definition_full() {
        let mut args = Vec::new();
        IndexDefinition::new()
            .prefix("a:")
            .prefix("b:")
            .filter("@age>16")
            .language("english")
            .score(0.5)
            .payload_field("pl")
            .write(&mut args, StorageKind::Hash, Some("ignored:"));
        assert_eq!(
            args,
            [
                "ON", "HASH", "PREFIX", "2", "a:", "b:", "FILTER", "@age>16", "LANGUAGE", "english",
                "SCORE", "0.5", "PAYLOAD_FIELD", "pl"
            ]
        );
    }

    #[test]
    fn test_create_options_order() {
        let options = CreateOptions {
            max_text_fields: true,
            temporary: Some(60),
            no_highlight: true,
            skip_initial_scan: true,
            stopwords: Some(vec![]),
            ..Default::default()
        };
        let mut args = Vec::new();
        options.write(&mut args);
        assert_eq!(
            args,
            ["MAXTEXTFIELDS", "TEMPORARY", "60", "NOHL", "SKIPINITIALSCAN", "STOPWORDS", "0"]
        );
    }
}
