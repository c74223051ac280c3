// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index schemas.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Order matters: it is the
//! order the fields appear after the `SCHEMA` keyword.
//!
//! # Example
//!
//! ```
//! use redisearch_builder::schema::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .text_field("$.model", json!({"as": "model"}))
//!     .numeric_field("$.price", json!({"as": "price", "sortable": true}))
//!     .tag_field("$.condition", json!({"as": "condition"}))
//!     .build()
//!     .unwrap();
//!
//! let args = schema.to_args();
//! assert_eq!(args[0], "SCHEMA");
//! assert_eq!(args[1], "$.model");
//! ```
//!
//! # Design
//!
//! - **All-or-nothing**: [`SchemaBuilder::build`] validates every pending
//!   definition's option names before constructing any field
//! - **Typed escape hatch**: [`SchemaBuilder::field`] accepts a pre-built
//!   [`Field`], which can't carry illegal options

mod field;

pub use field::{
    CoordSystem, Field, FieldKind, FieldType, NumericOptions, PhoneticMatcher, TagOptions,
    TextOptions, VectorAlgorithm, VectorOptions,
};

use serde_json::Value;

use crate::error::{Result, SearchError};
use crate::token::Token;

/// Ordered collection of fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Schema from already-constructed fields.
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find the field a document key refers to (see [`Field::matches`]).
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.matches(key))
    }

    pub(crate) fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// `SCHEMA` followed by every field's tokens, in insertion order.
    pub fn to_args(&self) -> Vec<Token> {
        let mut args = vec![Token::from("SCHEMA")];
        for field in &self.fields {
            args.extend(field.to_args());
        }
        args
    }
}

enum Definition {
    Typed(Field),
    Dynamic {
        field_type: FieldType,
        name: String,
        options: Value,
    },
}

/// Collects field definitions and validates them together in [`build`](Self::build).
#[derive(Default)]
pub struct SchemaBuilder {
    definitions: Vec<Definition>,
}

impl SchemaBuilder {
    /// Add a field by type, name and JSON option object.
    pub fn define(mut self, field_type: FieldType, name: impl Into<String>, options: Value) -> Self {
        self.definitions.push(Definition::Dynamic {
            field_type,
            name: name.into(),
            options,
        });
        self
    }

    pub fn text_field(self, name: impl Into<String>, options: Value) -> Self {
        self.define(FieldType::Text, name, options)
    }

    pub fn tag_field(self, name: impl Into<String>, options: Value) -> Self {
        self.define(FieldType::Tag, name, options)
    }

    pub fn numeric_field(self, name: impl Into<String>, options: Value) -> Self {
        self.define(FieldType::Numeric, name, options)
    }

    pub fn geo_field(self, name: impl Into<String>, options: Value) -> Self {
        self.define(FieldType::Geo, name, options)
    }

    pub fn geoshape_field(self, name: impl Into<String>, options: Value) -> Self {
        self.define(FieldType::GeoShape, name, options)
    }

    pub fn vector_field(self, name: impl Into<String>, options: Value) -> Self {
        self.define(FieldType::Vector, name, options)
    }

    /// Add an already-constructed field.
    pub fn field(mut self, field: Field) -> Self {
        self.definitions.push(Definition::Typed(field));
        self
    }

    /// Validate every definition, then construct the schema.
    pub fn build(self) -> Result<Schema> {
        // Option names first, so no field exists if any definition is bad.
        for def in &self.definitions {
            if let Definition::Dynamic { field_type, name, options } = def {
                match options {
                    Value::Object(map) => field::validate_option_names(*field_type, name, map)?,
                    Value::Null => {}
                    other => {
                        return Err(SearchError::schema(
                            name,
                            format!("options must be an object, got {other}"),
                        ))
                    }
                }
            }
        }

        let fields = self
            .definitions
            .into_iter()
            .map(|def| match def {
                Definition::Typed(field) => Ok(field),
                Definition::Dynamic { field_type, name, options } => {
                    Field::define(field_type, name, &options)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Schema { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_preserves_insertion_order() {
        let schema = Schema::builder()
            .text_field("name", json!({}))
            .numeric_field("age", json!({"sortable": true}))
            .tag_field("roles", Value::Null)
            .build()
            .unwrap();

        assert_eq!(
            schema.to_args(),
            ["SCHEMA", "name", "TEXT", "age", "NUMERIC", "SORTABLE", "roles", "TAG"]
        );
    }

    #[test]
    fn test_bad_option_blocks_whole_schema() {
        let result = Schema::builder()
            .text_field("name", json!({"sortable": true}))
            .numeric_field("age", json!({"separator": ","}))
            .build();

        match result {
            Err(SearchError::SchemaValidation { field, message }) => {
                assert_eq!(field, "age");
                assert!(message.contains("separator"));
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_and_dynamic_fields_mix() {
        let schema = Schema::builder()
            .field(Field::tag("category"))
            .geo_field("location", json!({"index_missing": true}))
            .build()
            .unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.to_args(),
            ["SCHEMA", "category", "TAG", "location", "GEO", "INDEXMISSING"]
        );
    }

    #[test]
    fn test_field_lookup_by_alias() {
        let schema = Schema::builder()
            .numeric_field("$.price", json!({"as": "price"}))
            .build()
            .unwrap();
        assert_eq!(schema.field("price").map(Field::field_type), Some(FieldType::Numeric));
        assert!(schema.field("model").is_none());
    }

    #[test]
    fn test_compile_twice_is_identical() {
        let schema = Schema::builder()
            .vector_field(
                "embedding",
                json!({"algorithm": "FLAT", "attributes": {"type": "FLOAT32", "dim": 4, "distance_metric": "L2"}}),
            )
            .build()
            .unwrap();
        assert_eq!(schema.to_args(), schema.to_args());
    }
}
