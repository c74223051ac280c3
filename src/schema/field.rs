// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema fields.
//!
//! A [`Field`] is one indexed column. Each [`FieldKind`] carries only the
//! options the engine accepts for that kind, so the typed constructors can't
//! produce an illegal field. The dynamic path ([`Field::define`]) takes a JSON
//! option object and checks every key against the kind's allow-list first.
//!
//! ```text
//! $.model AS model TEXT NOSTEM WEIGHT 2 PHONETIC dm:en SORTABLE
//! tags TAG SEPARATOR , CASESENSITIVE INDEXMISSING
//! embedding VECTOR HNSW 6 TYPE FLOAT32 DIM 3 DISTANCE_METRIC COSINE
//! ```

use serde_json::{Map, Value};

use crate::error::{Result, SearchError};
use crate::token::Token;

/// Column type, used by the dynamic definition path and for value checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Tag,
    Numeric,
    Geo,
    GeoShape,
    Vector,
}

impl FieldType {
    /// Wire keyword for the type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Tag => "TAG",
            FieldType::Numeric => "NUMERIC",
            FieldType::Geo => "GEO",
            FieldType::GeoShape => "GEOSHAPE",
            FieldType::Vector => "VECTOR",
        }
    }

    /// Option keys accepted by [`Field::define`] for this type (besides `as`).
    pub fn allowed_options(self) -> &'static [&'static str] {
        match self {
            FieldType::Text => &[
                "weight",
                "sortable",
                "no_index",
                "phonetic",
                "no_stem",
                "index_empty",
                "index_missing",
                "withsuffixtrie",
            ],
            FieldType::Tag => &[
                "separator",
                "case_sensitive",
                "sortable",
                "no_index",
                "index_empty",
                "index_missing",
                "withsuffixtrie",
            ],
            FieldType::Numeric | FieldType::Geo => &["sortable", "no_index", "index_missing"],
            FieldType::GeoShape => &["coord_system"],
            // sortable/no_index are recognised so they can be rejected with a precise message
            FieldType::Vector => &["algorithm", "attributes", "index_missing", "sortable", "no_index"],
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phonetic matcher for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneticMatcher {
    /// Double Metaphone, English
    DmEn,
    /// Double Metaphone, French
    DmFr,
    /// Double Metaphone, Portuguese
    DmPt,
    /// Double Metaphone, Spanish
    DmEs,
}

impl PhoneticMatcher {
    pub const ALL: [PhoneticMatcher; 4] = [
        PhoneticMatcher::DmEn,
        PhoneticMatcher::DmFr,
        PhoneticMatcher::DmPt,
        PhoneticMatcher::DmEs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhoneticMatcher::DmEn => "dm:en",
            PhoneticMatcher::DmFr => "dm:fr",
            PhoneticMatcher::DmPt => "dm:pt",
            PhoneticMatcher::DmEs => "dm:es",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

/// Vector index algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorAlgorithm {
    Flat,
    Hnsw,
    SvsVamana,
}

impl VectorAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            VectorAlgorithm::Flat => "FLAT",
            VectorAlgorithm::Hnsw => "HNSW",
            VectorAlgorithm::SvsVamana => "SVS-VAMANA",
        }
    }

    /// Case-insensitive; accepts `svs_vamana` as well as `svs-vamana`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().replace('_', "-").as_str() {
            "FLAT" => Some(VectorAlgorithm::Flat),
            "HNSW" => Some(VectorAlgorithm::Hnsw),
            "SVS-VAMANA" => Some(VectorAlgorithm::SvsVamana),
            _ => None,
        }
    }
}

/// Coordinate system of a GEOSHAPE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordSystem {
    Flat,
    #[default]
    Spherical,
}

impl CoordSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            CoordSystem::Flat => "FLAT",
            CoordSystem::Spherical => "SPHERICAL",
        }
    }
}

/// Options shared by several kinds, emitted after the kind-specific ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Suffix {
    no_index: bool,
    index_missing: bool,
    index_empty: bool,
    sortable: bool,
    withsuffixtrie: bool,
}

impl Suffix {
    fn write(self, args: &mut Vec<Token>) {
        let flags = [
            (self.no_index, "NOINDEX"),
            (self.index_missing, "INDEXMISSING"),
            (self.index_empty, "INDEXEMPTY"),
            (self.sortable, "SORTABLE"),
            (self.withsuffixtrie, "WITHSUFFIXTRIE"),
        ];
        args.extend(flags.into_iter().filter(|(on, _)| *on).map(|(_, t)| Token::from(t)));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextOptions {
    pub weight: Option<f64>,
    pub phonetic: Option<PhoneticMatcher>,
    pub no_stem: bool,
    pub sortable: bool,
    pub no_index: bool,
    pub index_empty: bool,
    pub index_missing: bool,
    pub withsuffixtrie: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagOptions {
    pub separator: Option<String>,
    pub case_sensitive: bool,
    pub sortable: bool,
    pub no_index: bool,
    pub index_empty: bool,
    pub index_missing: bool,
    pub withsuffixtrie: bool,
}

/// Options for NUMERIC and GEO fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericOptions {
    pub sortable: bool,
    pub no_index: bool,
    pub index_missing: bool,
}

/// Options for VECTOR fields. There is no way to express `SORTABLE` or
/// `NOINDEX` here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorOptions {
    algorithm: VectorAlgorithm,
    attributes: Vec<(String, String)>,
    index_missing: bool,
}

impl VectorOptions {
    pub fn new(algorithm: VectorAlgorithm) -> Self {
        Self {
            algorithm,
            attributes: Vec::new(),
            index_missing: false,
        }
    }

    /// Add an algorithm attribute; key and value are upper-cased.
    pub fn attribute(mut self, key: impl AsRef<str>, value: impl ToString) -> Self {
        self.attributes.push((
            key.as_ref().to_ascii_uppercase(),
            value.to_string().to_ascii_uppercase(),
        ));
        self
    }

    pub fn index_missing(mut self) -> Self {
        self.index_missing = true;
        self
    }

    pub fn algorithm(&self) -> VectorAlgorithm {
        self.algorithm
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

/// Kind-specific option set of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(TextOptions),
    Tag(TagOptions),
    Numeric(NumericOptions),
    Geo(NumericOptions),
    GeoShape(CoordSystem),
    Vector(VectorOptions),
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text(_) => FieldType::Text,
            FieldKind::Tag(_) => FieldType::Tag,
            FieldKind::Numeric(_) => FieldType::Numeric,
            FieldKind::Geo(_) => FieldType::Geo,
            FieldKind::GeoShape(_) => FieldType::GeoShape,
            FieldKind::Vector(_) => FieldType::Vector,
        }
    }

    fn suffix(&self) -> Suffix {
        match self {
            FieldKind::Text(o) => Suffix {
                no_index: o.no_index,
                index_missing: o.index_missing,
                index_empty: o.index_empty,
                sortable: o.sortable,
                withsuffixtrie: o.withsuffixtrie,
            },
            FieldKind::Tag(o) => Suffix {
                no_index: o.no_index,
                index_missing: o.index_missing,
                index_empty: o.index_empty,
                sortable: o.sortable,
                withsuffixtrie: o.withsuffixtrie,
            },
            FieldKind::Numeric(o) | FieldKind::Geo(o) => Suffix {
                no_index: o.no_index,
                index_missing: o.index_missing,
                sortable: o.sortable,
                ..Suffix::default()
            },
            FieldKind::GeoShape(_) => Suffix::default(),
            FieldKind::Vector(o) => Suffix {
                index_missing: o.index_missing,
                ..Suffix::default()
            },
        }
    }
}

/// One schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    alias: Option<String>,
    kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text(TextOptions::default()))
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Tag(TagOptions::default()))
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Numeric(NumericOptions::default()))
    }

    pub fn geo(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Geo(NumericOptions::default()))
    }

    pub fn geoshape(name: impl Into<String>, coord_system: CoordSystem) -> Self {
        Self::new(name, FieldKind::GeoShape(coord_system))
    }

    pub fn vector(name: impl Into<String>, options: VectorOptions) -> Self {
        Self::new(name, FieldKind::Vector(options))
    }

    /// Set the `AS` alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Build a field from a JSON option object.
    ///
    /// Every key is checked against [`FieldType::allowed_options`] before
    /// anything is constructed; the error names all offending keys.
    pub fn define(field_type: FieldType, name: impl Into<String>, options: &Value) -> Result<Self> {
        let name = name.into();
        let empty = Map::new();
        let options = match options {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(SearchError::schema(
                    &name,
                    format!("options must be an object, got {other}"),
                ))
            }
        };

        validate_option_names(field_type, &name, options)?;

        let opts = OptionReader { field: &name, options };
        let alias = opts.string("as")?;

        let kind = match field_type {
            FieldType::Text => {
                let phonetic = match opts.string("phonetic")? {
                    Some(code) => Some(PhoneticMatcher::parse(&code).ok_or_else(|| {
                        SearchError::schema(
                            &name,
                            format!(
                                "invalid phonetic matcher '{code}', expected one of: {}",
                                PhoneticMatcher::ALL.map(PhoneticMatcher::as_str).join(", ")
                            ),
                        )
                    })?),
                    None => None,
                };
                FieldKind::Text(TextOptions {
                    weight: opts.number("weight")?,
                    phonetic,
                    no_stem: opts.flag("no_stem")?,
                    sortable: opts.flag("sortable")?,
                    no_index: opts.flag("no_index")?,
                    index_empty: opts.flag("index_empty")?,
                    index_missing: opts.flag("index_missing")?,
                    withsuffixtrie: opts.flag("withsuffixtrie")?,
                })
            }
            FieldType::Tag => FieldKind::Tag(TagOptions {
                separator: opts.string("separator")?,
                case_sensitive: opts.flag("case_sensitive")?,
                sortable: opts.flag("sortable")?,
                no_index: opts.flag("no_index")?,
                index_empty: opts.flag("index_empty")?,
                index_missing: opts.flag("index_missing")?,
                withsuffixtrie: opts.flag("withsuffixtrie")?,
            }),
            FieldType::Numeric | FieldType::Geo => {
                let o = NumericOptions {
                    sortable: opts.flag("sortable")?,
                    no_index: opts.flag("no_index")?,
                    index_missing: opts.flag("index_missing")?,
                };
                if field_type == FieldType::Numeric {
                    FieldKind::Numeric(o)
                } else {
                    FieldKind::Geo(o)
                }
            }
            FieldType::GeoShape => {
                let coord = match opts.string("coord_system")?.as_deref().map(str::to_ascii_uppercase) {
                    None => CoordSystem::default(),
                    Some(s) if s == "FLAT" => CoordSystem::Flat,
                    Some(s) if s == "SPHERICAL" => CoordSystem::Spherical,
                    Some(other) => {
                        return Err(SearchError::schema(
                            &name,
                            format!("invalid coord_system '{other}', expected FLAT or SPHERICAL"),
                        ))
                    }
                };
                FieldKind::GeoShape(coord)
            }
            FieldType::Vector => {
                if opts.flag("sortable")? {
                    return Err(SearchError::schema(&name, "vector fields cannot be sortable"));
                }
                if opts.flag("no_index")? {
                    return Err(SearchError::schema(&name, "vector fields cannot have no_index"));
                }
                let raw = opts
                    .string("algorithm")?
                    .ok_or_else(|| SearchError::schema(&name, "vector fields require an algorithm"))?;
                let algorithm = VectorAlgorithm::parse(&raw).ok_or_else(|| {
                    SearchError::schema(
                        &name,
                        format!("invalid vector algorithm '{raw}', expected FLAT, HNSW or SVS-VAMANA"),
                    )
                })?;
                let mut vector = VectorOptions::new(algorithm);
                match options.get("attributes") {
                    None | Some(Value::Null) => {}
                    Some(Value::Object(attrs)) => {
                        for (key, value) in attrs {
                            let value = match value {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            };
                            vector = vector.attribute(key, value);
                        }
                    }
                    Some(other) => {
                        return Err(SearchError::schema(
                            &name,
                            format!("attributes must be an object, got {other}"),
                        ))
                    }
                }
                if opts.flag("index_missing")? {
                    vector = vector.index_missing();
                }
                FieldKind::Vector(vector)
            }
        };

        Ok(Self { name, alias, kind })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Whether a document key refers to this field: the name, the alias, or
    /// the name without a leading `$.` JSON path marker.
    pub fn matches(&self, key: &str) -> bool {
        self.name == key
            || self.alias.as_deref() == Some(key)
            || self.name.strip_prefix("$.") == Some(key)
    }

    /// Schema tokens for this field.
    pub fn to_args(&self) -> Vec<Token> {
        let mut args = vec![Token::from(&self.name)];
        if let Some(alias) = &self.alias {
            args.push("AS".into());
            args.push(alias.into());
        }
        args.push(self.field_type().as_str().into());

        match &self.kind {
            FieldKind::Text(o) => {
                if o.no_stem {
                    args.push("NOSTEM".into());
                }
                if let Some(weight) = o.weight {
                    args.push("WEIGHT".into());
                    args.push(weight.into());
                }
                if let Some(phonetic) = o.phonetic {
                    args.push("PHONETIC".into());
                    args.push(phonetic.as_str().into());
                }
            }
            FieldKind::Tag(o) => {
                if let Some(separator) = &o.separator {
                    args.push("SEPARATOR".into());
                    args.push(separator.into());
                }
                if o.case_sensitive {
                    args.push("CASESENSITIVE".into());
                }
            }
            FieldKind::Numeric(_) | FieldKind::Geo(_) => {}
            FieldKind::GeoShape(coord) => args.push(coord.as_str().into()),
            FieldKind::Vector(o) => {
                args.push(o.algorithm.as_str().into());
                args.push((o.attributes.len() * 2).into());
                for (key, value) in &o.attributes {
                    args.push(key.into());
                    args.push(value.into());
                }
            }
        }

        self.kind.suffix().write(&mut args);
        args
    }
}

/// Reject any option key not in the allow-list for `field_type`.
pub(crate) fn validate_option_names(
    field_type: FieldType,
    field: &str,
    options: &Map<String, Value>,
) -> Result<()> {
    let allowed = field_type.allowed_options();
    let unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|k| *k != "as" && !allowed.contains(k))
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(SearchError::schema(
            field,
            format!(
                "unknown {} field option(s): {}",
                field_type.as_str().to_ascii_lowercase(),
                unknown.join(", ")
            ),
        ))
    }
}

struct OptionReader<'a> {
    field: &'a str,
    options: &'a Map<String, Value>,
}

impl OptionReader<'_> {
    fn flag(&self, key: &str) -> Result<bool> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(SearchError::schema(
                self.field,
                format!("option '{key}' must be a boolean, got {other}"),
            )),
        }
    }

    fn number(&self, key: &str) -> Result<Option<f64>> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(SearchError::schema(
                self.field,
                format!("option '{key}' must be a number, got {other}"),
            )),
        }
    }

    fn string(&self, key: &str) -> Result<Option<String>> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(SearchError::schema(
                self.field,
                format!("option '{key}' must be a string, got {other}"),
            )),
        }
    }
}
