// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Predicate tree.
//!
//! Leaf predicates render to RediSearch field-query syntax and are grouped
//! into AND / OR collections:
//!
//! ```text
//! (@city:{NY})                      - Tag equality
//! (@title:hello*)                   - Text match
//! (@age:[30 35])                    - Numeric range
//! ((@city:{NY}) (@age:[30 35]))     - AND (space-joined)
//! ((@city:{NY}) | (@city:{LA}))     - OR (pipe-joined)
//! ```
//!
//! Nesting is handled with an explicit scope stack ([`PredicateScopes`]):
//! `open` pushes a collection, predicates go to the top of the stack,
//! `close` pops and attaches the finished collection to its parent.

use crate::error::{Result, SearchError};
use crate::token::format_number;

/// Leaf boolean test.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `(@field:{value})`, value passed through verbatim
    TagEquality { field: String, value: String },
    /// `(@field:pattern)`, pattern passed through verbatim
    TextMatch { field: String, pattern: String },
    /// `(@field:[min max])`, infinities render as `-inf` / `+inf`
    NumericRange { field: String, min: f64, max: f64 },
}

impl Predicate {
    /// Tag match in raw tag syntax, so `NY | LA` and `San*` keep their meaning.
    pub fn tag(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::TagEquality {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Tag match on a literal value: punctuation and spaces are escaped.
    pub fn tag_escaped(field: impl Into<String>, value: &str) -> Self {
        Predicate::TagEquality {
            field: field.into(),
            value: escape_tag_value(value),
        }
    }

    pub fn text(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::TextMatch {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn numeric(field: impl Into<String>, min: f64, max: f64) -> Self {
        Predicate::NumericRange {
            field: field.into(),
            min,
            max,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Predicate::TagEquality { field, value } => {
                format!("(@{}:{{{}}})", field, value)
            }
            Predicate::TextMatch { field, pattern } => format!("(@{}:{})", field, pattern),
            Predicate::NumericRange { field, min, max } => {
                format!("(@{}:[{} {}])", field, format_number(*min), format_number(*max))
            }
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Boolean connective of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    fn separator(self) -> &'static str {
        match self {
            Connective::And => " ",
            Connective::Or => " | ",
        }
    }
}

/// Child of a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    Leaf(Predicate),
    Group(PredicateCollection),
}

impl From<Predicate> for PredicateNode {
    fn from(p: Predicate) -> Self {
        PredicateNode::Leaf(p)
    }
}

impl From<PredicateCollection> for PredicateNode {
    fn from(c: PredicateCollection) -> Self {
        PredicateNode::Group(c)
    }
}

/// AND / OR group of predicates and nested groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredicateCollection {
    connective: Connective,
    children: Vec<PredicateNode>,
}

impl PredicateCollection {
    pub fn new(connective: Connective) -> Self {
        Self {
            connective,
            children: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(Connective::And)
    }

    pub fn or() -> Self {
        Self::new(Connective::Or)
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn add(&mut self, node: impl Into<PredicateNode>) {
        self.children.push(node.into());
    }

    /// Consuming variant of [`add`](Self::add).
    pub fn with(mut self, node: impl Into<PredicateNode>) -> Self {
        self.add(node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children joined by the connective, wrapped in parentheses. Empty
    /// collections render as an empty string; callers substitute a base.
    pub fn render(&self) -> String {
        if self.children.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .children
            .iter()
            .map(|child| match child {
                PredicateNode::Leaf(p) => p.render(),
                PredicateNode::Group(c) => c.render(),
            })
            .collect();
        format!("({})", parts.join(self.connective.separator()))
    }

    /// Query string: the rendered tree, or `base` (default `*`) when empty.
    pub fn to_query_string(&self, base: Option<&str>) -> String {
        if self.children.is_empty() {
            base.unwrap_or("*").to_string()
        } else {
            self.render()
        }
    }
}

/// Stack of open collections; the bottom entry is the root AND.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateScopes {
    stack: Vec<PredicateCollection>,
}

impl Default for PredicateScopes {
    fn default() -> Self {
        Self {
            stack: vec![PredicateCollection::and()],
        }
    }
}

impl PredicateScopes {
    /// Start from an existing root collection.
    pub fn with_root(root: PredicateCollection) -> Self {
        Self { stack: vec![root] }
    }

    /// Append to the currently open collection.
    pub fn add(&mut self, node: impl Into<PredicateNode>) {
        if let Some(top) = self.stack.last_mut() {
            top.add(node);
        }
    }

    /// Push a new collection; subsequent adds go into it.
    pub fn open(&mut self, connective: Connective) {
        self.stack.push(PredicateCollection::new(connective));
    }

    /// Pop the current collection and attach it to its parent.
    pub fn close(&mut self) -> Result<()> {
        if self.stack.len() < 2 {
            return Err(SearchError::QueryBuilder(
                "close() called with no open predicate collection".into(),
            ));
        }
        if let Some(finished) = self.stack.pop() {
            self.add(finished);
        }
        Ok(())
    }

    /// Number of collections opened and not yet closed.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// The root collection; fails while scopes remain open.
    pub fn root(&self) -> Result<&PredicateCollection> {
        if self.depth() > 0 {
            return Err(SearchError::QueryBuilder(format!(
                "{} predicate collection(s) left open",
                self.depth()
            )));
        }
        Ok(&self.stack[0])
    }
}

/// Escape tag punctuation and whitespace.
pub fn escape_tag_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ',' | '.' | '<' | '>' | '{' | '}' | '[' | ']' | '"' | '\'' | ':' | ';' | '!' | '@'
            | '#' | '$' | '%' | '^' | '&' | '*' | '(' | ')' | '-' | '+' | '=' | '~' | '|' | '/'
            | '\\' | ' ' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_syntax() {
        assert_eq!(Predicate::tag("city", "NY").render(), "(@city:{NY})");
        assert_eq!(Predicate::text("title", "hello*").render(), "(@title:hello*)");
        assert_eq!(Predicate::numeric("age", 30.0, 35.0).render(), "(@age:[30 35])");
    }

    #[test]
    fn test_numeric_infinity() {
        let p = Predicate::numeric("price", f64::NEG_INFINITY, 100.0);
        assert_eq!(p.render(), "(@price:[-inf 100])");
    }

    #[test]
    fn test_and_collection() {
        let c = PredicateCollection::and()
            .with(Predicate::tag("city", "NY"))
            .with(Predicate::numeric("age", 30.0, 35.0));
        assert_eq!(c.render(), "((@city:{NY}) (@age:[30 35]))");
    }

    #[test]
    fn test_or_collection() {
        let c = PredicateCollection::or()
            .with(Predicate::tag("city", "NY"))
            .with(Predicate::tag("city", "LA"));
        assert_eq!(c.render(), "((@city:{NY}) | (@city:{LA}))");
    }

    #[test]
    fn test_empty_root_uses_wildcard_or_base() {
        let c = PredicateCollection::and();
        assert_eq!(c.to_query_string(None), "*");
        assert_eq!(c.to_query_string(Some("@title:bike")), "@title:bike");
    }

    #[test]
    fn test_tag_value_verbatim() {
        assert_eq!(Predicate::tag("city", "NY | LA").render(), "(@city:{NY | LA})");
        assert_eq!(Predicate::tag("city", "San*").render(), "(@city:{San*})");
        // already escaped by the caller, left alone
        assert_eq!(Predicate::tag("city", "New\\ York").render(), "(@city:{New\\ York})");
    }

    #[test]
    fn test_tag_escaping() {
        assert_eq!(Predicate::tag_escaped("city", "New York").render(), "(@city:{New\\ York})");
        assert_eq!(Predicate::tag_escaped("email", "a@b.com").render(), "(@email:{a\\@b\\.com})");
        assert_eq!(Predicate::tag_escaped("city", "NY | LA").render(), "(@city:{NY\\ \\|\\ LA})");
    }

    #[test]
    fn test_scope_stack_nesting() {
        let mut scopes = PredicateScopes::default();
        scopes.add(Predicate::tag("city", "NY"));
        scopes.open(Connective::Or);
        scopes.add(Predicate::numeric("age", 30.0, 35.0));
        scopes.open(Connective::And);
        scopes.add(Predicate::text("name", "jo*"));
        scopes.add(Predicate::tag("role", "admin"));
        scopes.close().unwrap();
        scopes.close().unwrap();

        assert_eq!(
            scopes.root().unwrap().render(),
            "((@city:{NY}) ((@age:[30 35]) | ((@name:jo*) (@role:{admin}))))"
        );
    }

    #[test]
    fn test_unbalanced_scopes_fail() {
        let mut scopes = PredicateScopes::default();
        assert!(matches!(scopes.close(), Err(SearchError::QueryBuilder(_))));

        scopes.open(Connective::Or);
        assert!(matches!(scopes.root(), Err(SearchError::QueryBuilder(_))));
    }
}
