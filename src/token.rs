// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Command tokens.
//!
//! Every compiler in this crate produces a flat `Vec<Token>`. A token is a
//! binary-safe byte string so that vector blobs can travel next to keywords
//! and field names without a second representation.
//!
//! ```
//! use redisearch_builder::Token;
//!
//! let args: Vec<Token> = vec!["LIMIT".into(), 0u64.into(), 10u64.into()];
//! assert_eq!(args, ["LIMIT", "0", "10"]);
//! assert_eq!(Token::from(2.5f64), "2.5");
//! assert_eq!(Token::from(f64::NEG_INFINITY), "-inf");
//! ```

use std::borrow::Cow;
use std::fmt;

/// A single command argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(Vec<u8>);

impl Token {
    /// Wrap raw bytes (vector blobs, binary payloads).
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lossy UTF-8 view, used for logging and prefix translation.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Format a float the way the engine expects: integral values without a
/// fractional part, infinities as `+inf` / `-inf`.
pub(crate) fn format_number(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}

/// Pack a float vector as a little-endian FLOAT32 blob.
pub fn f32_blob(vector: &[f32]) -> Token {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for v in vector {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    Token(bytes)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&String> for Token {
    fn from(value: &String) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Token {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<f64> for Token {
    fn from(value: f64) -> Self {
        Self(format_number(value).into_bytes())
    }
}

impl From<f32> for Token {
    fn from(value: f32) -> Self {
        Self::from(value as f64)
    }
}

macro_rules! token_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Token {
                fn from(value: $t) -> Self {
                    Self(value.to_string().into_bytes())
                }
            }
        )*
    };
}

token_from_integer!(u8, u16, u32, u64, usize, i32, i64);

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<String> for Token {
    fn eq(&self, other: &String) -> bool {
        self.0 == other.as_bytes()
    }
}

impl redis::ToRedisArgs for Token {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + redis::RedisWrite,
    {
        out.write_arg(&self.0);
    }
}

/// Append `<n> item...` where `n` is the number of items.
pub(crate) fn push_counted<I, T>(args: &mut Vec<Token>, items: I)
where
    I: IntoIterator<Item = T>,
    T: Into<Token>,
{
    let items: Vec<Token> = items.into_iter().map(Into::into).collect();
    args.push(items.len().into());
    args.extend(items);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_floats_have_no_fraction() {
        assert_eq!(Token::from(30.0f64), "30");
        assert_eq!(Token::from(0.5f64), "0.5");
        assert_eq!(Token::from(f64::INFINITY), "+inf");
    }

    #[test]
    fn test_blob_is_little_endian() {
        let blob = f32_blob(&[1.0]);
        assert_eq!(blob.as_bytes(), &1.0f32.to_le_bytes());
    }

    #[test]
    fn test_push_counted() {
        let mut args = vec![Token::from("RETURN")];
        push_counted(&mut args, ["a", "b"]);
        assert_eq!(args, ["RETURN", "2", "a", "b"]);
    }
}
