// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Cursor options shared by `FT.AGGREGATE` and `FT.HYBRID`, and the
//! `FT.CURSOR` continuation commands.

use crate::token::Token;

/// `WITHCURSOR [COUNT n] [MAXIDLE ms]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorOptions {
    pub count: Option<u64>,
    pub max_idle: Option<u64>,
}

impl CursorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Idle timeout in milliseconds.
    pub fn max_idle(mut self, millis: u64) -> Self {
        self.max_idle = Some(millis);
        self
    }

    pub fn write(&self, args: &mut Vec<Token>) {
        args.push("WITHCURSOR".into());
        if let Some(count) = self.count {
            args.push("COUNT".into());
            args.push(count.into());
        }
        if let Some(max_idle) = self.max_idle {
            args.push("MAXIDLE".into());
            args.push(max_idle.into());
        }
    }
}

/// `FT.CURSOR READ <index> <cursor> [MAXIDLE ms] [COUNT n]`
pub fn cursor_read_command(
    index: &str,
    cursor_id: u64,
    max_idle: Option<u64>,
    count: Option<u64>,
) -> Vec<Token> {
    let mut args: Vec<Token> = vec!["FT.CURSOR".into(), "READ".into(), index.into(), cursor_id.into()];
    if let Some(max_idle) = max_idle {
        args.push("MAXIDLE".into());
        args.push(max_idle.into());
    }
    if let Some(count) = count {
        args.push("COUNT".into());
        args.push(count.into());
    }
    args
}

/// `FT.CURSOR DEL <index> <cursor>`
pub fn cursor_del_command(index: &str, cursor_id: u64) -> Vec<Token> {
    vec!["FT.CURSOR".into(), "DEL".into(), index.into(), cursor_id.into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_cursor_tokens() {
        let mut args = Vec::new();
        CursorOptions::new().max_idle(300).count(50).write(&mut args);
        assert_eq!(args, ["WITHCURSOR", "COUNT", "50", "MAXIDLE", "300"]);
    }

    #[test]
    fn test_cursor_read() {
        assert_eq!(
            cursor_read_command("idx", 42, Some(1000), Some(10)),
            ["FT.CURSOR", "READ", "idx", "42", "MAXIDLE", "1000", "COUNT", "10"]
        );
        assert_eq!(cursor_del_command("idx", 42), ["FT.CURSOR", "DEL", "idx", "42"]);
    }
}
