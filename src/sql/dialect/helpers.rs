//! Shared helper functions for dialect profiles.
//!
//! Reusable building blocks that the per-vendor profile builders and the
//! range strategies compose, so each vendor file only states its differences.

use std::collections::BTreeSet;

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Generic, PostgreSQL, Oracle, DB2
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: SQL Server
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Generic, PostgreSQL
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: Oracle, DB2, MySQL, SQL Server
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Substitute `{0}`, `{1}`, ... placeholders in a function template.
///
/// Placeholders without a matching argument are left untouched.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)))
            .and_then(|(i, close)| args.get(i).map(|a| (*a, close)));
        match arg {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Upper-cased word set from a static list.
pub fn word_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_ascii_uppercase()).collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit ` LIMIT n OFFSET m`.
/// Used by: PostgreSQL
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.space().push(Token::Limit).space().push(Token::Count(lim));
    }

    if let Some(off) = offset {
        ts.space().push(Token::Offset).space().push(Token::Count(off));
    }

    ts
}

/// Emit ` LIMIT n` or ` LIMIT start, n`.
/// Used by: MySQL
pub fn emit_limit_start_count(start: u64, count: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.space().push(Token::Limit).space();
    if start > 0 {
        ts.push(Token::Count(start)).comma().space();
    }
    ts.push(Token::Count(count));
    ts
}

/// Emit ` FETCH FIRST n ROWS ONLY`.
/// Used by: DB2
pub fn emit_fetch_first(count: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.space()
        .push(Token::Fetch)
        .space()
        .push(Token::First)
        .space()
        .push(Token::Count(count))
        .space()
        .push(Token::Rows)
        .space()
        .push(Token::Only);
    ts
}

/// Emit ` TOP n`.
/// Used by: SQL Server
pub fn emit_top(count: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.space().push(Token::Top).space().push(Token::Count(count));
    ts
}
