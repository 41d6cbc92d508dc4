//! Identifier handling for table and column names.
//!
//! Identifiers are never bound as parameters (Postgres cannot parameterize
//! them), so they are validated and rendered here before they reach the
//! statement text.
//!
//! - Unquoted parts must match `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts allow any character except NUL; `"` is escaped as `""`
//!
//! [`format_table_name_with_quotes`] and [`prepare_column`] are the two
//! entry points used by the UPDATE builder. Both are idempotent: feeding
//! their output back in yields the same string.

use crate::error::{StmtError, StmtResult};

/// A part of a dotted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Bare identifier, written as-is.
    Unquoted(String),
    /// Delimited identifier, written inside double quotes.
    Quoted(String),
}

/// A validated SQL identifier such as `users`, `public.users` or `"Order"."Id"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse a dotted identifier, allowing quoted parts.
    pub fn parse(s: &str) -> StmtResult<Self> {
        if s.is_empty() {
            return Err(StmtError::invalid_identifier("identifier cannot be empty"));
        }
        reject_nul(s)?;

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        loop {
            let part = if chars.peek() == Some(&'"') {
                chars.next();
                parse_quoted(&mut chars)?
            } else {
                parse_unquoted(&mut chars)?
            };
            parts.push(part);

            match chars.next() {
                None => break,
                Some('.') if chars.peek().is_some() => continue,
                Some('.') => {
                    return Err(StmtError::invalid_identifier(format!(
                        "trailing '.' in identifier '{s}'"
                    )));
                }
                Some(c) => {
                    return Err(StmtError::invalid_identifier(format!(
                        "expected '.' between identifier parts in '{s}', got '{c}'"
                    )));
                }
            }
        }

        Ok(Self { parts })
    }

    /// Render the identifier exactly as parsed.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.rendered_len());
        self.write_sql(&mut out, false);
        out
    }

    /// Render the identifier with every part quoted.
    pub fn to_quoted_sql(&self) -> String {
        let mut out = String::with_capacity(self.rendered_len() + 2 * self.parts.len());
        self.write_sql(&mut out, true);
        out
    }

    fn rendered_len(&self) -> usize {
        let dots = self.parts.len().saturating_sub(1);
        self.parts
            .iter()
            .map(|p| match p {
                IdentPart::Unquoted(s) => s.len(),
                IdentPart::Quoted(s) => s.len() + 2,
            })
            .sum::<usize>()
            + dots
    }

    fn write_sql(&self, out: &mut String, force_quotes: bool) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) if !force_quotes => out.push_str(s),
                IdentPart::Unquoted(s) | IdentPart::Quoted(s) => write_quoted(out, s),
            }
        }
    }
}

fn reject_nul(s: &str) -> StmtResult<()> {
    if s.contains('\0') {
        return Err(StmtError::invalid_identifier(
            "identifier cannot contain NUL character",
        ));
    }
    Ok(())
}

fn parse_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> StmtResult<IdentPart> {
    let mut name = String::new();
    loop {
        match chars.next() {
            Some('"') if chars.peek() == Some(&'"') => {
                chars.next();
                name.push('"');
            }
            Some('"') => break,
            Some(c) => name.push(c),
            None => return Err(StmtError::invalid_identifier("unclosed quoted identifier")),
        }
    }
    if name.is_empty() {
        return Err(StmtError::invalid_identifier("empty quoted identifier"));
    }
    Ok(IdentPart::Quoted(name))
}

fn parse_unquoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> StmtResult<IdentPart> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c == '.' {
            break;
        }
        let ok = if name.is_empty() {
            c == '_' || c.is_ascii_alphabetic()
        } else {
            c == '_' || c == '$' || c.is_ascii_alphanumeric()
        };
        if !ok {
            return Err(StmtError::invalid_identifier(format!(
                "invalid character '{c}' in identifier"
            )));
        }
        name.push(c);
        chars.next();
    }
    if name.is_empty() {
        return Err(StmtError::invalid_identifier("empty identifier segment"));
    }
    Ok(IdentPart::Unquoted(name))
}

fn write_quoted(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Quote a table name for embedding after `UPDATE`.
///
/// Every dotted part is quoted: `public.users` becomes `"public"."users"`.
pub fn format_table_name_with_quotes(table: &str) -> StmtResult<String> {
    if table.trim().is_empty() {
        return Err(StmtError::malformed("table", "table name is empty"));
    }
    Ok(Ident::parse(table)?.to_quoted_sql())
}

/// Validate a column name and render it for a SET or WHERE clause.
///
/// Bare names stay bare, quoted names stay quoted.
pub fn prepare_column(column: &str) -> StmtResult<String> {
    if column.trim().is_empty() {
        return Err(StmtError::malformed("column", "column name is empty"));
    }
    Ok(Ident::parse(column)?.to_sql())
}
