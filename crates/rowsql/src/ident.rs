//! SQL identifier validation for the parameterized builder.
//!
//! Identifiers (tables, columns) cannot be sent as bound parameters, so
//! [`Ident::parse`] accepts only a conservative grammar before they are pasted
//! into statement text:
//!
//! - unquoted parts match `[A-Za-z_][A-Za-z0-9_$]*`
//! - quoted parts (`"Mixed Case"`) allow anything but NUL, with `""` as escape
//! - parts are joined with `.` (`public.members`)

use crate::error::{Result, RowsqlError};
use std::fmt;

/// A validated, possibly dotted SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    parts: Vec<IdentPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IdentPart {
    Bare(String),
    Quoted(String),
}

impl Ident {
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(RowsqlError::validation("identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(RowsqlError::validation(
                "identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut rest = s;
        loop {
            let (part, tail) = if let Some(quoted) = rest.strip_prefix('"') {
                parse_quoted(quoted)?
            } else {
                parse_bare(rest)?
            };
            parts.push(part);

            if tail.is_empty() {
                break;
            }
            match tail.strip_prefix('.') {
                Some("") => {
                    return Err(RowsqlError::validation(format!(
                        "trailing '.' in identifier '{s}'"
                    )));
                }
                Some(next) => rest = next,
                None => {
                    return Err(RowsqlError::validation(format!(
                        "unexpected text after identifier part in '{s}'"
                    )));
                }
            }
        }

        Ok(Self { parts })
    }

    /// Render the identifier as SQL text.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

fn parse_bare(s: &str) -> Result<(IdentPart, &str)> {
    let end = s.find('.').unwrap_or(s.len());
    let (name, tail) = s.split_at(end);

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(RowsqlError::validation("empty identifier segment")),
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        Some(c) => {
            return Err(RowsqlError::validation(format!(
                "invalid identifier start character '{c}'"
            )));
        }
    }
    if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
        return Err(RowsqlError::validation(format!(
            "invalid character '{c}' in identifier '{name}'"
        )));
    }

    Ok((IdentPart::Bare(name.to_string()), tail))
}

/// `s` starts right after the opening quote.
fn parse_quoted(s: &str) -> Result<(IdentPart, &str)> {
    let mut name = String::new();
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '"' {
            name.push(c);
            continue;
        }
        if matches!(chars.peek(), Some((_, '"'))) {
            chars.next();
            name.push('"');
            continue;
        }
        if name.is_empty() {
            return Err(RowsqlError::validation("empty quoted identifier"));
        }
        return Ok((IdentPart::Quoted(name), &s[i + 1..]));
    }
    Err(RowsqlError::validation("unclosed quoted identifier"))
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match part {
                IdentPart::Bare(name) => f.write_str(name)?,
                IdentPart::Quoted(name) => write!(f, "\"{}\"", name.replace('"', "\"\""))?,
            }
        }
        Ok(())
    }
}
