//! Lexical classes of input tokens
//!
//! Input is one whitespace-delimited token at a time; there is no grammar
//! beyond these fixed classes, checked in priority order:
//!
//! 1. a single ASCII digit
//! 2. `-?[0-9][0-9.]*` (a number literal)
//! 3. `$$name` (symbol literal)
//! 4. `$name` (variable reference)
//! 5. `@N` (stack reference, N counted from the top)
//! 6. `"text"` (string literal)
//! 7. anything else is a command name

use crate::error::{CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    Number(f64),
    Symbol(&'a str),
    Variable(&'a str),
    StackRef(usize),
    Str(&'a str),
    Command(&'a str),
}

fn is_number_literal(token: &str) -> bool {
    let bytes = token.as_bytes();
    let Some((&first, rest)) = bytes.split_first() else {
        return false;
    };
    let leads = first.is_ascii_digit() || (first == b'-' && !rest.is_empty());
    leads && rest.iter().all(|&c| c.is_ascii_digit() || c == b'.')
}

fn name_after<'a>(token: &'a str, prefix: &str) -> Result<&'a str> {
    match token.strip_prefix(prefix) {
        Some("") | None => Err(CalcError::ParseError(format!(
            "expected variable name after '{}'",
            prefix
        ))),
        Some(name) => Ok(name),
    }
}

/// Classify one token
pub fn classify(token: &str) -> Result<Token<'_>> {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return Err(CalcError::ParseError("empty token".to_string()));
    }

    if bytes.len() == 1 && bytes[0].is_ascii_digit() {
        return Ok(Token::Number(f64::from(bytes[0] - b'0')));
    }

    if is_number_literal(token) {
        return token
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| CalcError::ParseError(format!("malformed number: {}", token)));
    }

    if token.starts_with("$$") {
        return name_after(token, "$$").map(Token::Symbol);
    }

    if token.starts_with('$') {
        return name_after(token, "$").map(Token::Variable);
    }

    if let Some(index) = token.strip_prefix('@') {
        if index.is_empty() || !index.bytes().all(|c| c.is_ascii_digit()) {
            return Err(CalcError::ParseError(format!(
                "expected stack index: {}",
                token
            )));
        }
        return index
            .parse::<usize>()
            .map(Token::StackRef)
            .map_err(|_| CalcError::ParseError(format!("stack index too large: {}", token)));
    }

    if token.starts_with('"') {
        if bytes.len() < 2 || !token.ends_with('"') {
            return Err(CalcError::UnterminatedString(token.to_string()));
        }
        return Ok(Token::Str(&token[1..token.len() - 1]));
    }

    Ok(Token::Command(token))
}
