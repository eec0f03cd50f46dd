//! Shell-like tokenizing of the container command.
//!
//! Whitespace separates tokens. Single quotes keep their content literally,
//! double quotes allow `\"` and `\\` escapes, and a backslash outside quotes
//! escapes the next character. No variable expansion is performed.

use crate::error::PropertyError;

use super::ParseResult;

/// Splits `input` into tokens.
///
/// # Errors
///
/// Returns a description of the problem when a quote is left open or the
/// input ends with a lone backslash.
pub fn tokenize(input: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes an empty quoted token ("") from no token at all.
    let mut in_token = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(other) => current.push(other),
                        None => return Err(String::from("unmatched single quote")),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(String::from("unmatched double quote")),
                        },
                        Some(other) => current.push(other),
                        None => return Err(String::from("unmatched double quote")),
                    }
                }
            }
            '\\' => match chars.next() {
                Some(escaped) => {
                    in_token = true;
                    current.push(escaped);
                }
                None => return Err(String::from("trailing backslash")),
            },
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Parses the container command. A blank command yields `None`.
///
/// # Errors
///
/// Returns a malformed value error when quoting is unbalanced.
pub fn parse_container_command(key: &str, raw: &str) -> ParseResult<Option<Vec<String>>> {
    tokenize(raw)
        .map(|tokens| (!tokens.is_empty()).then_some(tokens))
        .map_err(|reason| vec![PropertyError::malformed(key, raw.trim(), reason)])
}
