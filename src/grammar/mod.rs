//! Parsers for the compound property grammars.
//!
//! Every parser takes the key name (for error reporting) and the raw string,
//! and returns either a fully-formed value or every problem found in it.
//! Malformed entries are never dropped silently.

mod command;
mod pairs;
mod ports;
mod volumes;

pub use command::{parse_container_command, tokenize};
pub use pairs::{parse_environment_variables, parse_labels, parse_node_selector};
pub use ports::{NodePortRequest, parse_container_ports, parse_node_port};
pub use volumes::parse_volume_mounts;

use crate::error::PropertyError;
use crate::resolver::EntryPointStyle;

/// Outcome of parsing one property value.
pub type ParseResult<T> = Result<T, Vec<PropertyError>>;

/// Splits a comma separated list, trimming entries and skipping empty ones.
pub(crate) fn list_entries(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Turns collected errors into a parse result.
pub(crate) fn finish<T>(value: T, errors: Vec<PropertyError>) -> ParseResult<T> {
    if errors.is_empty() { Ok(value) } else { Err(errors) }
}

/// Parses a boolean literal, `true` or `false` in any case.
///
/// # Errors
///
/// Returns a malformed value error for any other literal.
pub fn parse_bool(key: &str, raw: &str) -> ParseResult<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(vec![PropertyError::malformed(key, value, "expected 'true' or 'false'")])
    }
}

/// Parses an entry point style name.
///
/// # Errors
///
/// Returns a malformed value error for an unknown style.
pub fn parse_entry_point_style(key: &str, raw: &str) -> ParseResult<EntryPointStyle> {
    let value = raw.trim();
    value.parse::<EntryPointStyle>().map_err(|()| {
        vec![PropertyError::malformed(key, value, "expected one of 'exec', 'shell', 'boot'")]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_entries_skips_empty() {
        let entries: Vec<_> = list_entries(" a ,,b, ,c,").collect();
        assert_eq!(entries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("k", "TRUE"), Ok(true));
        assert_eq!(parse_bool("k", " false "), Ok(false));

        let errors = parse_bool("k", "yes").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].value(), "yes");
    }

    #[test]
    fn test_parse_entry_point_style() {
        assert_eq!(parse_entry_point_style("k", "Shell"), Ok(EntryPointStyle::Shell));
        assert_eq!(parse_entry_point_style("k", "boot"), Ok(EntryPointStyle::Boot));
        assert!(parse_entry_point_style("k", "cmd").is_err());
    }
}
