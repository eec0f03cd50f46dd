//! Delimited pair lists: node selectors, labels and environment variables.

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::PropertyError;

use super::{ParseResult, finish, list_entries};

/// Splits an entry on the first `separator`, trimming both sides.
fn split_pair(entry: &str, separator: char) -> Option<(&str, &str)> {
    entry
        .split_once(separator)
        .map(|(key, value)| (key.trim(), value.trim()))
}

/// Parses `label: value` pairs, e.g. `region: primary,role:processor`.
///
/// Order is preserved. A missing `:` or an empty label is malformed, a label
/// given twice is a conflict.
///
/// # Errors
///
/// Returns every malformed or duplicated entry.
pub fn parse_node_selector(key: &str, raw: &str) -> ParseResult<Vec<(String, String)>> {
    let mut selector: Vec<(String, String)> = Vec::new();
    let mut errors = Vec::new();

    for entry in list_entries(raw) {
        match split_pair(entry, ':') {
            None => errors.push(PropertyError::malformed(key, entry, "expected 'label:value'")),
            Some(("", _)) => errors.push(PropertyError::malformed(key, entry, "label is empty")),
            Some((label, value)) => {
                if selector.iter().any(|(existing, _)| existing == label) {
                    errors.push(PropertyError::conflicting(
                        key,
                        entry,
                        format!("node selector label '{label}' given more than once"),
                    ));
                } else {
                    selector.push((label.to_string(), value.to_string()));
                }
            }
        }
    }

    finish(selector, errors)
}

/// Parses `key=value` labels, e.g. `groupName=test,someLabel=value`.
///
/// Labels drive selection, so a key given twice is a conflict instead of a
/// silent overwrite.
///
/// # Errors
///
/// Returns every malformed or duplicated entry.
pub fn parse_labels(key: &str, raw: &str) -> ParseResult<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    let mut errors = Vec::new();

    for entry in list_entries(raw) {
        match split_pair(entry, '=') {
            None => errors.push(PropertyError::malformed(key, entry, "expected 'key=value'")),
            Some(("", _)) => errors.push(PropertyError::malformed(key, entry, "label key is empty")),
            Some((name, value)) => {
                if labels.contains_key(name) {
                    errors.push(PropertyError::conflicting(
                        key,
                        entry,
                        format!("duplicate label key '{name}'"),
                    ));
                } else {
                    labels.insert(name.to_string(), value.to_string());
                }
            }
        }
    }

    finish(labels, errors)
}

/// Parses `NAME=value` environment variables.
///
/// Same grammar as labels, but a name given twice keeps its first position and
/// takes the last value.
///
/// # Errors
///
/// Returns every malformed entry.
pub fn parse_environment_variables(key: &str, raw: &str) -> ParseResult<Vec<(String, String)>> {
    let mut variables: Vec<(String, String)> = Vec::new();
    let mut errors = Vec::new();

    for entry in list_entries(raw) {
        match split_pair(entry, '=') {
            None => errors.push(PropertyError::malformed(key, entry, "expected 'NAME=value'")),
            Some(("", _)) => {
                errors.push(PropertyError::malformed(key, entry, "variable name is empty"));
            }
            Some((name, value)) => {
                if let Some(existing) = variables.iter_mut().find(|(n, _)| n == name) {
                    debug!("Environment variable {name} redefined, last value wins");
                    existing.1 = value.to_string();
                } else {
                    variables.push((name.to_string(), value.to_string()));
                }
            }
        }
    }

    finish(variables, errors)
}
