//! Port grammars: the extra container port list and the NodePort toggle.

use std::collections::BTreeSet;

use crate::error::PropertyError;

use super::{ParseResult, finish, list_entries};

const MIN_PORT: u32 = 1;
const MAX_PORT: u32 = 65535;

/// What the NodePort property asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePortRequest {
    /// `true`: let the cluster assign a port.
    Auto,
    /// A specific port number.
    Port(u16),
}

/// Parses a port number in `1..=65535`.
///
/// Only an optional single `-` followed by digits counts as an integer; any
/// other token is malformed rather than out of range.
fn parse_port(key: &str, token: &str) -> Result<u16, PropertyError> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PropertyError::malformed(key, token, "expected a decimal port number"));
    }

    token
        .parse::<i64>()
        .ok()
        .and_then(|number| u16::try_from(number).ok())
        .filter(|port| *port >= 1)
        .ok_or_else(|| PropertyError::out_of_range(key, token, MIN_PORT, MAX_PORT))
}

/// Parses a comma separated list of ports into a set. Duplicates collapse.
///
/// # Errors
///
/// Returns a malformed error for each non-numeric entry and an out of range
/// error for each entry outside `1..=65535`.
pub fn parse_container_ports(key: &str, raw: &str) -> ParseResult<BTreeSet<u16>> {
    let mut ports = BTreeSet::new();
    let mut errors = Vec::new();

    for entry in list_entries(raw) {
        match parse_port(key, entry) {
            Ok(port) => {
                ports.insert(port);
            }
            Err(e) => errors.push(e),
        }
    }

    finish(ports, errors)
}

/// Parses the NodePort property: `true` or a port number.
///
/// Only the 16-bit port range is checked here; the cluster's NodePort range is
/// enforced when the service is created.
///
/// # Errors
///
/// Returns a malformed error for any other literal and an out of range error
/// for numbers outside `1..=65535`.
pub fn parse_node_port(key: &str, raw: &str) -> ParseResult<NodePortRequest> {
    let value = raw.trim();

    if value.eq_ignore_ascii_case("true") {
        return Ok(NodePortRequest::Auto);
    }

    parse_port(key, value)
        .map(NodePortRequest::Port)
        .map_err(|e| match e {
            PropertyError::MalformedValue { key, value, .. } => vec![PropertyError::malformed(
                key,
                value,
                "expected 'true' or a port number",
            )],
            other => vec![other],
        })
}

impl NodePortRequest {
    /// Returns the explicit port, `None` for a cluster-assigned one.
    #[must_use]
    pub const fn port(self) -> Option<u16> {
        match self {
            Self::Port(port) => Some(port),
            Self::Auto => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyErrorKind;

    #[test]
    fn test_container_ports_dedup() {
        let ports = parse_container_ports("cp", "80,443,80").unwrap();
        assert_eq!(ports, BTreeSet::from([80, 443]));
    }

    #[test]
    fn test_container_ports_boundaries() {
        let errors = parse_container_ports("cp", "0,65536").unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind() == PropertyErrorKind::OutOfRange));
        assert_eq!(errors[0].value(), "0");
        assert_eq!(errors[1].value(), "65536");

        let ports = parse_container_ports("cp", "1,65535").unwrap();
        assert_eq!(ports, BTreeSet::from([1, 65535]));
    }

    #[test]
    fn test_container_ports_malformed() {
        let errors = parse_container_ports("cp", "80,http,-1,99999999999999999999,-,--5,8-0")
            .unwrap_err();

        let kinds: Vec<_> = errors.iter().map(PropertyError::kind).collect();
        assert_eq!(
            kinds,
            [
                PropertyErrorKind::MalformedValue,
                PropertyErrorKind::OutOfRange,
                PropertyErrorKind::OutOfRange,
                PropertyErrorKind::MalformedValue,
                PropertyErrorKind::MalformedValue,
                PropertyErrorKind::MalformedValue,
            ]
        );
        assert_eq!(errors[3].value(), "-");
        assert_eq!(errors[4].value(), "--5");
    }

    #[test]
    fn test_node_port_values() {
        assert_eq!(parse_node_port("np", "true"), Ok(NodePortRequest::Auto));
        assert_eq!(parse_node_port("np", "TRUE"), Ok(NodePortRequest::Auto));
        assert_eq!(parse_node_port("np", " 30080 "), Ok(NodePortRequest::Port(30080)));
    }

    #[test]
    fn test_node_port_false_is_malformed() {
        let errors = parse_node_port("np", "false").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), PropertyErrorKind::MalformedValue);
        assert_eq!(errors[0].value(), "false");
    }

    #[test]
    fn test_node_port_errors() {
        let errors = parse_node_port("np", "random").unwrap_err();
        assert_eq!(errors[0].kind(), PropertyErrorKind::MalformedValue);
        assert_eq!(errors[0].value(), "random");

        let errors = parse_node_port("np", "70000").unwrap_err();
        assert_eq!(errors[0].kind(), PropertyErrorKind::OutOfRange);
    }

    #[test]
    fn test_node_port_request_accessors() {
        assert_eq!(NodePortRequest::Port(30000).port(), Some(30000));
        assert_eq!(NodePortRequest::Auto.port(), None);
    }
}
