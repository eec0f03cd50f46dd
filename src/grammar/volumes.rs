//! Volume mount lists: `volumeName:mountPath[:readOnly],...`.

use crate::error::PropertyError;
use crate::resolver::VolumeMount;

use super::{ParseResult, finish, list_entries};

const EXPECTED: &str = "expected 'volumeName:mountPath[:readOnly]'";

/// Parses volume mounts, preserving order.
///
/// `readOnly` defaults to `false` and must be `true` or `false` in any case.
/// Two mounts on the same path are a conflict.
///
/// # Errors
///
/// Returns every malformed or conflicting entry.
pub fn parse_volume_mounts(key: &str, raw: &str) -> ParseResult<Vec<VolumeMount>> {
    let mut mounts: Vec<VolumeMount> = Vec::new();
    let mut errors = Vec::new();

    for entry in list_entries(raw) {
        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();

        let read_only = match parts.as_slice() {
            [_, _] => false,
            [_, _, flag] if flag.eq_ignore_ascii_case("true") => true,
            [_, _, flag] if flag.eq_ignore_ascii_case("false") => false,
            [_, _, flag] => {
                errors.push(PropertyError::malformed(
                    key,
                    *flag,
                    format!("readOnly flag of '{entry}' must be 'true' or 'false'"),
                ));
                continue;
            }
            _ => {
                errors.push(PropertyError::malformed(key, entry, EXPECTED));
                continue;
            }
        };

        let (name, mount_path) = (parts[0], parts[1]);
        if name.is_empty() || mount_path.is_empty() {
            errors.push(PropertyError::malformed(key, entry, EXPECTED));
            continue;
        }

        if mounts.iter().any(|m| m.mount_path == mount_path) {
            errors.push(PropertyError::conflicting(
                key,
                entry,
                format!("mount path '{mount_path}' used more than once"),
            ));
            continue;
        }

        mounts.push(VolumeMount {
            name: name.to_string(),
            mount_path: mount_path.to_string(),
            read_only,
        });
    }

    finish(mounts, errors)
}
