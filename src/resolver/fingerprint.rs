//! Deterministic fingerprints of resolved configurations.
//!
//! Two equal configurations always produce the same fingerprint, and any
//! change to a field produces a different one. The deployer compares
//! fingerprints to decide whether a running deployment is out of date.

use sha2::{Digest, Sha256};

use super::model::{EntryPointStyle, Exposure, ResolvedDeploymentConfig};

/// SHA-256 fingerprint of a [`ResolvedDeploymentConfig`], hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigFingerprint(String);

/// Field separator; keeps `("ab", "c")` and `("a", "bc")` apart.
const SEP: [u8; 1] = [0x1f];

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update(value.as_bytes());
    hasher.update(SEP);
}

fn update_opt(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            update_str(hasher, v);
        }
        None => hasher.update([0u8]),
    }
}

fn update_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_be_bytes());
}

impl ConfigFingerprint {
    /// Computes the fingerprint of a resolved configuration.
    #[must_use]
    pub fn compute(config: &ResolvedDeploymentConfig) -> Self {
        let mut hasher = Sha256::new();

        hasher.update([u8::from(config.force_build)]);
        update_opt(&mut hasher, config.service_account.as_deref());
        update_opt(&mut hasher, config.image_tag.as_deref());
        update_opt(&mut hasher, config.dockerfile_override.as_deref());

        // Node selector order is significant
        update_len(&mut hasher, config.node_selector.len());
        for (label, value) in &config.node_selector {
            update_str(&mut hasher, label);
            update_str(&mut hasher, value);
        }

        update_opt(&mut hasher, config.route_host.as_deref());

        update_len(&mut hasher, config.volume_mounts.len());
        for mount in &config.volume_mounts {
            update_str(&mut hasher, &mount.name);
            update_str(&mut hasher, &mount.mount_path);
            hasher.update([u8::from(mount.read_only)]);
        }

        // BTreeMap iteration is already sorted
        update_len(&mut hasher, config.labels.len());
        for (key, value) in &config.labels {
            update_str(&mut hasher, key);
            update_str(&mut hasher, value);
        }

        match &config.exposure {
            Exposure::None => hasher.update([0u8]),
            Exposure::Route { host_override } => {
                hasher.update([1u8]);
                update_opt(&mut hasher, host_override.as_deref());
            }
            Exposure::NodePort { port } => {
                hasher.update([2u8]);
                hasher.update(port.unwrap_or(0).to_be_bytes());
            }
        }

        update_len(&mut hasher, config.environment_variables.len());
        for (name, value) in &config.environment_variables {
            update_str(&mut hasher, name);
            update_str(&mut hasher, value);
        }

        match &config.container_command {
            Some(tokens) => {
                update_len(&mut hasher, tokens.len() + 1);
                for token in tokens {
                    update_str(&mut hasher, token);
                }
            }
            None => update_len(&mut hasher, 0),
        }

        update_len(&mut hasher, config.container_ports.len());
        for port in &config.container_ports {
            hasher.update(port.to_be_bytes());
        }

        hasher.update([match config.entry_point_style {
            EntryPointStyle::Exec => 0u8,
            EntryPointStyle::Shell => 1,
            EntryPointStyle::Boot => 2,
        }]);

        update_opt(&mut hasher, config.routing_subdomain.as_deref());

        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the full hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first 8 characters, for display.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..8]
    }

    /// Compares against a previously recorded hex digest.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl std::fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
