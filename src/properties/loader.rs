//! Property source loading.
//!
//! Reads flat property maps from `.properties` files, flat YAML mappings or
//! the process environment. The resolver itself never touches the filesystem;
//! this module only produces the maps it consumes.

use crate::error::{DeployerError, Result, SourceError};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::keys::PropertyKey;

/// Flat property map as produced by the loader.
pub type PropertyMap = BTreeMap<String, String>;

/// Prefix shared by every environment variable mapping onto a property key.
pub const ENV_PREFIX: &str = "SPRING_CLOUD_DEPLOYER_";

/// Loader for property files.
#[derive(Debug, Default)]
pub struct PropertiesLoader {
    /// Base path for resolving relative paths.
    base_path: Option<std::path::PathBuf>,
}

impl PropertiesLoader {
    /// Creates a new loader.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a property file. Files ending in `.yaml` or `.yml` are read as a
    /// flat YAML mapping, everything else as `.properties`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<PropertyMap> {
        let path = self.resolve_path(path.as_ref());
        info!("Loading properties from: {}", path.display());

        if !path.exists() {
            return Err(DeployerError::Source(SourceError::FileNotFound { path }));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            DeployerError::Source(SourceError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::parse_yaml(&content, Some(&path))
        } else {
            Ok(Self::parse_properties(&content))
        }
    }

    /// Parses `.properties` text.
    ///
    /// Lines starting with `#` or `!` are comments. The first `=` or `:`
    /// separates key from value; both are trimmed. An odd number of trailing
    /// backslashes continues the value on the next line. Continued lines are
    /// joined with a newline rather than concatenated, so a Dockerfile keeps
    /// one instruction per line. Other backslashes are kept as written.
    #[must_use]
    pub fn parse_properties(content: &str) -> PropertyMap {
        let mut properties = PropertyMap::new();
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let mut logical = line.to_string();
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => {
                        logical.push('\n');
                        logical.push_str(next.trim_start());
                    }
                    None => break,
                }
            }

            let (key, value) = match logical.find(['=', ':']) {
                Some(idx) => (&logical[..idx], &logical[idx + 1..]),
                None => (logical.as_str(), ""),
            };

            properties.insert(key.trim().to_string(), value.trim().to_string());
        }

        debug!("Parsed {} properties", properties.len());
        properties
    }

    /// Parses a flat YAML mapping of scalars.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value is not a scalar.
    pub fn parse_yaml(content: &str, source: Option<&Path>) -> Result<PropertyMap> {
        let location = || source.map(|p| p.display().to_string());

        let mapping: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str(content).map_err(|e| {
                DeployerError::Source(SourceError::ParseError {
                    message: format!("YAML parse error: {e}"),
                    location: location(),
                })
            })?;

        let mut properties = PropertyMap::new();
        for (key, value) in mapping {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Null => String::new(),
                _ => {
                    return Err(DeployerError::Source(SourceError::ParseError {
                        message: format!("Property '{key}' must be a scalar value"),
                        location: location(),
                    }));
                }
            };
            properties.insert(key, value);
        }

        debug!("Parsed {} properties from YAML", properties.len());
        Ok(properties)
    }

    /// Collects property overrides from environment variables.
    ///
    /// A variable maps onto a key when it equals the key name with dots
    /// replaced by `_`, uppercased (e.g. `SPRING_CLOUD_DEPLOYER_OPENSHIFT_IMAGE_TAG`).
    #[must_use]
    pub fn from_env() -> PropertyMap {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`Self::from_env`] over an explicit variable list.
    #[must_use]
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> PropertyMap {
        let mut properties = PropertyMap::new();

        for (name, value) in vars {
            if !name.starts_with(ENV_PREFIX) {
                continue;
            }

            let key = PropertyKey::all()
                .iter()
                .flat_map(|key| key.names())
                .find(|key_name| env_var_name(key_name) == name);

            if let Some(key_name) = key {
                debug!("Overriding {key_name} from environment");
                properties.insert(key_name.to_string(), value);
            }
        }

        properties
    }

    fn resolve_path(&self, path: &Path) -> std::path::PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Returns the environment variable name for a property key name.
#[must_use]
pub fn env_var_name(key_name: &str) -> String {
    key_name.replace('.', "_").to_uppercase()
}

/// Returns true when `line` ends in an unescaped backslash.
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::keys::{
        CREATE_LOAD_BALANCER, DOCKERFILE, IMAGE_TAG, LABELS, NODE_SELECTOR,
    };
    use std::io::Write;

    #[test]
    fn test_parse_properties() {
        let content = "\
# comment
! another comment

spring.cloud.deployer.openshift.image.tag = v1
spring.cloud.deployer.openshift.deployment.labels=groupName=test,someLabel=value
spring.cloud.deployer.openshift.deployment.nodeSelector: region: primary,role:processor
";
        let properties = PropertiesLoader::parse_properties(content);

        assert_eq!(properties.len(), 3);
        assert_eq!(properties[IMAGE_TAG], "v1");
        assert_eq!(properties[LABELS], "groupName=test,someLabel=value");
        assert_eq!(properties[NODE_SELECTOR], "region: primary,role:processor");
    }

    #[test]
    fn test_parse_properties_continuation() {
        let content = "spring.cloud.deployer.openshift.deployment.dockerfile=FROM java:8\\\n    RUN echo hi\n";
        let properties = PropertiesLoader::parse_properties(content);

        assert_eq!(properties[DOCKERFILE], "FROM java:8\nRUN echo hi");
    }

    #[test]
    fn test_parse_properties_escaped_backslash_ends_value() {
        let content = "\
spring.cloud.deployer.openshift.image.tag=v1\\\\
spring.cloud.deployer.openshift.deployment.labels=a=b
";
        let properties = PropertiesLoader::parse_properties(content);

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[IMAGE_TAG], "v1\\\\");
        assert_eq!(properties[LABELS], "a=b");
    }

    #[test]
    fn test_parse_properties_odd_backslashes_continue() {
        let content = "spring.cloud.deployer.openshift.deployment.dockerfile=a\\\\\\\nb\n";
        let properties = PropertiesLoader::parse_properties(content);

        assert_eq!(properties.len(), 1);
        assert_eq!(properties[DOCKERFILE], "a\\\\\nb");
    }

    #[test]
    fn test_parse_yaml_scalars() {
        let yaml = r"
spring.cloud.deployer.openshift.image.tag: v2
spring.cloud.deployer.openshift.forceBuild: true
spring.cloud.deployer.openshift.createNodePort: 30080
";
        let properties = PropertiesLoader::parse_yaml(yaml, None).unwrap();

        assert_eq!(properties[IMAGE_TAG], "v2");
        assert_eq!(properties["spring.cloud.deployer.openshift.forceBuild"], "true");
        assert_eq!(properties["spring.cloud.deployer.openshift.createNodePort"], "30080");
    }

    #[test]
    fn test_parse_yaml_rejects_nested() {
        let yaml = "spring.cloud.deployer.openshift.image.tag:\n  nested: v2\n";
        assert!(PropertiesLoader::parse_yaml(yaml, None).is_err());
    }

    #[test]
    fn test_load_file_missing() {
        let loader = PropertiesLoader::new();
        let result = loader.load_file("/definitely/not/here.properties");
        assert!(matches!(
            result,
            Err(DeployerError::Source(SourceError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_file_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("app.yml")).unwrap();
        writeln!(file, "{IMAGE_TAG}: v3").unwrap();

        let loader = PropertiesLoader::new().with_base_path(dir.path());
        let properties = loader.load_file("app.yml").unwrap();

        assert_eq!(properties[IMAGE_TAG], "v3");
    }

    #[test]
    fn test_from_vars() {
        let vars = vec![
            (String::from("SPRING_CLOUD_DEPLOYER_OPENSHIFT_IMAGE_TAG"), String::from("v9")),
            (String::from("SPRING_CLOUD_DEPLOYER_KUBERNETES_CREATELOADBALANCER"), String::from("true")),
            (String::from("SPRING_CLOUD_DEPLOYER_UNKNOWN"), String::from("x")),
            (String::from("PATH"), String::from("/usr/bin")),
        ];
        let properties = PropertiesLoader::from_vars(vars);

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[IMAGE_TAG], "v9");
        assert_eq!(properties[CREATE_LOAD_BALANCER], "true");
    }
}
