//! Key lookup and defaulting.
//!
//! Lookup order for a key is: override map, raw map, declared default. Within
//! each map the canonical name is tried before its alias, so an override for
//! the alias still beats a raw value for the canonical name. Blank values count
//! as absent.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::debug;

use super::keys::PropertyKey;

/// A read-only mapping from property name to raw string value.
pub trait PropertySource {
    /// Returns the raw value stored under `name`, matched exactly.
    fn get_property(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> PropertySource for HashMap<String, String, S> {
    fn get_property(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn get_property(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn get_property(&self, name: &str) -> Option<&str> {
        (**self).get_property(name)
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    /// The per-deployment override map.
    Override,
    /// The global raw property map.
    Raw,
    /// The key's declared default.
    Default,
}

/// A raw value found for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedValue<'a> {
    /// The raw string.
    pub value: &'a str,
    /// The property name it was found under.
    pub name: &'static str,
    /// Which source supplied it.
    pub origin: ValueOrigin,
}

/// Alias-aware lookup over an override map and a raw map.
#[derive(Debug)]
pub struct PropertyLookup<'a, R: ?Sized, O: ?Sized> {
    raw: &'a R,
    overrides: &'a O,
}

impl<'a, R, O> PropertyLookup<'a, R, O>
where
    R: PropertySource + ?Sized,
    O: PropertySource + ?Sized,
{
    /// Creates a lookup over the given maps.
    #[must_use]
    pub const fn new(raw: &'a R, overrides: &'a O) -> Self {
        Self { raw, overrides }
    }

    /// Resolves a key, falling back to its declared default.
    #[must_use]
    pub fn resolve(&self, key: PropertyKey) -> Option<ResolvedValue<'a>> {
        self.resolve_with_default(key, key.default_value())
    }

    /// Resolves a key, falling back to `default` when no map has a value.
    #[must_use]
    pub fn resolve_with_default(
        &self,
        key: PropertyKey,
        default: Option<&'a str>,
    ) -> Option<ResolvedValue<'a>> {
        let found = find_in(self.overrides, key, ValueOrigin::Override)
            .or_else(|| find_in(self.raw, key, ValueOrigin::Raw));

        if let Some(found) = found {
            if found.name != key.name() {
                debug!("Property {key} resolved through alias {}", found.name);
            }
            return Some(found);
        }

        default.map(|value| {
            debug!("Property {key} not set, using default '{value}'");
            ResolvedValue {
                value,
                name: key.name(),
                origin: ValueOrigin::Default,
            }
        })
    }

    /// Returns just the raw string for a key.
    #[must_use]
    pub fn value(&self, key: PropertyKey) -> Option<&'a str> {
        self.resolve(key).map(|resolved| resolved.value)
    }
}

/// Resolves `key` against `overrides`, then `raw`, then `default`.
#[must_use]
pub fn resolve<'a, R, O>(
    raw: &'a R,
    overrides: &'a O,
    key: PropertyKey,
    default: Option<&'a str>,
) -> Option<&'a str>
where
    R: PropertySource + ?Sized,
    O: PropertySource + ?Sized,
{
    PropertyLookup::new(raw, overrides)
        .resolve_with_default(key, default)
        .map(|resolved| resolved.value)
}

fn find_in<'a, S>(source: &'a S, key: PropertyKey, origin: ValueOrigin) -> Option<ResolvedValue<'a>>
where
    S: PropertySource + ?Sized,
{
    key.names().find_map(|name| {
        source
            .get_property(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| ResolvedValue { value, name, origin })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::keys::{CREATE_LOAD_BALANCER, CREATE_ROUTE, IMAGE_TAG};

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_override_wins_over_raw() {
        let raw = map(&[(IMAGE_TAG, "v1")]);
        let overrides = map(&[(IMAGE_TAG, "v2")]);
        let lookup = PropertyLookup::new(&raw, &overrides);

        let resolved = lookup.resolve(PropertyKey::ImageTag).unwrap();
        assert_eq!(resolved.value, "v2");
        assert_eq!(resolved.origin, ValueOrigin::Override);
    }

    #[test]
    fn test_raw_then_default() {
        let raw = map(&[(IMAGE_TAG, "v1")]);
        let overrides: HashMap<String, String> = HashMap::new();

        assert_eq!(resolve(&raw, &overrides, PropertyKey::ImageTag, Some("latest")), Some("v1"));
        assert_eq!(
            resolve(&overrides, &overrides, PropertyKey::ImageTag, Some("latest")),
            Some("latest")
        );
        assert_eq!(resolve(&overrides, &overrides, PropertyKey::ImageTag, None), None);
    }

    #[test]
    fn test_declared_default() {
        let empty: HashMap<String, String> = HashMap::new();
        let lookup = PropertyLookup::new(&empty, &empty);

        let resolved = lookup.resolve(PropertyKey::EntryPointStyle).unwrap();
        assert_eq!(resolved.value, "exec");
        assert_eq!(resolved.origin, ValueOrigin::Default);
    }

    #[test]
    fn test_canonical_name_beats_alias() {
        let raw = map(&[(CREATE_ROUTE, "false"), (CREATE_LOAD_BALANCER, "true")]);
        let empty: HashMap<String, String> = HashMap::new();
        let lookup = PropertyLookup::new(&raw, &empty);

        let resolved = lookup.resolve(PropertyKey::CreateRoute).unwrap();
        assert_eq!(resolved.value, "false");
        assert_eq!(resolved.name, CREATE_ROUTE);
    }

    #[test]
    fn test_alias_used_when_canonical_blank() {
        let raw = map(&[(CREATE_ROUTE, "  "), (CREATE_LOAD_BALANCER, "true")]);
        let empty: HashMap<String, String> = HashMap::new();
        let lookup = PropertyLookup::new(&raw, &empty);

        let resolved = lookup.resolve(PropertyKey::CreateRoute).unwrap();
        assert_eq!(resolved.value, "true");
        assert_eq!(resolved.name, CREATE_LOAD_BALANCER);
    }

    #[test]
    fn test_override_alias_beats_raw_canonical() {
        let raw = map(&[(CREATE_ROUTE, "false")]);
        let overrides = map(&[(CREATE_LOAD_BALANCER, "true")]);
        let lookup = PropertyLookup::new(&raw, &overrides);

        assert_eq!(lookup.value(PropertyKey::CreateRoute), Some("true"));
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let raw = map(&[("spring.cloud.deployer.openshift.image.Tag", "v1")]);
        let empty: HashMap<String, String> = HashMap::new();
        let lookup = PropertyLookup::new(&raw, &empty);

        assert_eq!(lookup.value(PropertyKey::ImageTag), None);
    }
}
