//! Property keys and key lookup.
//!
//! This module owns the property-key surface:
//! - The key table with shapes, defaults and aliases
//! - Alias-aware lookup with override precedence
//! - Loading flat property maps from files and the environment

pub mod keys;
mod loader;
mod lookup;

pub use keys::{PropertyKey, ValueShape};
pub use loader::{ENV_PREFIX, PropertiesLoader, PropertyMap, env_var_name};
pub use lookup::{PropertyLookup, PropertySource, ResolvedValue, ValueOrigin, resolve};
