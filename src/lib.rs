// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # OpenShift Deployer Properties
//!
//! Resolves the stringly-typed `spring.cloud.deployer.*` properties an
//! operator uses to tune an OpenShift deployment into a validated,
//! strongly-typed configuration.
//!
//! ## Overview
//!
//! Resolution takes a global property map and a per-deployment override map
//! and runs in one pure pass:
//!
//! 1. **Lookup**: override map, then raw map, then the key's default, with
//!    legacy aliases resolved through a small table
//! 2. **Parse**: each compound value goes through its own grammar
//! 3. **Reconcile**: the route and NodePort toggles collapse into a single
//!    [`resolver::Exposure`]
//!
//! Every problem found is reported together in one [`error::ResolutionError`].
//!
//! ## Modules
//!
//! - [`properties`]: Key table, lookup and property-file loading
//! - [`grammar`]: Parsers for the compound value grammars
//! - [`resolver`]: The resolver and the resolved configuration model
//! - [`directives`]: Resources to construct for a resolved configuration
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use openshift_deployer_props::resolver::{DeploymentPropertyResolver, Exposure};
//!
//! let mut raw = HashMap::new();
//! raw.insert(
//!     String::from("spring.cloud.deployer.openshift.createNodePort"),
//!     String::from("true"),
//! );
//! let overrides: HashMap<String, String> = HashMap::new();
//!
//! let config = DeploymentPropertyResolver::default()
//!     .resolve(&raw, &overrides)
//!     .unwrap();
//! assert_eq!(config.exposure, Exposure::NodePort { port: None });
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod directives;
pub mod error;
pub mod grammar;
pub mod properties;
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use directives::{DeploymentDirectives, ResourceDirective};
pub use error::{DeployerError, PropertyError, ResolutionError, Result};
pub use properties::{PropertiesLoader, PropertyKey, PropertyMap};
pub use resolver::{
    ConfigFingerprint, DeploymentPropertyResolver, EntryPointStyle, Exposure,
    ResolvedDeploymentConfig, ResolverSettings, VolumeMount,
};
