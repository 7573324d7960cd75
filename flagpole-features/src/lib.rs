//! Feature Flags for Flagpole
//!
//! Runtime feature flags gated by platform level and app version rules,
//! with reactive observation of flag state.
//!
//! # Features
//!
//! - **Flag registry** - Save, update, and query named boolean flags
//! - **Eligibility rules** - Gate flags on a platform level (`">=29"`) or an
//!   app version (`">=1.2.0"`, `"1.0.0-2.0.0"`)
//! - **Observation** - Streams that yield the current value, then every update
//! - **Startup loading** - Pluggable loaders for stored definitions
//!
//! # Quick Start
//!
//! ```
//! use flagpole_features::*;
//!
//! let registry = FlagRegistry::new();
//!
//! registry.save(
//!     FeatureDefinition::new("new-checkout", true)
//!         .with_levels([">=29"])
//!         .with_versions([">=2.0.0-rc"]),
//! );
//!
//! let level = 33;
//! let version = "2.0.0";
//! if registry.is_enabled("new-checkout")
//!     && registry.is_supported_level("new-checkout", level)
//!     && registry.is_supported_version("new-checkout", version)
//! {
//!     // Show the new checkout
//! }
//! ```
//!
//! # Observing Flags
//!
//! ```
//! use flagpole_features::*;
//! use futures::StreamExt;
//!
//! # tokio_test::block_on(async {
//! let registry = FlagRegistry::new();
//! let mut dark_mode = registry.observe("dark-mode");
//!
//! assert_eq!(dark_mode.next().await, Some(false));
//!
//! registry.update(FeatureDefinition::new("dark-mode", true));
//! assert_eq!(dark_mode.next().await, Some(true));
//! # });
//! ```
//!
//! # Loading Stored Definitions
//!
//! ```no_run
//! use flagpole_features::*;
//!
//! # async fn example() {
//! let registry = FlagRegistry::builder()
//!     .config(RegistryConfig::from_env())
//!     .loader(JsonFileLoader::new("flags.json"))
//!     .build()
//!     .await;
//!
//! if let CacheStatus::Failed(reason) = registry.cache_status() {
//!     eprintln!("starting without stored flags: {}", reason);
//! }
//! # }
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;
pub mod store;
pub mod subscription;

pub use config::{ENV_CACHE_ENABLED, RegistryConfig};
pub use definition::{Condition, FeatureDefinition};
pub use error::{ConfigError, LoaderError, RegistryError, Result};
pub use loader::{DefinitionLoader, JsonFileLoader, StaticLoader};
pub use registry::{CacheStatus, FlagRegistry, FlagRegistryBuilder};
pub use store::{FlagStore, InMemoryFlagStore, UpsertOutcome};
pub use subscription::{FlagSubscription, SubscriptionHub};
