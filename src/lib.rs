// Flagpole - runtime feature flags for Rust applications
//
// Flags are named booleans gated by optional platform level and app version
// rules, stored in a shared registry and observable as streams.

// Re-export member crates
pub use flagpole_conditions as conditions;
pub use flagpole_features as features;

pub use flagpole_conditions::{
    LevelEvaluator, LevelRule, RuleError, Version, VersionEvaluator, VersionRule, compare,
};
pub use flagpole_features::*;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CacheStatus, Condition, DefinitionLoader, FeatureDefinition, FlagRegistry,
        FlagRegistryBuilder, FlagStore, FlagSubscription, JsonFileLoader, LevelEvaluator,
        RegistryConfig, StaticLoader, VersionEvaluator,
    };
}
