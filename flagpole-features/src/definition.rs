//! Feature definitions and their eligibility conditions.

use flagpole_conditions::{level, version};
use serde::{Deserialize, Serialize};

/// Eligibility rules for a feature.
///
/// Each list is OR-combined; an empty list places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Platform level rules, e.g. `">=29"` or `"21-30"`
    #[serde(default)]
    pub supported_levels: Vec<String>,

    /// App version rules, e.g. `">=1.2.0"` or `"1.0.0-2.0.0"`
    #[serde(default)]
    pub supported_versions: Vec<String>,
}

impl Condition {
    pub fn new<L, V>(levels: L, versions: V) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            supported_levels: levels.into_iter().map(Into::into).collect(),
            supported_versions: versions.into_iter().map(Into::into).collect(),
        }
    }

    /// A condition that accepts every level and version.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.supported_levels.is_empty() && self.supported_versions.is_empty()
    }

    /// Check a platform level against the level rules.
    pub fn allows_level(&self, current_level: u32) -> bool {
        level::evaluate_any(&self.supported_levels, current_level)
    }

    /// Check an app version against the version rules.
    pub fn allows_version(&self, current_version: &str) -> bool {
        version::evaluate_any(&self.supported_versions, current_version)
    }
}

/// A named boolean flag with an optional eligibility condition.
///
/// ```
/// use flagpole_features::FeatureDefinition;
///
/// let def = FeatureDefinition::new("new-checkout", true)
///     .with_levels([">=29"])
///     .with_versions([">=2.0.0"]);
///
/// assert!(def.condition.allows_level(33));
/// assert!(!def.condition.allows_version("1.9.9"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    /// Flag name. Not required to be unique; lookups use the first match.
    pub name: String,

    pub enabled: bool,

    #[serde(default)]
    pub condition: Condition,
}

impl FeatureDefinition {
    /// Create an unrestricted definition.
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            condition: Condition::unrestricted(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Append platform level rules.
    pub fn with_levels<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.condition
            .supported_levels
            .extend(rules.into_iter().map(Into::into));
        self
    }

    /// Append app version rules.
    pub fn with_versions<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.condition
            .supported_versions
            .extend(rules.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unrestricted() {
        let def = FeatureDefinition::new("dark-mode", false);
        assert!(def.condition.is_unrestricted());
        assert!(def.condition.allows_level(1));
        assert!(def.condition.allows_version("0.0.1"));
    }

    #[test]
    fn test_builder_appends_rules() {
        let def = FeatureDefinition::new("f", true)
            .with_levels(["<=23"])
            .with_levels([">=34".to_string()])
            .with_versions(vec!["1.0.0-2.0.0"]);

        assert_eq!(def.condition.supported_levels, vec!["<=23", ">=34"]);
        assert_eq!(def.condition.supported_versions, vec!["1.0.0-2.0.0"]);
        assert!(!def.condition.allows_level(29));
        assert!(def.condition.allows_version("1.5.0"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let def: FeatureDefinition =
            serde_json::from_str(r#"{"name": "beta", "enabled": true}"#).unwrap();
        assert_eq!(def, FeatureDefinition::new("beta", true));

        let def: FeatureDefinition = serde_json::from_str(
            r#"{"name": "beta", "enabled": false, "condition": {"supported_levels": [">=30"]}}"#,
        )
        .unwrap();
        assert_eq!(def.condition.supported_levels, vec![">=30"]);
        assert!(def.condition.supported_versions.is_empty());
    }

    #[test]
    fn test_condition_new() {
        let condition = Condition::new(["28", "31-33"], Vec::<String>::new());
        assert!(condition.allows_level(32));
        assert!(!condition.allows_level(29));
        assert!(condition.allows_version("whatever"));
    }
}
