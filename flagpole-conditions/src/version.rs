//! Semantic version rules.
//!
//! Versions have the shape `INT ("." INT)* ["-" TAG]`. Missing numeric
//! components count as zero, so `1.0` and `1.0.0` are the same version. A
//! release outranks every pre-release of the same numbers, and pre-release
//! tags order by plain byte comparison (`alpha < beta < rc`).
//!
//! Rules use the same operators as level rules (`>=`, `>`, `<=`, `<`,
//! `MIN-MAX`) and fall back to an exact, case-insensitive string match.
//!
//! A range is split on its first hyphen only, and is treated as a range only
//! when both halves are versions. A pre-release tag therefore survives on the
//! upper endpoint (`1.0.0-2.0.0-rc`) but not the lower one:
//! `1.0.0-alpha-2.0.0` is not a range and only matches that exact string.

use crate::error::{Result, RuleError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A version with numeric components and an optional pre-release tag.
///
/// Equality follows ordering, so trailing zero components are ignored.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
    tag: Option<String>,
}

impl Version {
    /// Parse a version strictly.
    ///
    /// Input is trimmed and lower-cased. Every numeric component must be a
    /// non-empty run of digits. The tag is everything after the first hyphen
    /// and must not be empty, so `1.0.0-rc-1` carries the tag `rc-1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagpole_conditions::Version;
    ///
    /// let v = Version::parse("1.2.0-RC").unwrap();
    /// assert_eq!(v.components(), &[1, 2, 0]);
    /// assert_eq!(v.tag(), Some("rc"));
    /// assert!(Version::parse("1.x").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();
        let invalid = || RuleError::InvalidVersion(normalized.clone());

        let (main, tag) = match normalized.split_once('-') {
            Some((main, tag)) => (main, Some(tag)),
            None => (normalized.as_str(), None),
        };

        let components = main
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                part.parse::<u64>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>>>()?;

        let tag = match tag {
            None => None,
            Some(tag) if !tag.is_empty() => Some(tag.to_string()),
            Some(_) => return Err(invalid()),
        };

        Ok(Self { components, tag })
    }

    /// Parse a version without ever failing.
    ///
    /// Components that are not numbers count as zero and an empty tag is
    /// dropped. This is what comparisons use for caller-supplied versions.
    pub fn lenient(input: &str) -> Self {
        let normalized = input.trim().to_lowercase();
        let (main, tag) = match normalized.split_once('-') {
            Some((main, tag)) => (main, Some(tag)),
            None => (normalized.as_str(), None),
        };

        Self {
            components: main
                .split('.')
                .map(|part| part.trim().parse().unwrap_or(0))
                .collect(),
            tag: tag.filter(|t| !t.is_empty()).map(str::to_string),
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.tag.is_some()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        match (&self.tag, &other.tag) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
            first = false;
        }
        if let Some(tag) = &self.tag {
            write!(f, "-{}", tag)?;
        }
        Ok(())
    }
}

/// Compare two version strings.
///
/// Both sides are parsed leniently, so this never fails.
///
/// ```
/// use flagpole_conditions::compare;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare("1.0", "1.0.0"), Ordering::Equal);
/// assert_eq!(compare("1.0.0-alpha", "1.0.0"), Ordering::Less);
/// assert_eq!(compare("1.0.0-rc", "1.0.0-beta"), Ordering::Greater);
/// ```
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::lenient(a).cmp(&Version::lenient(b))
}

/// A parsed version rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRule {
    AtLeast(Version),
    GreaterThan(Version),
    AtMost(Version),
    LessThan(Version),
    /// Inclusive on both ends
    Between(Version, Version),
    /// Exact match against the normalized (trimmed, lower-cased) text
    Exactly(String),
}

impl VersionRule {
    /// Parse a version rule.
    ///
    /// Operator rules fail when their operand is not a version. Anything
    /// without an operator that is not a two-version range becomes an
    /// exact match, so this only fails for empty input and bad operands.
    pub fn parse(rule: &str) -> Result<Self> {
        let rule = rule.trim().to_lowercase();
        if rule.is_empty() {
            return Err(RuleError::Empty);
        }

        if let Some(operand) = rule.strip_prefix(">=") {
            return Version::parse(operand).map(Self::AtLeast);
        }
        if let Some(operand) = rule.strip_prefix('>') {
            return Version::parse(operand).map(Self::GreaterThan);
        }
        if let Some(operand) = rule.strip_prefix("<=") {
            return Version::parse(operand).map(Self::AtMost);
        }
        if let Some(operand) = rule.strip_prefix('<') {
            return Version::parse(operand).map(Self::LessThan);
        }

        if let Some((min, max)) = rule.split_once('-')
            && let (Ok(min), Ok(max)) = (Version::parse(min), Version::parse(max))
        {
            return Ok(Self::Between(min, max));
        }

        Ok(Self::Exactly(rule))
    }

    /// Check whether `current` satisfies this rule.
    pub fn matches(&self, current: &str) -> bool {
        if let Self::Exactly(expected) = self {
            return current.trim().to_lowercase() == *expected;
        }
        self.matches_version(&Version::lenient(current))
    }

    /// Check an already parsed version.
    ///
    /// Exact rules compare against the version's canonical text.
    pub fn matches_version(&self, current: &Version) -> bool {
        match self {
            Self::AtLeast(min) => current >= min,
            Self::GreaterThan(min) => current > min,
            Self::AtMost(max) => current <= max,
            Self::LessThan(max) => current < max,
            Self::Between(min, max) => current >= min && current <= max,
            Self::Exactly(expected) => current.to_string() == *expected,
        }
    }
}

impl FromStr for VersionRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Stateless evaluator for version rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionEvaluator;

impl VersionEvaluator {
    /// See [`evaluate`].
    pub fn evaluate(rule: &str, current_version: &str) -> bool {
        evaluate(rule, current_version)
    }

    /// See [`evaluate_any`].
    pub fn evaluate_any<S: AsRef<str>>(rules: &[S], current_version: &str) -> bool {
        evaluate_any(rules, current_version)
    }

    /// See [`compare`].
    pub fn compare(a: &str, b: &str) -> Ordering {
        compare(a, b)
    }
}

/// Evaluate a single rule against the current version.
///
/// Unparsable rules evaluate to `false`.
pub fn evaluate(rule: &str, current_version: &str) -> bool {
    match VersionRule::parse(rule) {
        Ok(parsed) => parsed.matches(current_version),
        Err(e) => {
            tracing::debug!(rule, error = %e, "Version rule did not parse, treating as unmatched");
            false
        }
    }
}

/// Evaluate a rule list: empty means unrestricted, otherwise any match wins.
pub fn evaluate_any<S: AsRef<str>>(rules: &[S], current_version: &str) -> bool {
    rules.is_empty() || rules.iter().any(|r| evaluate(r.as_ref(), current_version))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE: &str = "1.0.0";

    #[test]
    fn test_missing_components_are_zero() {
        assert_eq!(compare("1.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare("1", "1.0.0.0"), Ordering::Equal);
        assert_eq!(compare("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(Version::parse("2.0").unwrap(), Version::parse("2.0.0").unwrap());
    }

    #[test]
    fn test_components_compare_numerically() {
        assert_eq!(compare("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare("0.9.9", "1.0.0"), Ordering::Less);
    }

    #[test]
    fn test_prerelease_precedence() {
        assert_eq!(compare("1.0.0-alpha", "1.0.0"), Ordering::Less);
        assert_eq!(compare("1.0.0", "1.0.0-rc"), Ordering::Greater);
        assert_eq!(compare("1.0.0-alpha", "1.0.0-beta"), Ordering::Less);
        assert_eq!(compare("1.0.0-beta", "1.0.0-rc"), Ordering::Less);
        assert_eq!(compare("1.0.0-rc", "1.0.0-rc"), Ordering::Equal);
        // Numbers still dominate tags.
        assert_eq!(compare("1.0.1-alpha", "1.0.0"), Ordering::Greater);
    }

    #[test]
    fn test_compare_is_case_insensitive() {
        assert_eq!(compare("1.0.0-RC", "1.0.0-rc"), Ordering::Equal);
    }

    #[test]
    fn test_compare_never_fails() {
        assert_eq!(compare("x.y.z", "0.0.0"), Ordering::Equal);
        assert_eq!(compare("", "0"), Ordering::Equal);
        assert_eq!(compare("1.a.2", "1.0.2"), Ordering::Equal);
        assert_eq!(compare("99999999999999999999999", "0"), Ordering::Equal);
    }

    #[test]
    fn test_strict_parse() {
        assert!(Version::parse("1.2.3").is_ok());
        assert!(Version::parse("1.2.3-beta.2").is_ok());
        assert!(Version::parse("").is_err());
        assert!(Version::parse("1..2").is_err());
        assert!(Version::parse("1.2.").is_err());
        assert!(Version::parse("v1.2").is_err());
        assert!(Version::parse("1.2-").is_err());
        assert_eq!(Version::parse("1.2-rc-1").unwrap().tag(), Some("rc-1"));
        assert_eq!(Version::parse("1.2-beta_1").unwrap().tag(), Some("beta_1"));
        assert!(Version::parse("rc").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::parse(" 1.2.0-RC ").unwrap().to_string(), "1.2.0-rc");
        assert_eq!(Version::lenient("3").to_string(), "3");
    }

    #[test]
    fn test_operators_against_release() {
        assert!(evaluate(">=1.0.0", RELEASE));
        assert!(!evaluate(">=1.0.1", RELEASE));
        assert!(evaluate(">0.9.0", RELEASE));
        assert!(!evaluate(">1.0.0", RELEASE));
        assert!(evaluate("<=1.0.0", RELEASE));
        assert!(!evaluate("<=0.9.0", RELEASE));
        assert!(evaluate("<1.0.1", RELEASE));
        assert!(!evaluate("<1.0.0", RELEASE));
    }

    #[test]
    fn test_range() {
        assert!(evaluate("0.9.0-1.0.0", RELEASE));
        assert!(evaluate("1.0.0-1.0.0", RELEASE));
        assert!(!evaluate("1.1.0-1.2.0", RELEASE));
        assert!(evaluate("0.9 - 1.1", RELEASE));
    }

    #[test]
    fn test_range_with_tagged_upper_bound() {
        assert_eq!(
            VersionRule::parse("0.9.0-1.0.0-rc"),
            Ok(VersionRule::Between(
                Version::parse("0.9.0").unwrap(),
                Version::parse("1.0.0-rc").unwrap()
            ))
        );
        assert!(evaluate("0.9.0-1.0.0-rc", "1.0.0-beta"));
        assert!(!evaluate("0.9.0-1.0.0-rc", RELEASE));
    }

    #[test]
    fn test_tagged_lower_bound_is_not_a_range() {
        // The first hyphen belongs to the tag, so the rule cannot be split
        // into two versions and degrades to an exact match.
        let rule = VersionRule::parse("1.0.0-alpha-2.0.0").unwrap();
        assert_eq!(rule, VersionRule::Exactly("1.0.0-alpha-2.0.0".to_string()));
        assert!(!rule.matches("1.5.0"));
        assert!(rule.matches("1.0.0-alpha-2.0.0"));
    }

    #[test]
    fn test_exact() {
        assert!(evaluate("1.0.0", RELEASE));
        assert!(!evaluate("1.1.0", RELEASE));
        assert!(evaluate("1.0.0-RC", "1.0.0-rc"));
        // Exact matching is textual.
        assert!(!evaluate("1.0", RELEASE));
    }

    #[test]
    fn test_prerelease_rules() {
        assert!(evaluate(">=1.0.0-alpha", "1.0.0-alpha"));
        assert!(!evaluate(">1.0.0-beta", "1.0.0-alpha"));
        assert!(evaluate(">1.0.0-alpha", "1.0.0-beta"));
        assert!(evaluate(">=1.0.0-beta", "1.0.0-rc"));
        assert!(evaluate(">=1.0.0-rc", RELEASE));
        assert!(!evaluate("<1.0.0-rc", RELEASE));
    }

    #[test]
    fn test_hyphenated_tags_in_operator_rules() {
        assert!(evaluate(">=1.0.0-rc-1", RELEASE));
        assert!(evaluate(">=1.0.0-rc-1", "1.0.0-rc-1"));
        assert!(!evaluate(">=1.0.0-rc-2", "1.0.0-rc-1"));
        assert!(evaluate("<1.0.0-rc-2", "1.0.0-rc-1"));
        assert!(!evaluate("<1.0.0-rc-2", RELEASE));
        assert!(evaluate(">=1.0.0-beta_1", RELEASE));

        // Operator rules agree with `compare` on the same strings.
        assert_eq!(compare(RELEASE, "1.0.0-rc-1"), Ordering::Greater);
        assert_eq!(compare("1.0.0-rc-1", "1.0.0-rc-2"), Ordering::Less);
    }

    #[test]
    fn test_rule_is_case_and_space_insensitive() {
        assert!(evaluate("  >=1.0.0-RC ", RELEASE));
        assert!(evaluate(">= 1.0.0", RELEASE));
    }

    #[test]
    fn test_bad_operands_never_match() {
        for rule in [">=abc", ">", "<=1..0", "<1.0-", ">=-rc", ""] {
            assert!(!evaluate(rule, RELEASE), "rule {:?} should not match", rule);
            assert!(VersionRule::parse(rule).is_err(), "rule {:?} should not parse", rule);
        }
    }

    #[test]
    fn test_evaluate_any() {
        let rules = ["<0.5.0", "1.0.0-1.2.0"];
        assert!(evaluate_any(&rules, "1.1.0"));
        assert!(evaluate_any(&rules, "0.4.9"));
        assert!(!evaluate_any(&rules, "0.7.0"));

        let none: Vec<String> = Vec::new();
        assert!(evaluate_any(&none, "anything"));
        assert!(VersionEvaluator::evaluate_any(&none, ""));
    }

    #[test]
    fn test_matches_version_exact_uses_canonical_text() {
        let rule = VersionRule::parse("2.0.0-beta").unwrap();
        assert!(rule.matches_version(&Version::parse("2.0.0-BETA").unwrap()));
    }
}
