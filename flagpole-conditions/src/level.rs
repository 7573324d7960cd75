//! Platform level rules.
//!
//! A level rule compares an integer platform revision against a bound:
//!
//! - `">=29"` matches 29 and above
//! - `">29"` matches 30 and above
//! - `"<=33"` matches 33 and below
//! - `"<33"` matches 32 and below
//! - `"21-30"` matches the inclusive range 21..=30
//! - `"30"` matches exactly 30
//!
//! Rules that fail to parse never match.

use crate::error::{Result, RuleError};
use std::fmt;
use std::str::FromStr;

/// A parsed platform level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRule {
    AtLeast(u32),
    GreaterThan(u32),
    AtMost(u32),
    LessThan(u32),
    /// Inclusive on both ends
    Between(u32, u32),
    Exactly(u32),
}

impl LevelRule {
    /// Parse a level rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagpole_conditions::LevelRule;
    ///
    /// assert_eq!(LevelRule::parse(">=23"), Ok(LevelRule::AtLeast(23)));
    /// assert_eq!(LevelRule::parse("23-30"), Ok(LevelRule::Between(23, 30)));
    /// assert!(LevelRule::parse(">=abc").is_err());
    /// ```
    pub fn parse(rule: &str) -> Result<Self> {
        let rule = rule.trim();
        if rule.is_empty() {
            return Err(RuleError::Empty);
        }

        // `>=` before `>` and `<=` before `<`, otherwise the shorter prefix wins.
        if let Some(operand) = rule.strip_prefix(">=") {
            return parse_level(operand).map(Self::AtLeast);
        }
        if let Some(operand) = rule.strip_prefix('>') {
            return parse_level(operand).map(Self::GreaterThan);
        }
        if let Some(operand) = rule.strip_prefix("<=") {
            return parse_level(operand).map(Self::AtMost);
        }
        if let Some(operand) = rule.strip_prefix('<') {
            return parse_level(operand).map(Self::LessThan);
        }

        if let Some((min, max)) = rule.split_once('-') {
            return match (parse_level(min), parse_level(max)) {
                (Ok(min), Ok(max)) => Ok(Self::Between(min, max)),
                _ => Err(RuleError::InvalidRange(rule.to_string())),
            };
        }

        parse_level(rule).map(Self::Exactly)
    }

    /// Check whether `level` satisfies this rule.
    pub fn matches(&self, level: u32) -> bool {
        match *self {
            Self::AtLeast(min) => level >= min,
            Self::GreaterThan(min) => level > min,
            Self::AtMost(max) => level <= max,
            Self::LessThan(max) => level < max,
            Self::Between(min, max) => (min..=max).contains(&level),
            Self::Exactly(exact) => level == exact,
        }
    }
}

impl FromStr for LevelRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LevelRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLeast(n) => write!(f, ">={}", n),
            Self::GreaterThan(n) => write!(f, ">{}", n),
            Self::AtMost(n) => write!(f, "<={}", n),
            Self::LessThan(n) => write!(f, "<{}", n),
            Self::Between(min, max) => write!(f, "{}-{}", min, max),
            Self::Exactly(n) => write!(f, "{}", n),
        }
    }
}

fn parse_level(operand: &str) -> Result<u32> {
    let operand = operand.trim();
    if operand.is_empty() || !operand.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RuleError::InvalidLevel(operand.to_string()));
    }
    operand
        .parse()
        .map_err(|_| RuleError::InvalidLevel(operand.to_string()))
}

/// Stateless evaluator for platform level rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelEvaluator;

impl LevelEvaluator {
    /// See [`evaluate`].
    pub fn evaluate(rule: &str, current_level: u32) -> bool {
        evaluate(rule, current_level)
    }

    /// See [`evaluate_any`].
    pub fn evaluate_any<S: AsRef<str>>(rules: &[S], current_level: u32) -> bool {
        evaluate_any(rules, current_level)
    }
}

/// Evaluate a single rule against the current level.
///
/// Unparsable rules evaluate to `false`.
pub fn evaluate(rule: &str, current_level: u32) -> bool {
    match LevelRule::parse(rule) {
        Ok(parsed) => parsed.matches(current_level),
        Err(e) => {
            tracing::debug!(rule, error = %e, "Level rule did not parse, treating as unmatched");
            false
        }
    }
}

/// Evaluate a rule list: empty means unrestricted, otherwise any match wins.
pub fn evaluate_any<S: AsRef<str>>(rules: &[S], current_level: u32) -> bool {
    rules.is_empty() || rules.iter().any(|r| evaluate(r.as_ref(), current_level))
}
