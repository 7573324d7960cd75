//! Rule evaluation for Flagpole
//!
//! Two small interpreters that decide whether a runtime value satisfies a
//! textual rule:
//!
//! - **Level rules** gate on an integer platform revision (`">=29"`, `"21-30"`)
//! - **Version rules** gate on a semantic app version (`">=1.2.0"`,
//!   `"1.0.0-2.0.0"`), with pre-release precedence (`alpha < beta < rc < release`)
//!
//! Both are pure and stateless. A rule that does not parse is not an error
//! at evaluation time: it simply does not match. Rule lists are OR-combined
//! and an empty list means "no restriction".
//!
//! # Quick Start
//!
//! ```
//! use flagpole_conditions::{level, version};
//!
//! assert!(level::evaluate(">=23", 29));
//! assert!(!level::evaluate_any(&["<=23", "28", "31-33", ">=34"], 29));
//!
//! assert!(version::evaluate(">=1.0.0-rc", "1.0.0"));
//! assert!(!version::evaluate(">1.0.0-beta", "1.0.0-alpha"));
//! ```

pub mod error;
pub mod level;
pub mod version;

pub use error::{Result, RuleError};
pub use level::{LevelEvaluator, LevelRule};
pub use version::{Version, VersionEvaluator, VersionRule, compare};
