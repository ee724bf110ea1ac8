//! Assertions and verdicts
//!
//! Matchers judge an observed value independently of how it was obtained. A failed check
//! carries the expected condition and the actual value.

pub mod matcher;
pub mod verdict;


pub use matcher::{evaluate, expect, AssertionResult, CmpOp, Matcher};
pub use verdict::{Verdict, VerdictStatus};
