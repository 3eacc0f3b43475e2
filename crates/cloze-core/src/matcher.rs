//! Per-blank answer matching.

use serde::{Deserialize, Serialize};

use crate::solution::{parse_decimal, Expected, Slot};

/// Why a blank was judged the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Equal to an accepted variant, ignoring case.
    VariantMatched,
    /// Equal to none of the accepted variants.
    NoVariantMatched,
    /// Within the tolerance of the target.
    WithinTolerance,
    /// A number, but too far from the target.
    OutsideTolerance,
    /// Expected a number, got something else.
    NotANumber,
    /// Nothing was entered.
    Missing,
    /// The blank itself is misconfigured and cannot be satisfied.
    Unsatisfiable,
}

/// Outcome of matching one answer against one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub reason: Reason,
}

impl Verdict {
    fn hit(reason: Reason) -> Self {
        Self {
            correct: true,
            reason,
        }
    }

    fn miss(reason: Reason) -> Self {
        Self {
            correct: false,
            reason,
        }
    }
}

/// Judge `submitted` against `slot`.
pub fn check(slot: &Slot, submitted: &str) -> Verdict {
    let submitted = submitted.trim();
    if submitted.is_empty() {
        return Verdict::miss(Reason::Missing);
    }

    match &slot.expected {
        Expected::Text { accepted } => {
            let lowered = submitted.to_lowercase();
            if accepted.iter().any(|v| v.to_lowercase() == lowered) {
                Verdict::hit(Reason::VariantMatched)
            } else {
                Verdict::miss(Reason::NoVariantMatched)
            }
        }
        Expected::Numeric { target, tolerance } => match parse_decimal(submitted) {
            None => Verdict::miss(Reason::NotANumber),
            // No epsilon beyond the author's tolerance.
            Some(value) if (value - target).abs() <= *tolerance => {
                Verdict::hit(Reason::WithinTolerance)
            }
            Some(_) => Verdict::miss(Reason::OutsideTolerance),
        },
        Expected::Unsatisfiable(_) => Verdict::miss(Reason::Unsatisfiable),
    }
}

/// Shorthand for `check(slot, submitted).correct`.
pub fn matches(slot: &Slot, submitted: &str) -> bool {
    check(slot, submitted).correct
}
