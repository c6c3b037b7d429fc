//! Template invariant checks over detected holes.
//!
//! Every rule is evaluated independently and all violations are collected,
//! so an operator fixing a template sees every problem in one pass.

use crate::template::Hole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single broken template invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The template contains no holes at all.
    NoHolesDetected,
    /// A hole is narrower or shorter than the minimum size.
    HoleTooSmall {
        id: String,
        width: u32,
        height: u32,
        min_size: u32,
    },
    /// Two holes share at least one pixel.
    HolesOverlap { first: String, second: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHolesDetected => write!(f, "no holes detected in template"),
            Self::HoleTooSmall {
                id,
                width,
                height,
                min_size,
            } => write!(
                f,
                "hole {id} is {width}x{height}px, smaller than the {min_size}px minimum"
            ),
            Self::HolesOverlap { first, second } => {
                write!(f, "holes {first} and {second} overlap")
            }
        }
    }
}

/// Outcome of validating a set of holes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns true when no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "no violations");
        }
        for (idx, violation) in self.violations.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Checks the hole-count, minimum-size and non-overlap rules.
pub fn validate_holes(holes: &[Hole], min_hole_size: u32) -> ValidationReport {
    let mut violations = Vec::new();

    if holes.is_empty() {
        violations.push(Violation::NoHolesDetected);
    }

    for hole in holes {
        if hole.width < min_hole_size || hole.height < min_hole_size {
            violations.push(Violation::HoleTooSmall {
                id: hole.id.clone(),
                width: hole.width,
                height: hole.height,
                min_size: min_hole_size,
            });
        }
    }

    for (i, a) in holes.iter().enumerate() {
        for b in &holes[i + 1..] {
            if a.overlaps(b) {
                violations.push(Violation::HolesOverlap {
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
    }

    ValidationReport { violations }
}
