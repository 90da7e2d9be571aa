//! The run's time precision, the finest unit the clock counts in.
//!
//! RULE: precision is set once by the run loader before the clock
//! starts. Every scope's units must be coarser than or equal to it.

use crate::types::TimeExponent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrecisionRegistry {
    precision: TimeExponent,
    set:       bool,
}

impl PrecisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the run precision. Any exponent is accepted; a later
    /// write with a different value wins but is logged.
    pub fn set_precision(&mut self, precision: TimeExponent) {
        if self.set && self.precision != precision {
            log::warn!(
                "Time precision overwritten: 1e{} -> 1e{precision}",
                self.precision
            );
        } else {
            log::debug!("Time precision set to 1e{precision}");
        }
        self.precision = precision;
        self.set = true;
    }

    /// The recorded precision, 0 if never set.
    pub fn get_precision(&self) -> TimeExponent {
        self.precision
    }

    pub fn is_set(&self) -> bool {
        self.set
    }
}
