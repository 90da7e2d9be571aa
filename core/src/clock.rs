//! Simulation clock: owns the current time and keeps it monotonic.

use crate::{
    error::{TimeError, TimeResult},
    types::SimTime,
};
use serde::{Deserialize, Serialize};

/// The one thing the time subsystem needs from an event scheduler.
pub trait SimScheduler {
    /// Present simulation time, in units of the run precision.
    fn current_time(&self) -> SimTime;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimClock {
    current_time: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to an absolute time. Going backwards is refused.
    pub fn advance_to(&mut self, t: SimTime) -> TimeResult<SimTime> {
        if t < self.current_time {
            return Err(TimeError::TimeWentBackwards {
                current:   self.current_time,
                requested: t,
            });
        }
        self.current_time = t;
        Ok(self.current_time)
    }
}

impl SimScheduler for SimClock {
    fn current_time(&self) -> SimTime {
        self.current_time
    }
}
