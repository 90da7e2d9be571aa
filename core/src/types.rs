//! Shared primitive types used across the time subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation time, counted in units of the run's precision.
pub type SimTime = u64;

/// A power-of-ten time exponent. Smaller is finer: -9 is 1ns, -12 is 1ps.
pub type TimeExponent = i32;

/// Index of a scope in the kernel's scope table.
/// Scopes are never removed while the kernel lives, so an id stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub usize);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Opaque handle to an object registered with the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub u32);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle#{}", self.0)
    }
}

/// Render an exponent the way a `timescale` directive spells it.
/// Only 1/10/100 multiples of s..fs exist, so anything outside
/// [-15, 2] yields `None`.
pub fn units_name(exp: TimeExponent) -> Option<String> {
    if !(-15..=2).contains(&exp) {
        return None;
    }
    let base = exp.div_euclid(3) * 3;
    let multiplier = 10u32.pow((exp - base) as u32);
    let suffix = match base {
        0   => "s",
        -3  => "ms",
        -6  => "us",
        -9  => "ns",
        -12 => "ps",
        _   => "fs",
    };
    Some(format!("{multiplier}{suffix}"))
}
