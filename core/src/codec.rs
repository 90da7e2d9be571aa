//! Conversion between a 64-bit simulation time and the two-word
//! structured form used at the procedural-interface boundary.

use crate::types::SimTime;
use serde::{Deserialize, Serialize};

/// High and low 32-bit halves of a simulation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTime {
    pub high: u32,
    pub low:  u32,
}

pub fn encode(t: SimTime) -> StructuredTime {
    StructuredTime {
        high: (t >> 32) as u32,
        low:  (t & 0xFFFF_FFFF) as u32,
    }
}

/// The low word is a `u32`, so it can never carry high-word bits.
pub fn decode(s: StructuredTime) -> SimTime {
    (u64::from(s.high) << 32) | u64::from(s.low)
}

impl From<SimTime> for StructuredTime {
    fn from(t: SimTime) -> Self {
        encode(t)
    }
}

impl From<StructuredTime> for SimTime {
    fn from(s: StructuredTime) -> Self {
        decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_the_word_boundary() {
        let s = encode(0x0000_0001_0000_0002);
        assert_eq!(s, StructuredTime { high: 1, low: 2 });
    }

    #[test]
    fn extremes_survive_decode() {
        for t in [0, 1, 0xFFFF_FFFF, 0x1_0000_0000, u64::MAX] {
            assert_eq!(decode(encode(t)), t);
        }
    }

    #[test]
    fn from_impls_match_free_functions() {
        let t: SimTime = 987_654_321_012;
        let s: StructuredTime = t.into();
        assert_eq!(s, encode(t));
        assert_eq!(SimTime::from(s), t);
    }
}
