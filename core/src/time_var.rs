//! The `$time` pseudo-variable bound to a scope.
//!
//! A time variable stores nothing but the scope it reports for. Every
//! read asks the scheduler for the current time, scales it from the run
//! precision down to the scope's units, and renders it.

use crate::{
    clock::SimScheduler,
    error::{TimeError, TimeResult},
    precision::PrecisionRegistry,
    scope::ScopeTable,
    types::{ScopeId, SimTime, TimeExponent},
    value::{Property, Value, ValueFormat},
};
use serde::{Deserialize, Serialize};

/// Width reported for `Property::Size`.
pub const TIME_VAR_SIZE: i32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeVarKind {
    /// `$time`: scaled to the scope's units.
    Scaled,
    /// `$simtime`: raw clock value in precision units.
    Unscaled,
}

/// Everything a read needs that the time variable does not own.
pub struct TimeContext<'a> {
    pub scheduler: &'a dyn SimScheduler,
    pub precision: &'a PrecisionRegistry,
    pub scopes:    &'a ScopeTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedTimeValue {
    scope: ScopeId,
    kind:  TimeVarKind,
}

impl ScopedTimeValue {
    pub fn new(scope: ScopeId, kind: TimeVarKind) -> Self {
        Self { scope, kind }
    }

    /// Integer properties of a time variable. Only size and signedness
    /// are defined; they never depend on scope or time.
    pub fn describe(&self, property: Property) -> TimeResult<i32> {
        match property {
            Property::Size   => Ok(TIME_VAR_SIZE),
            Property::Signed => Ok(0),
            other => Err(TimeError::UnsupportedProperty { code: other.code() }),
        }
    }

    /// Current time in this variable's units.
    pub fn current_value(&self, ctx: &TimeContext<'_>) -> TimeResult<SimTime> {
        let raw = ctx.scheduler.current_time();
        if self.kind == TimeVarKind::Unscaled {
            return Ok(raw);
        }
        let units = ctx.scopes.get(self.scope)?.time_units;
        let precision = ctx.precision.get_precision();
        if units < precision {
            log::warn!(
                "{} units 1e{units} finer than precision 1e{precision}; reading unscaled",
                self.scope
            );
        }
        Ok(scale_to_units(raw, units, precision))
    }

    pub fn read(&self, format: ValueFormat, ctx: &TimeContext<'_>) -> TimeResult<Value> {
        let t = self.current_value(ctx)?;
        log::trace!("{} read as {format:?}: {t}", self.scope);
        Value::render(t, format)
    }
}

/// Strip one decimal digit per exponent step from `precision` up to
/// `units`. Units at or below the precision leave `raw` untouched.
pub fn scale_to_units(mut raw: SimTime, mut units: TimeExponent, precision: TimeExponent) -> SimTime {
    while units > precision {
        raw /= 10;
        units -= 1;
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SimClock;

    fn fixture(precision: TimeExponent, units: TimeExponent, now: SimTime)
        -> (SimClock, PrecisionRegistry, ScopeTable, ScopeId)
    {
        let mut clock = SimClock::new();
        clock.advance_to(now).unwrap();
        let mut reg = PrecisionRegistry::new();
        reg.set_precision(precision);
        let mut scopes = ScopeTable::new();
        let id = scopes.insert("top", None, units).unwrap();
        (clock, reg, scopes, id)
    }

    #[test]
    fn scaling_divides_by_ten_per_step() {
        assert_eq!(scale_to_units(123_456, 2, 0), 1234);
        assert_eq!(scale_to_units(123_456, -9, -12), 123);
        assert_eq!(scale_to_units(123_456, 3, 3), 123_456);
        assert_eq!(scale_to_units(u64::MAX, 40, 0), 0);
    }

    #[test]
    fn finer_units_leave_value_unscaled() {
        assert_eq!(scale_to_units(42, -15, -12), 42);
    }

    #[test]
    fn simtime_ignores_scope_units() {
        let (clock, reg, scopes, id) = fixture(-12, -9, 5_000);
        let ctx = TimeContext { scheduler: &clock, precision: &reg, scopes: &scopes };
        let scaled = ScopedTimeValue::new(id, TimeVarKind::Scaled);
        let raw = ScopedTimeValue::new(id, TimeVarKind::Unscaled);
        assert_eq!(scaled.current_value(&ctx).unwrap(), 5);
        assert_eq!(raw.current_value(&ctx).unwrap(), 5_000);
    }

    #[test]
    fn describe_rejects_name_and_type() {
        let var = ScopedTimeValue::new(ScopeId(0), TimeVarKind::Scaled);
        assert!(matches!(
            var.describe(Property::Name),
            Err(TimeError::UnsupportedProperty { code: 2 })
        ));
        assert!(matches!(
            var.describe(Property::Type),
            Err(TimeError::UnsupportedProperty { code: 1 })
        ));
    }

    #[test]
    fn read_of_missing_scope_is_an_error() {
        let (clock, reg, scopes, _) = fixture(0, 0, 1);
        let ctx = TimeContext { scheduler: &clock, precision: &reg, scopes: &scopes };
        let var = ScopedTimeValue::new(ScopeId(9), TimeVarKind::Scaled);
        assert!(matches!(
            var.read(ValueFormat::DecStr, &ctx),
            Err(TimeError::UnknownScope { scope: ScopeId(9) })
        ));
    }
}
