//! The simulation kernel: owner of the clock, the run precision, the
//! scope table and every registered time variable.
//!
//! RULES:
//!   - Precision is applied before any scope is created.
//!   - A scope's units may never be finer than the precision.
//!   - Each scope gets exactly one `$time` variable, bound at creation.
//!   - Clients reach time variables only through their `Handle`.

use crate::{
    clock::{SimClock, SimScheduler},
    config::RunConfig,
    error::{TimeError, TimeResult},
    precision::PrecisionRegistry,
    scope::{Scope, ScopeTable},
    time_var::{ScopedTimeValue, TimeContext, TimeVarKind},
    types::{Handle, ScopeId, SimTime, TimeExponent},
    value::{Property, Value, ValueFormat},
};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SimKernel {
    clock:         SimClock,
    precision:     PrecisionRegistry,
    scopes:        ScopeTable,
    handles:       Vec<ScopedTimeValue>,
    sim_time_vars: HashMap<ScopeId, Handle>,
}

impl SimKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a kernel from a run configuration: precision first, then
    /// scopes in file order. A parent is named by its dotted full name
    /// and must appear before its children.
    pub fn from_config(config: &RunConfig) -> TimeResult<Self> {
        let mut kernel = SimKernel::new();
        if let Some(precision) = config.precision {
            kernel.set_precision(precision);
        }
        for scope in &config.scopes {
            let parent = match scope.parent.as_deref() {
                Some(name) => Some(kernel.scopes.find(name).ok_or_else(|| {
                    TimeError::Config(format!(
                        "scope '{}' names unknown parent '{name}'",
                        scope.name
                    ))
                })?),
                None => None,
            };
            let id = kernel.create_scope(&scope.name, parent, scope.units)?;
            let full_name = kernel
                .scopes
                .full_name(id)
                .unwrap_or_else(|| scope.name.clone());
            log::debug!("Configured scope {full_name} ({id})");
        }
        Ok(kernel)
    }

    // ── Precision ──────────────────────────────────────────────

    pub fn set_precision(&mut self, precision: TimeExponent) {
        self.precision.set_precision(precision);
    }

    pub fn get_precision(&self) -> TimeExponent {
        self.precision.get_precision()
    }

    // ── Clock ──────────────────────────────────────────────────

    pub fn current_time(&self) -> SimTime {
        self.clock.current_time()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn advance_to(&mut self, t: SimTime) -> TimeResult<SimTime> {
        self.clock.advance_to(t)
    }

    // ── Scopes ─────────────────────────────────────────────────

    /// Create a scope and bind its `$time` variable.
    pub fn create_scope(
        &mut self,
        name: &str,
        parent: Option<ScopeId>,
        time_units: TimeExponent,
    ) -> TimeResult<ScopeId> {
        self.check_units(ScopeId(self.scopes.len()), time_units)?;
        let id = self.scopes.insert(name, parent, time_units)?;
        self.bind_to_scope(id)?;
        Ok(id)
    }

    pub fn scope(&self, id: ScopeId) -> TimeResult<&Scope> {
        self.scopes.get(id)
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    /// Install a `$time` variable as the scope's time pseudo-variable.
    /// Each scope can be bound once.
    pub fn bind_to_scope(&mut self, id: ScopeId) -> TimeResult<Handle> {
        let scope = self.scopes.get(id)?;
        if scope.time_var.is_some() {
            return Err(TimeError::AlreadyBound { scope: id });
        }
        self.check_units(id, scope.time_units)?;

        let handle = self.register(ScopedTimeValue::new(id, TimeVarKind::Scaled))?;
        self.scopes.get_mut(id)?.time_var = Some(handle);
        log::debug!("Bound $time for {id} as {handle}");
        Ok(handle)
    }

    /// Handle of the unscaled `$simtime` variable for a scope, created on
    /// first request.
    pub fn bind_sim_time(&mut self, id: ScopeId) -> TimeResult<Handle> {
        self.scopes.get(id)?;
        if let Some(handle) = self.sim_time_vars.get(&id) {
            return Ok(*handle);
        }
        let handle = self.register(ScopedTimeValue::new(id, TimeVarKind::Unscaled))?;
        self.sim_time_vars.insert(id, handle);
        log::debug!("Bound $simtime for {id} as {handle}");
        Ok(handle)
    }

    /// The `$time` handle bound to a scope.
    pub fn time_var(&self, id: ScopeId) -> TimeResult<Handle> {
        self.scopes
            .get(id)?
            .time_var
            .ok_or(TimeError::NotBound { scope: id })
    }

    // ── Dispatch ───────────────────────────────────────────────

    pub fn object(&self, handle: Handle) -> TimeResult<&ScopedTimeValue> {
        self.handles
            .get(handle.0 as usize)
            .ok_or(TimeError::UnknownHandle { handle })
    }

    pub fn get(&self, handle: Handle, property: Property) -> TimeResult<i32> {
        self.object(handle)?.describe(property)
    }

    pub fn get_value(&self, handle: Handle, format: ValueFormat) -> TimeResult<Value> {
        let ctx = TimeContext {
            scheduler: &self.clock,
            precision: &self.precision,
            scopes:    &self.scopes,
        };
        self.object(handle)?.read(format, &ctx)
    }

    /// `get` for callers holding a raw property code.
    pub fn get_by_code(&self, handle: Handle, code: i32) -> TimeResult<i32> {
        self.get(handle, Property::from_code(code)?)
    }

    /// `get_value` for callers holding a raw format code.
    pub fn get_value_by_code(&self, handle: Handle, code: i32) -> TimeResult<Value> {
        self.get_value(handle, ValueFormat::from_code(code)?)
    }

    fn register(&mut self, var: ScopedTimeValue) -> TimeResult<Handle> {
        let handle = next_handle(self.handles.len())?;
        self.handles.push(var);
        Ok(handle)
    }

    fn check_units(&self, id: ScopeId, units: TimeExponent) -> TimeResult<()> {
        if !self.precision.is_set() {
            return Ok(());
        }
        let precision = self.precision.get_precision();
        if units < precision {
            return Err(TimeError::UnitsFinerThanPrecision { scope: id, units, precision });
        }
        Ok(())
    }
}

fn next_handle(registered: usize) -> TimeResult<Handle> {
    u32::try_from(registered)
        .map(Handle)
        .map_err(|_| TimeError::HandlesExhausted { registered })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_dense_indices() {
        assert_eq!(next_handle(0).unwrap(), Handle(0));
        assert_eq!(next_handle(u32::MAX as usize).unwrap(), Handle(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn handle_overflow_is_an_error() {
        let registered = u32::MAX as usize + 1;
        assert!(matches!(
            next_handle(registered),
            Err(TimeError::HandlesExhausted { registered: r }) if r == registered
        ));
    }

    #[test]
    fn unbound_scope_reports_not_bound() {
        let mut kernel = SimKernel::new();
        let bare = kernel.scopes.insert("bare", None, 0).unwrap();
        assert!(matches!(
            kernel.time_var(bare),
            Err(TimeError::NotBound { scope }) if scope == bare
        ));
        let handle = kernel.bind_to_scope(bare).unwrap();
        assert_eq!(kernel.time_var(bare).unwrap(), handle);
    }
}
