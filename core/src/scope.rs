//! The scope table: the design hierarchy as far as time is concerned.
//!
//! Scopes are append-only. Other objects refer to a scope by `ScopeId`,
//! never by reference, so the table stays the single owner.

use crate::{
    error::{TimeError, TimeResult},
    types::{Handle, ScopeId, TimeExponent},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scope {
    pub name:       String,
    pub parent:     Option<ScopeId>,
    pub time_units: TimeExponent,
    /// The `$time` variable bound to this scope, once bound.
    pub time_var:   Option<Handle>,
}

#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        parent: Option<ScopeId>,
        time_units: TimeExponent,
    ) -> TimeResult<ScopeId> {
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            name: name.into(),
            parent,
            time_units,
            time_var: None,
        });
        Ok(id)
    }

    pub fn get(&self, id: ScopeId) -> TimeResult<&Scope> {
        self.scopes
            .get(id.0)
            .ok_or(TimeError::UnknownScope { scope: id })
    }

    pub fn get_mut(&mut self, id: ScopeId) -> TimeResult<&mut Scope> {
        self.scopes
            .get_mut(id.0)
            .ok_or(TimeError::UnknownScope { scope: id })
    }

    /// Look up a scope by its dotted hierarchical name.
    pub fn find(&self, full_name: &str) -> Option<ScopeId> {
        (0..self.scopes.len())
            .map(ScopeId)
            .find(|id| self.full_name(*id).as_deref() == Some(full_name))
    }

    /// Dotted path from the root, e.g. `top.cpu.alu`.
    pub fn full_name(&self, id: ScopeId) -> Option<String> {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let scope = self.scopes.get(current.0)?;
            parts.push(scope.name.as_str());
            cursor = scope.parent;
        }
        parts.reverse();
        Some(parts.join("."))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_dotted_names() {
        let mut table = ScopeTable::new();
        let top = table.insert("top", None, -9).unwrap();
        let cpu = table.insert("cpu", Some(top), -9).unwrap();
        let alu = table.insert("alu", Some(cpu), -12).unwrap();
        assert_eq!(table.full_name(alu).as_deref(), Some("top.cpu.alu"));
        assert_eq!(table.find("top.cpu"), Some(cpu));
        assert_eq!(table.find("cpu"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn rejects_unknown_parent() {
        let mut table = ScopeTable::new();
        let err = table.insert("orphan", Some(ScopeId(4)), 0).unwrap_err();
        assert!(matches!(err, TimeError::UnknownScope { scope: ScopeId(4) }));
        assert!(table.is_empty());
    }
}
