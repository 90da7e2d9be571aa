use crate::types::{Handle, ScopeId, SimTime, TimeExponent};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Unsupported property code {code} for a time variable")]
    UnsupportedProperty { code: i32 },

    #[error("Unsupported value format code {code} for a time variable")]
    UnsupportedFormat { code: i32 },

    #[error("No object registered for {handle}")]
    UnknownHandle { handle: Handle },

    #[error("No scope registered for {scope}")]
    UnknownScope { scope: ScopeId },

    #[error("{scope} has no time variable bound")]
    NotBound { scope: ScopeId },

    #[error("Handle space exhausted after {registered} objects")]
    HandlesExhausted { registered: usize },

    #[error("{scope} already has a time variable bound")]
    AlreadyBound { scope: ScopeId },

    #[error("{scope} units 1e{units} are finer than the run precision 1e{precision}")]
    UnitsFinerThanPrecision {
        scope:     ScopeId,
        units:     TimeExponent,
        precision: TimeExponent,
    },

    #[error("Clock cannot move backwards: current {current}, requested {requested}")]
    TimeWentBackwards { current: SimTime, requested: SimTime },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type TimeResult<T> = Result<T, TimeError>;
