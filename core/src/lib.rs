//! Simulation-time values for a discrete-event HDL simulator: the 64-bit
//! clock, the run precision, and the `$time` pseudo-variable each scope
//! exposes to procedural-interface clients.

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod kernel;
pub mod precision;
pub mod scope;
pub mod time_var;
pub mod types;
pub mod value;

pub use codec::{decode, encode, StructuredTime};
pub use error::{TimeError, TimeResult};
pub use kernel::SimKernel;
pub use types::{Handle, ScopeId, SimTime, TimeExponent};
pub use value::{Property, Value, ValueFormat};
