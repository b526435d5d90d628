#![forbid(unsafe_code)]

//! Cycle-level model of a bit-serial multiply/divide unit
//!
//! The model steps through the same register states as the staged
//! circuit (radix-4 multiply, non-restoring divide), so that it can
//! be used as the reference when verifying the circuit.

pub mod muldiv;
pub mod stage;
pub mod trace;
pub mod vectors;

pub mod utils;

pub use muldiv::{MulDiv, MulDivError, Registers, SignMode, State};
pub use trace::{NoTrace, TraceEvent, TraceSink, TracingSink};
