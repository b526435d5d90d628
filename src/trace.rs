//! Register trace output
//!
//! The engine never prints. Instead, every initialisation and every
//! stage is reported to a TraceSink owned by the engine, which the
//! caller chooses when the engine is made. Events carry the register
//! values after the update, so a test bench can line them up against
//! the waveform of the circuit under test.

use std::fmt;

use crate::muldiv::SignMode;

/// One register update of the multiply/divide unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    MultiplyInit {
        a: u32,
        b: u32,
        mode: SignMode,
        accumulator: u64,
    },
    MultiplyStep {
        stage: i32,
        selector: u32,
        accumulator: u64,
        multiplier: u32,
    },
    DivideInit {
        a: u32,
        b: u32,
        accumulator: u64,
        divisor: u32,
        stage: i32,
    },
    DivideStep {
        stage: i32,
        quotient_bit: bool,
        accumulator: u64,
        divisor: u32,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TraceEvent::MultiplyInit {
                a,
                b,
                mode,
                accumulator,
            } => write!(f, "{a:08x}*{b:08x} {mode}  {accumulator:016x}"),
            TraceEvent::MultiplyStep {
                stage,
                selector,
                accumulator,
                multiplier,
            } => write!(
                f,
                "mul {stage} {selector:x}  {accumulator:016x} {multiplier:08x}"
            ),
            TraceEvent::DivideInit {
                a,
                b,
                accumulator,
                divisor,
                stage,
            } => write!(f, "{a:08x} {b:08x}  {accumulator:016x} {divisor:08x} {stage}"),
            TraceEvent::DivideStep {
                stage,
                quotient_bit,
                accumulator,
                divisor,
            } => {
                let bit = u8::from(quotient_bit);
                write!(f, "div {stage} {bit}  {accumulator:016x} {divisor:08x}")
            }
        }
    }
}

/// Destination for trace events
pub trait TraceSink {
    fn event(&mut self, event: TraceEvent);
}

/// Discards all events. This is the default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn event(&mut self, _event: TraceEvent) {}
}

/// Record every event, in order
impl TraceSink for Vec<TraceEvent> {
    fn event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Forward events to the tracing crate at TRACE level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn event(&mut self, event: TraceEvent) {
        tracing::trace!(target: "muldiv", "{event}");
    }
}

/// Call a closure for every event
pub struct FnSink<F>(pub F);

impl<F> TraceSink for FnSink<F>
where
    F: FnMut(&TraceEvent),
{
    fn event(&mut self, event: TraceEvent) {
        (self.0)(&event)
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn event(&mut self, event: TraceEvent) {
        (**self).event(event)
    }
}
