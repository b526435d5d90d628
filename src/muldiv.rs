use thiserror::Error;

use crate::trace::{NoTrace, TraceSink};

pub use self::{multiply::SignMode, registers::Registers};

pub mod divide;
pub mod multiply;
pub mod registers;

/// Mask for the low word of the accumulator
pub const MASK32: u64 = 0xffff_ffff;

/// Mask applied to a signed operand when both operands are signed
pub const MASK31: u32 = 0x7fff_ffff;

/// Bit number of the sign bit of a 32-bit operand
pub const SIGN_BIT: u32 = 31;

/// Bit number of the most significant bit of the accumulator
pub const ACCUMULATOR_TOP_BIT: u64 = 63;

/// Number of stages in a multiply (4 multiplier bits per stage)
pub const MULTIPLY_STAGES: i32 = 8;

/// Upper bound on the number of stages in a divide. The stage
/// counter starts at most at 31 (divisor of 1) and counts down to -1.
pub const MAX_DIVIDE_STAGES: usize = 32;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulDivError {
    #[error("attempted to divide {dividend:#010x} by zero")]
    DivisionByZero { dividend: u32 },
    #[error("operation did not signal completion within {steps} steps")]
    Incomplete { steps: usize },
}

/// What the unit is currently doing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Reset, nothing in flight
    #[default]
    Ready,
    Multiplying,
    Dividing,
    /// Result registers are valid
    Done,
}

/// Bit-serial multiply/divide unit
///
/// This models the registers of a staged multiply/divide circuit,
/// which shares one 64-bit accumulator and one combinational
/// partial-product stage between two controllers:
///
/// * multiply: radix-4 partial products, 4 multiplier bits per
///   stage, 8 stages per 32-bit multiply, with two's-complement sign
///   correction folded into the accumulator at initialisation
/// * divide: unsigned non-restoring division, one quotient bit per
///   stage, with the number of stages fixed by normalising the
///   divisor and dividend at initialisation
///
/// Use is a busy/done handshake: call one of the init functions,
/// then call the matching step function until it returns true, then
/// read the result. Each call to a step function is one clock of the
/// circuit, so the registers can be compared against the circuit
/// after every step.
///
/// Register updates are reported to the trace sink T. The default
/// sink discards them.
#[derive(Debug, Default, Clone)]
pub struct MulDiv<T = NoTrace> {
    accumulator: u64,
    multiplier: u32,
    multiplicand: u64,
    divisor: u32,
    stage: i32,
    dividend_shift: u32,
    state: State,
    trace: T,
}

impl MulDiv<NoTrace> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: TraceSink> MulDiv<T> {
    /// Make a unit that reports register updates to trace
    pub fn with_trace(trace: T) -> Self {
        Self {
            accumulator: 0,
            multiplier: 0,
            multiplicand: 0,
            divisor: 0,
            stage: 0,
            dividend_shift: 0,
            state: State::Ready,
            trace,
        }
    }

    /// Return all registers to zero and the unit to the Ready state.
    /// The trace sink is kept.
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.multiplier = 0;
        self.multiplicand = 0;
        self.divisor = 0;
        self.stage = 0;
        self.dividend_shift = 0;
        self.state = State::Ready;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn accumulator(&self) -> u64 {
        self.accumulator
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn multiplicand(&self) -> u64 {
        self.multiplicand
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    pub fn stage(&self) -> i32 {
        self.stage
    }

    /// Snapshot of every register
    pub fn registers(&self) -> Registers {
        Registers {
            accumulator: self.accumulator,
            multiplier: self.multiplier,
            multiplicand: self.multiplicand,
            divisor: self.divisor,
            stage: self.stage,
        }
    }

    pub fn trace(&self) -> &T {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut T {
        &mut self.trace
    }

    pub fn into_trace(self) -> T {
        self.trace
    }

    /// Step the multiply in flight until it completes, returning the
    /// number of steps taken
    pub fn run_multiply(&mut self) -> Result<usize, MulDivError> {
        run_until_done(self, Self::multiply_step, MULTIPLY_STAGES as usize)
    }

    /// Step the divide in flight until it completes, returning the
    /// number of steps taken
    pub fn run_divide(&mut self) -> Result<usize, MulDivError> {
        run_until_done(self, Self::divide_step, MAX_DIVIDE_STAGES)
    }

    /// Multiply a by b from start to finish and return the product
    pub fn multiply(&mut self, a: u32, b: u32, mode: SignMode) -> Result<u64, MulDivError> {
        self.multiply_init(a, b, mode);
        self.run_multiply()?;
        Ok(self.product())
    }

    /// Divide a by b from start to finish and return the pair
    /// (quotient, remainder)
    pub fn divide(&mut self, a: u32, b: u32) -> Result<(u32, u32), MulDivError> {
        self.divide_init(a, b)?;
        self.run_divide()?;
        Ok((self.quotient(), self.remainder()))
    }
}

fn run_until_done<U>(
    unit: &mut U,
    step: fn(&mut U) -> bool,
    bound: usize,
) -> Result<usize, MulDivError> {
    for steps in 1..=bound {
        if step(unit) {
            return Ok(steps);
        }
    }
    Err(MulDivError::Incomplete { steps: bound })
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::trace::TraceEvent;

    #[test]
    fn check_new_unit_is_ready_and_zero() {
        let unit = MulDiv::new();
        assert_eq!(unit.state(), State::Ready);
        assert_eq!(unit.registers(), Registers::default());
    }

    #[test]
    fn check_reset_clears_registers() {
        let mut unit = MulDiv::new();
        unit.multiply_init(0xdead_beef, 0x1234_5670, SignMode::SignedBoth);
        unit.multiply_step();
        unit.reset();
        assert_eq!(unit.state(), State::Ready);
        assert_eq!(unit.registers(), Registers::default());
    }

    #[test]
    fn check_reset_keeps_trace() {
        let mut unit = MulDiv::with_trace(Vec::<TraceEvent>::new());
        unit.multiply(4, 5, SignMode::Unsigned).unwrap();
        unit.reset();
        assert_eq!(unit.trace().len(), 9);
    }

    #[test]
    fn check_steps_without_operation_are_idle() {
        let mut unit = MulDiv::new();
        assert!(unit.multiply_step());
        assert!(unit.divide_step());
        assert_eq!(unit.registers(), Registers::default());
    }

    #[test]
    fn check_divide_step_does_not_advance_multiply() {
        let mut unit = MulDiv::new();
        unit.multiply_init(3, 7, SignMode::Unsigned);
        let before = unit.registers();
        assert!(unit.divide_step());
        assert_eq!(unit.registers(), before);
        assert_eq!(unit.state(), State::Multiplying);
    }

    #[test]
    fn check_run_helpers_report_steps() {
        let mut unit = MulDiv::new();
        unit.multiply_init(1, 1, SignMode::Unsigned);
        assert_eq!(unit.run_multiply(), Ok(8));
        unit.divide_init(0xffff_ffff, 1).unwrap();
        assert_eq!(unit.run_divide(), Ok(32));
    }

    #[test]
    fn check_division_by_zero_error_message() {
        let err = MulDiv::new().divide(0x1234, 0).unwrap_err();
        assert_eq!(err, MulDivError::DivisionByZero { dividend: 0x1234 });
        assert_eq!(err.to_string(), "attempted to divide 0x00001234 by zero");
    }
}
