//! Divide controller
//!
//! Unsigned division, one quotient bit per stage. The dividend sits
//! in the high word of the accumulator, and the quotient bits are
//! accumulated in the low word as they are produced.
//!
//! Initialisation normalises both operands. The divisor is shifted
//! left until bit 31 is set, counting the stage up once per shift,
//! and the dividend is shifted left until bit 63 of the accumulator
//! is set, counting the stage down once per shift. The stage counter
//! is then the bit number of the most significant quotient bit (or
//! negative if the quotient is zero).
//!
//! Each stage tries to subtract the divisor (in the high word) from
//! the accumulator. If the difference is non-negative the quotient
//! bit for this stage is set and the difference is kept; otherwise
//! the accumulator is left alone. The divisor then moves right by
//! one bit for the next stage. Because the operands were normalised,
//! the difference is always within +/- 2^63, so its sign as a 64-bit
//! signed number is exact.
//!
//! The high word finishes holding the remainder shifted left by the
//! same amount as the dividend was; remainder() shifts it back.

use crate::{
    stage::combinational,
    trace::{TraceEvent, TraceSink},
    utils::{bit_set, extract_field, interpret_u64_as_signed},
};

use super::{MulDiv, MulDivError, State, ACCUMULATOR_TOP_BIT, MASK32, SIGN_BIT};

impl<T: TraceSink> MulDiv<T> {
    /// Begin an unsigned divide of a by b
    ///
    /// Returns DivisionByZero (leaving the unit reset) if b is zero,
    /// because a zero divisor can never be normalised. Any operation
    /// in flight is abandoned.
    pub fn divide_init(&mut self, a: u32, b: u32) -> Result<(), MulDivError> {
        self.reset();
        if b == 0 {
            return Err(MulDivError::DivisionByZero { dividend: a });
        }

        self.divisor = b;
        self.stage = 0;
        self.accumulator = u64::from(a) << 32;

        while !bit_set(self.divisor, SIGN_BIT) {
            self.divisor <<= 1;
            self.stage += 1;
        }

        if self.accumulator == 0 {
            // Zero dividend: quotient and remainder are already zero
            self.stage = -1;
        } else {
            while !bit_set(self.accumulator, ACCUMULATOR_TOP_BIT) {
                self.accumulator <<= 1;
                self.stage -= 1;
                self.dividend_shift += 1;
            }
        }
        self.state = State::Dividing;

        self.trace.event(TraceEvent::DivideInit {
            a,
            b,
            accumulator: self.accumulator,
            divisor: self.divisor,
            stage: self.stage,
        });
        Ok(())
    }

    /// Perform one divide stage. Returns true when the divide is
    /// complete (the stage counter has gone negative), or if there is
    /// no divide in flight.
    pub fn divide_step(&mut self) -> bool {
        if self.state != State::Dividing {
            return true;
        }

        // (divisor << 32) - accumulator
        let trial = combinational(1, u64::from(self.divisor), true, self.accumulator, 32);
        let difference = trial.wrapping_neg();
        let quotient_bit = self.stage >= 0 && interpret_u64_as_signed(difference) >= 0;
        if quotient_bit {
            self.accumulator = difference.wrapping_add(1 << self.stage);
        }
        self.divisor >>= 1;

        self.trace.event(TraceEvent::DivideStep {
            stage: self.stage,
            quotient_bit,
            accumulator: self.accumulator,
            divisor: self.divisor,
        });

        self.stage -= 1;
        let done = self.stage < 0;
        if done {
            self.state = State::Done;
        }
        done
    }

    /// The quotient (low word of the accumulator). Only valid once
    /// divide_step() has returned true.
    pub fn quotient(&self) -> u32 {
        (MASK32 & self.accumulator) as u32
    }

    /// The remainder (high word of the accumulator, undoing the
    /// dividend normalisation). Only valid once divide_step() has
    /// returned true.
    pub fn remainder(&self) -> u32 {
        let high = extract_field(self.accumulator, 63, 32);
        (high >> self.dividend_shift) as u32
    }
}
