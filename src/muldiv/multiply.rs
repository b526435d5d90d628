//! Multiply controller
//!
//! The multiplier register is consumed four bits per stage, least
//! significant digit first, so a 32-bit multiply takes 8 stages. The
//! combinational stage only knows about unsigned operands; signed
//! operands are handled by folding a correction into the accumulator
//! before the first stage and having the first stage subtract it.
//!
//! If a is negative and treated as signed, reading it as unsigned
//! overstates the product by b << 32. Likewise a negative signed b
//! overstates it by a << 32. Both are loaded into the accumulator at
//! initialisation (the first as the accumulator value, the second
//! through the stage as a 1x partial product shifted by 32) so that
//! the subtracting first stage removes them. When both operands are
//! signed the two terms also overlap in a 2^64 multiple, which is
//! cancelled by dropping bit 31 of each term.

use std::fmt;

use crate::{
    stage::combinational,
    trace::{TraceEvent, TraceSink},
    utils::{bit_set, extract_field},
};

use super::{MulDiv, State, MASK31, MULTIPLY_STAGES, SIGN_BIT};

/// Which operands of a multiply are two's-complement signed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignMode {
    /// unsigned a, unsigned b
    #[default]
    Unsigned,
    /// signed a, unsigned b
    SignedLeft,
    /// unsigned a, signed b
    SignedRight,
    /// signed a, signed b
    SignedBoth,
}

impl SignMode {
    pub const ALL: [SignMode; 4] = [
        SignMode::Unsigned,
        SignMode::SignedBoth,
        SignMode::SignedRight,
        SignMode::SignedLeft,
    ];

    /// Convert the pair of sign flags used by the circuit
    pub fn from_flags(signed_a: bool, signed_b: bool) -> Self {
        match (signed_a, signed_b) {
            (false, false) => SignMode::Unsigned,
            (true, false) => SignMode::SignedLeft,
            (false, true) => SignMode::SignedRight,
            (true, true) => SignMode::SignedBoth,
        }
    }

    pub fn signed_a(self) -> bool {
        matches!(self, SignMode::SignedLeft | SignMode::SignedBoth)
    }

    pub fn signed_b(self) -> bool {
        matches!(self, SignMode::SignedRight | SignMode::SignedBoth)
    }
}

impl fmt::Display for SignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = if self.signed_a() { 's' } else { 'u' };
        let b = if self.signed_b() { 's' } else { 'u' };
        write!(f, "{a}{b}")
    }
}

/// Return (accumulator bias, additive correction) for a multiply of
/// a by b. The bias is already placed in the high word.
fn sign_corrections(a: u32, b: u32, mode: SignMode) -> (u64, u64) {
    let bias = if mode.signed_a() && bit_set(a, SIGN_BIT) {
        let b = if mode.signed_b() { MASK31 & b } else { b };
        u64::from(b) << 32
    } else {
        0
    };
    let correction = if mode.signed_b() && bit_set(b, SIGN_BIT) {
        let a = if mode.signed_a() { MASK31 & a } else { a };
        u64::from(a)
    } else {
        0
    };
    (bias, correction)
}

impl<T: TraceSink> MulDiv<T> {
    /// Begin a multiply of a by b
    ///
    /// Loads the multiplier and multiplicand, resets the stage counter
    /// and loads the accumulator with the sign correction for mode
    /// (zero for an unsigned multiply). Any operation in flight is
    /// abandoned.
    pub fn multiply_init(&mut self, a: u32, b: u32, mode: SignMode) {
        self.reset();
        self.multiplier = a;
        self.multiplicand = u64::from(b);
        self.stage = 0;

        let (bias, correction) = sign_corrections(a, b, mode);
        self.accumulator = combinational(1, correction, false, bias, 32);
        self.state = State::Multiplying;

        self.trace.event(TraceEvent::MultiplyInit {
            a,
            b,
            mode,
            accumulator: self.accumulator,
        });
    }

    /// Perform one multiply stage. Returns true when the multiply is
    /// complete (always on the 8th stage), or if there is no multiply
    /// in flight.
    pub fn multiply_step(&mut self) -> bool {
        if self.state != State::Multiplying {
            return true;
        }

        // First stage subtracts the accumulator to remove the bias
        let selector = extract_field(self.multiplier, 3, 0);
        let shift = u32::try_from(4 * self.stage).unwrap_or(u32::MAX);
        self.accumulator = combinational(
            selector,
            self.multiplicand,
            self.stage == 0,
            self.accumulator,
            shift,
        );
        self.multiplier >>= 4;

        self.trace.event(TraceEvent::MultiplyStep {
            stage: self.stage,
            selector,
            accumulator: self.accumulator,
            multiplier: self.multiplier,
        });

        self.stage += 1;
        let done = self.stage >= MULTIPLY_STAGES;
        if done {
            self.state = State::Done;
        }
        done
    }

    /// The 64-bit product. Only valid once multiply_step() has
    /// returned true.
    pub fn product(&self) -> u64 {
        self.accumulator
    }
}
