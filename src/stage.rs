//! Combinational partial-product stage
//!
//! This is the only piece of arithmetic in the multiply/divide unit
//! that is not a register transfer. On every clock the controllers
//! present it with a 4-bit digit selector, the operand register
//! (areg), the current accumulator and a shift amount, and it
//! produces the next accumulator value.
//!
//! The selector is decoded as two radix-4 digits:
//!
//! * selector[1:0] picks one of 0, 1x, 2x or 3x areg
//! * selector[3:2] picks one of 0, 4x, 8x or 12x areg
//!
//! The 3x multiple is the only one that needs an adder (1x + 2x);
//! the rest are wiring. The two selected multiples are summed, shifted
//! left, and either added to the accumulator or have the accumulator
//! subtracted from them. All arithmetic wraps at 64 bits.

use crate::utils::{extract_field, mask};

/// Width of the operand register presented to the stage
pub const AREG_BITS: u64 = 34;

/// Select one of four partial products using a 2-bit field
fn select(field: u32, products: [u64; 4]) -> u64 {
    products[field as usize]
}

/// The unshifted sum of the two partial products chosen by
/// selector. At most 38 bits wide (12 times a 34-bit operand).
pub fn partial_product(selector: u32, areg: u64) -> u64 {
    let areg = mask(AREG_BITS) & areg;
    let times_1 = areg;
    let times_2 = areg << 1;
    let times_3 = times_1 + times_2;

    let sel_0123 = extract_field(selector, 1, 0);
    let sel_048c = extract_field(selector, 3, 2);
    let mux_0123 = select(sel_0123, [0, times_1, times_2, times_3]);
    let mux_048c = select(sel_048c, [0, times_1 << 2, times_2 << 2, times_3 << 2]);
    mux_0123 + mux_048c
}

/// Compute the next accumulator value
///
/// With subtract clear the result is (partial << shift) + accumulator.
/// With subtract set the result is (partial << shift) - accumulator,
/// i.e. the accumulator is the subtrahend. Bits shifted beyond bit 63
/// are lost, and a shift of 64 or more discards the partial product
/// entirely.
pub fn combinational(
    selector: u32,
    areg: u64,
    subtract: bool,
    accumulator: u64,
    shift: u32,
) -> u64 {
    let shifted = partial_product(selector, areg)
        .checked_shl(shift)
        .unwrap_or(0);
    if subtract {
        shifted.wrapping_sub(accumulator)
    } else {
        shifted.wrapping_add(accumulator)
    }
}
