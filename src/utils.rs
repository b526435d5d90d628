use std::ops::{BitAnd, Shl, Shr};

use num::Integer;

/// Make an n_bits-long mask (all ones)
///
/// n_bits must be smaller than the width of T (use T::MAX for a
/// full-width mask).
pub fn mask<T>(n_bits: T) -> T
where
    T: Integer + Shl<Output = T>,
{
    (T::one() << n_bits) - T::one()
}

/// Obtain value[end:start] (verilog notation) from value
pub fn extract_field<T>(value: T, end: T, start: T) -> T
where
    T: Copy + Integer + Shl<Output = T> + Shr<Output = T> + BitAnd<Output = T>,
{
    mask(end - start + T::one()) & (value >> start)
}

/// Return value[n] (verilog notation) as a bool
pub fn bit_set<T>(value: T, n: T) -> bool
where
    T: Copy + Integer + Shr<Output = T> + BitAnd<Output = T>,
{
    T::one() & (value >> n) == T::one()
}

pub fn interpret_u32_as_signed(value: u32) -> i32 {
    i32::from_ne_bytes(value.to_ne_bytes())
}

pub fn interpret_i32_as_unsigned(value: i32) -> u32 {
    u32::from_ne_bytes(value.to_ne_bytes())
}

pub fn interpret_u64_as_signed(value: u64) -> i64 {
    i64::from_ne_bytes(value.to_ne_bytes())
}

pub fn interpret_i64_as_unsigned(value: i64) -> u64 {
    u64::from_ne_bytes(value.to_ne_bytes())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn check_mask() {
        assert_eq!(mask(4u32), 0xf);
        assert_eq!(mask(31u32), 0x7fff_ffff);
        assert_eq!(mask(34u64), 0x3_ffff_ffff);
    }

    #[test]
    fn check_extract_field() {
        // Selector digits of the multiplier stream
        assert_eq!(extract_field(0x89ab_cdefu32, 3, 0), 0xf);
        assert_eq!(extract_field(0x89ab_cdefu32, 31, 28), 0x8);
        assert_eq!(extract_field(0xdu32, 3, 2), 0x3);
        assert_eq!(extract_field(0xdu32, 1, 0), 0x1);
    }

    #[test]
    fn check_bit_set() {
        assert!(bit_set(0x8000_0000u32, 31));
        assert!(!bit_set(0x7fff_ffffu32, 31));
        assert!(bit_set(1u64 << 63, 63));
    }

    #[test]
    fn check_signed_reinterpretation() {
        assert_eq!(interpret_u32_as_signed(0xffff_fffc), -4);
        assert_eq!(interpret_i32_as_unsigned(-5), 0xffff_fffb);
        assert_eq!(interpret_u64_as_signed(0xffff_ffff_ffff_ffec), -20);
        assert_eq!(interpret_i64_as_unsigned(-1), u64::MAX);
    }
}
