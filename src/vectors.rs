//! Regression vectors
//!
//! A test bench drives the same operand vectors through this model
//! and through the circuit. Each operand pair is expanded into every
//! combination of operand signs (and, for multiply, every sign mode),
//! and the expected result of each vector is computed directly so
//! that the model itself can be checked.
//!
//! Each vector is run on a fresh unit.

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::{
    muldiv::{MulDiv, MulDivError, SignMode},
    utils::{interpret_i64_as_unsigned, interpret_u32_as_signed},
};

/// Operand pairs exercised by the circuit test bench
pub const REFERENCE_OPERANDS: [(u32, u32); 7] = [
    (4, 5),
    (0x4000_0000, 5),
    (5, 0x4000_0000),
    (0x89ab_cdef, 5),
    (5, 0x89ab_cdef),
    (0x1234_5670, 0xdead_beef),
    (0xdead_beef, 0x1234_5670),
];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    #[error("divide vector {a:08x}/00000000 has a zero divisor")]
    ZeroDivisor { a: u32 },
    #[error("model failed: {0}")]
    Model(MulDivError),
}

impl From<MulDivError> for VectorError {
    fn from(e: MulDivError) -> Self {
        Self::Model(e)
    }
}

/// The four sign-of-operand variants of (a, b): (a, b), (-a, b),
/// (a, -b) and (-a, -b), negated in 32-bit two's complement
pub fn operand_variants(a: u32, b: u32) -> [(u32, u32); 4] {
    [
        (a, b),
        (a.wrapping_neg(), b),
        (a, b.wrapping_neg()),
        (a.wrapping_neg(), b.wrapping_neg()),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyVector {
    pub a: u32,
    pub b: u32,
    pub mode: SignMode,
    pub expected: u64,
}

impl MultiplyVector {
    pub fn new(a: u32, b: u32, mode: SignMode) -> Self {
        let signed_or_not = |value: u32, signed: bool| {
            if signed {
                i64::from(interpret_u32_as_signed(value))
            } else {
                i64::from(value)
            }
        };
        let product = signed_or_not(a, mode.signed_a()).wrapping_mul(signed_or_not(b, mode.signed_b()));
        Self {
            a,
            b,
            mode,
            expected: interpret_i64_as_unsigned(product),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideVector {
    pub a: u32,
    pub b: u32,
    pub quotient: u32,
    pub remainder: u32,
}

impl DivideVector {
    pub fn new(a: u32, b: u32) -> Result<Self, VectorError> {
        if b == 0 {
            return Err(VectorError::ZeroDivisor { a });
        }
        Ok(Self {
            a,
            b,
            quotient: a / b,
            remainder: a % b,
        })
    }
}

/// All sixteen multiply vectors for an operand pair: each sign
/// mode applied to each sign-of-operand variant
pub fn multiply_vectors(a: u32, b: u32) -> Vec<MultiplyVector> {
    SignMode::ALL
        .into_iter()
        .cartesian_product(operand_variants(a, b))
        .map(|(mode, (a, b))| MultiplyVector::new(a, b, mode))
        .collect()
}

/// The four divide vectors for an operand pair
pub fn divide_vectors(a: u32, b: u32) -> Result<Vec<DivideVector>, VectorError> {
    operand_variants(a, b)
        .into_iter()
        .map(|(a, b)| DivideVector::new(a, b))
        .collect()
}

/// Whether the model agreed with the expected result
pub trait Checked {
    fn matches(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplyOutcome {
    pub vector: MultiplyVector,
    pub product: u64,
}

impl Checked for MultiplyOutcome {
    fn matches(&self) -> bool {
        self.product == self.vector.expected
    }
}

impl fmt::Display for MultiplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let MultiplyVector {
            a,
            b,
            mode,
            expected,
        } = self.vector;
        let signed_a = interpret_u32_as_signed(a);
        let signed_b = interpret_u32_as_signed(b);
        let product = self.product;
        let err = if self.matches() { "" } else { "DIFFERENT" };
        write!(
            f,
            "{a:08x}*{b:08x} {mode} : {signed_a:>13} * {signed_b:>13} : {product:016x}  ({expected:016x}) {err}"
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideOutcome {
    pub vector: DivideVector,
    pub quotient: u32,
    pub remainder: u32,
}

impl Checked for DivideOutcome {
    fn matches(&self) -> bool {
        self.quotient == self.vector.quotient && self.remainder == self.vector.remainder
    }
}

impl fmt::Display for DivideOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let DivideVector {
            a,
            b,
            quotient: expected_quotient,
            remainder: expected_remainder,
        } = self.vector;
        let signed_a = interpret_u32_as_signed(a);
        let signed_b = interpret_u32_as_signed(b);
        let (quotient, remainder) = (self.quotient, self.remainder);
        let err = if self.matches() { "" } else { "DIFFERENT" };
        write!(
            f,
            "{a:08x}/{b:08x} : {signed_a:>13} / {signed_b:>13} : {quotient:08x} {remainder:08x}  ({expected_quotient:08x} {expected_remainder:08x}) {err}"
        )
    }
}

/// Outcomes of a batch of vectors, in the order they were run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<O> {
    pub outcomes: Vec<O>,
}

impl<O: Checked> Report<O> {
    pub fn mismatches(&self) -> impl Iterator<Item = &O> {
        self.outcomes.iter().filter(|outcome| !outcome.matches())
    }

    pub fn all_match(&self) -> bool {
        self.mismatches().next().is_none()
    }
}

impl<O: fmt::Display> fmt::Display for Report<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outcomes.iter().join("\n"))
    }
}

/// Run each multiply vector on a fresh unit
pub fn check_multiply(vectors: &[MultiplyVector]) -> Result<Report<MultiplyOutcome>, VectorError> {
    let outcomes: Vec<MultiplyOutcome> = vectors
        .iter()
        .map(|&vector| -> Result<MultiplyOutcome, VectorError> {
            let product = MulDiv::new().multiply(vector.a, vector.b, vector.mode)?;
            Ok(MultiplyOutcome { vector, product })
        })
        .collect::<Result<_, _>>()?;
    Ok(Report { outcomes })
}

/// Run each divide vector on a fresh unit
pub fn check_divide(vectors: &[DivideVector]) -> Result<Report<DivideOutcome>, VectorError> {
    let outcomes: Vec<DivideOutcome> = vectors
        .iter()
        .map(|&vector| -> Result<DivideOutcome, VectorError> {
            let (quotient, remainder) = MulDiv::new().divide(vector.a, vector.b)?;
            Ok(DivideOutcome {
                vector,
                quotient,
                remainder,
            })
        })
        .collect::<Result<_, _>>()?;
    Ok(Report { outcomes })
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn check_operand_variants() {
        assert_eq!(
            operand_variants(4, 5),
            [
                (4, 5),
                (0xffff_fffc, 5),
                (4, 0xffff_fffb),
                (0xffff_fffc, 0xffff_fffb)
            ]
        );
    }

    #[test]
    fn check_sixteen_multiply_vectors() {
        let vectors = multiply_vectors(4, 5);
        assert_eq!(vectors.len(), 16);
        for mode in SignMode::ALL {
            assert_eq!(vectors.iter().filter(|v| v.mode == mode).count(), 4);
        }
        assert_eq!(vectors[0], MultiplyVector::new(4, 5, SignMode::Unsigned));
        assert_eq!(vectors[0].expected, 20);
    }

    #[test]
    fn check_expected_products() {
        assert_eq!(
            MultiplyVector::new(0xffff_fffc, 5, SignMode::Unsigned).expected,
            0x4_ffff_ffec
        );
        assert_eq!(
            MultiplyVector::new(0xffff_fffc, 5, SignMode::SignedBoth).expected,
            0xffff_ffff_ffff_ffec
        );
    }

    #[test]
    fn check_zero_divisor_vector_rejected() {
        assert_eq!(
            divide_vectors(3, 0),
            Err(VectorError::ZeroDivisor { a: 3 })
        );
    }

    #[test]
    fn check_mismatch_is_reported() {
        let vector = MultiplyVector::new(4, 5, SignMode::Unsigned);
        let report = Report {
            outcomes: vec![
                MultiplyOutcome {
                    vector,
                    product: 20,
                },
                MultiplyOutcome {
                    vector,
                    product: 21,
                },
            ],
        };
        assert!(!report.all_match());
        assert_eq!(report.mismatches().count(), 1);
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!lines[0].ends_with("DIFFERENT"));
        assert!(lines[1].ends_with("DIFFERENT"));
    }

    #[test]
    fn check_divide_outcome_layout() {
        let vector = DivideVector::new(4, 5).unwrap();
        let outcome = DivideOutcome {
            vector,
            quotient: 0,
            remainder: 4,
        };
        assert_eq!(
            outcome.to_string(),
            "00000004/00000005 :             4 /             5 : 00000000 00000004  (00000000 00000004) "
        );
    }

    #[test]
    fn check_reference_operands_multiply() {
        for (a, b) in REFERENCE_OPERANDS {
            let report = check_multiply(&multiply_vectors(a, b)).unwrap();
            assert_eq!(report.outcomes.len(), 16);
            assert!(report.all_match(), "{report}");
        }
    }

    #[test]
    fn check_reference_operands_divide() {
        for (a, b) in REFERENCE_OPERANDS {
            let report = check_divide(&divide_vectors(a, b).unwrap()).unwrap();
            assert_eq!(report.outcomes.len(), 4);
            assert!(report.all_match(), "{report}");
        }
    }

    #[test]
    fn check_edge_operands() {
        let edges = [0, 1, 0x7fff_ffff, 0x8000_0000, 0xffff_ffff];
        for (&a, &b) in edges.iter().cartesian_product(edges.iter()) {
            let report = check_multiply(&multiply_vectors(a, b)).unwrap();
            assert!(report.all_match(), "{report}");
            if b != 0 {
                let report = check_divide(&divide_vectors(a, b).unwrap()).unwrap();
                assert!(report.all_match(), "{report}");
            }
        }
    }
}
