use std::fmt;

/// Snapshot of the registers of the multiply/divide unit
///
/// Intended for comparing the model against the circuit after each
/// clock. The stage counter is signed because the divide controller
/// counts it down past zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub accumulator: u64,
    pub multiplier: u32,
    pub multiplicand: u64,
    pub divisor: u32,
    pub stage: i32,
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "acc:          {:016x}", self.accumulator)?;
        writeln!(f, "multiplier:   {:08x}", self.multiplier)?;
        writeln!(f, "multiplicand: {:09x}", self.multiplicand)?;
        writeln!(f, "divisor:      {:08x}", self.divisor)?;
        write!(f, "stage:        {}", self.stage)
    }
}
