#![forbid(unsafe_code)]

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(pub u32);

/// Millisecond-resolution monotonic instant supplied by the shell. The funnel
/// never reads a clock for step timing; every tick carries its own `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonotonicTimeMs(pub u64);

impl MonotonicTimeMs {
    pub fn saturating_add(self, delta_ms: u64) -> MonotonicTimeMs {
        MonotonicTimeMs(self.0.saturating_add(delta_ms))
    }

    pub fn saturating_since(self, earlier: MonotonicTimeMs) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolation {
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
        got: f64,
    },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}
