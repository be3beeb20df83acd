//! Gate-argument sequences for TDMC
//!
//! A `GateSequence` holds one real control value per discrete time bin for
//! a single programmable gate. Padding and forcing helpers implement the
//! loop fill/drain transformations used by the compiler.

use crate::error::{TdmcError, TdmcResult};
use crate::types::TimeBin;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered per-time-bin control values for one gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GateSequence {
    values: Vec<f64>,
}

impl GateSequence {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from raw values
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Create a constant sequence
    pub fn constant(value: f64, len: usize) -> Self {
        Self {
            values: vec![value; len],
        }
    }

    /// Create an all-zero sequence
    pub fn zeros(len: usize) -> Self {
        Self::constant(0.0, len)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of time bins
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a time bin
    pub fn get(&self, bin: TimeBin) -> Option<f64> {
        self.values.get(bin).copied()
    }

    /// Borrow the raw values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over values
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Check that every entry is finite
    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// First bin holding a value outside `[min, max]`, if any
    pub fn first_out_of_range(&self, min: f64, max: f64) -> Option<(TimeBin, f64)> {
        self.values
            .iter()
            .enumerate()
            .find(|(_, &v)| v < min || v > max)
            .map(|(t, &v)| (t, v))
    }

    // ========================================================================
    // Padding and Forcing
    // ========================================================================

    /// Prepend `count` entries holding `value`
    pub fn prefix_pad(&self, count: usize, value: f64) -> Self {
        let mut values = vec![value; count];
        values.extend_from_slice(&self.values);
        Self { values }
    }

    /// Append `count` entries holding `value`
    pub fn suffix_pad(&self, count: usize, value: f64) -> Self {
        let mut values = self.values.clone();
        values.extend(std::iter::repeat(value).take(count));
        Self { values }
    }

    /// Overwrite the first `count` entries with `value`
    pub fn force_prefix(&self, count: usize, value: f64) -> Self {
        let mut values = self.values.clone();
        let n = count.min(values.len());
        for v in &mut values[..n] {
            *v = value;
        }
        Self { values }
    }

    /// Overwrite the last `count` entries with `value`
    pub fn force_suffix(&self, count: usize, value: f64) -> Self {
        let mut values = self.values.clone();
        let n = count.min(values.len());
        let start = values.len() - n;
        for v in &mut values[start..] {
            *v = value;
        }
        Self { values }
    }

    /// Add a constant offset to every entry
    pub fn shift_all(&self, offset: f64) -> Self {
        Self {
            values: self.values.iter().map(|v| v + offset).collect(),
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Fail with a structured error unless the sequence has length `expected`
    pub fn expect_len(&self, gate: &str, expected: usize) -> TdmcResult<()> {
        if self.values.len() != expected {
            return Err(TdmcError::SequenceLengthMismatch {
                gate: gate.to_string(),
                expected,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    /// Fail with a structured error unless every entry is finite
    pub fn expect_finite(&self, gate: &str) -> TdmcResult<()> {
        if let Some((bin, _)) = self
            .values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
            .map(|(t, &v)| (t, v))
        {
            return Err(TdmcError::NonFiniteValue {
                gate: gate.to_string(),
                bin,
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for GateSequence {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl fmt::Display for GateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GateSequence(len={})", self.values.len())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let seq = GateSequence::constant(0.5, 4);
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.get(3), Some(0.5));
        assert_eq!(seq.get(4), None);
    }

    #[test]
    fn test_prefix_and_suffix_pad() {
        let seq = GateSequence::new(vec![1.0, 2.0]);
        let padded = seq.prefix_pad(2, 0.0).suffix_pad(1, 9.0);
        assert_eq!(padded.values(), &[0.0, 0.0, 1.0, 2.0, 9.0]);
    }

    #[test]
    fn test_force_prefix_overwrites() {
        let seq = GateSequence::new(vec![1.0, 2.0, 3.0, 4.0]);
        let forced = seq.force_prefix(2, 0.0);
        assert_eq!(forced.values(), &[0.0, 0.0, 3.0, 4.0]);
    }

    #[test]
    fn test_force_suffix_overwrites() {
        let seq = GateSequence::new(vec![1.0, 2.0, 3.0, 4.0]);
        let forced = seq.force_suffix(3, 0.0);
        assert_eq!(forced.values(), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_force_saturates_at_len() {
        let seq = GateSequence::new(vec![1.0, 2.0]);
        assert_eq!(seq.force_prefix(10, 0.0).values(), &[0.0, 0.0]);
        assert_eq!(seq.force_suffix(10, 0.0).values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_shift_all() {
        let seq = GateSequence::new(vec![0.1, -0.2]);
        let shifted = seq.shift_all(0.5);
        assert!((shifted.get(0).unwrap() - 0.6).abs() < 1e-12);
        assert!((shifted.get(1).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_expect_len() {
        let seq = GateSequence::zeros(3);
        assert!(seq.expect_len("rotation[0]", 3).is_ok());

        let err = seq.expect_len("rotation[0]", 5).unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_expect_finite() {
        let good = GateSequence::new(vec![0.0, 1.0]);
        assert!(good.expect_finite("squeezing").is_ok());

        let bad = GateSequence::new(vec![0.0, f64::NAN]);
        assert!(bad.expect_finite("squeezing").is_err());
    }

    #[test]
    fn test_first_out_of_range() {
        let seq = GateSequence::new(vec![0.0, 0.4, 2.0, 3.0]);
        assert_eq!(seq.first_out_of_range(-1.0, 1.0), Some((2, 2.0)));
        assert_eq!(seq.first_out_of_range(-10.0, 10.0), None);
    }
}
