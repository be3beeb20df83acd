//! Raw circuit specification for TDMC
//!
//! A `RawCircuitSpec` is the user-facing description of one submission:
//! a squeezing request plus one (rotation, beamsplitter) gate-sequence pair
//! per delay loop, all of length `M` (the number of computational modes).
//! It cannot be executed or simulated directly; the gate-argument compiler
//! turns it into a hardware-deployable `PaddedProgram`.

use crate::error::{TdmcError, TdmcResult};
use crate::sequence::GateSequence;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Squeezing Levels
// ============================================================================

/// Named squeezing level resolved against the calibration table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SqueezingLevel {
    /// No pump (vacuum input)
    Zero,
    /// Low pump power
    Low,
    /// Medium pump power
    #[default]
    Medium,
    /// High pump power
    High,
}

impl SqueezingLevel {
    /// Canonical table key for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            SqueezingLevel::Zero => "zero",
            SqueezingLevel::Low => "low",
            SqueezingLevel::Medium => "medium",
            SqueezingLevel::High => "high",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zero" | "off" => Some(SqueezingLevel::Zero),
            "low" => Some(SqueezingLevel::Low),
            "medium" | "med" => Some(SqueezingLevel::Medium),
            "high" => Some(SqueezingLevel::High),
            _ => None,
        }
    }

    /// All levels, weakest first
    pub fn all() -> [SqueezingLevel; 4] {
        [
            SqueezingLevel::Zero,
            SqueezingLevel::Low,
            SqueezingLevel::Medium,
            SqueezingLevel::High,
        ]
    }
}

impl fmt::Display for SqueezingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Squeezing Specification
// ============================================================================

/// Requested squeezing for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqueezingSpec {
    /// One numeric value per computational mode
    Values(Vec<f64>),
    /// A single numeric value broadcast across all modes
    Uniform(f64),
    /// A named calibration level broadcast across all modes
    Level(SqueezingLevel),
}

impl SqueezingSpec {
    /// Check the spec against the mode count
    pub fn validate(&self, modes: usize) -> TdmcResult<()> {
        match self {
            SqueezingSpec::Values(values) => {
                if values.len() != modes {
                    return Err(TdmcError::SequenceLengthMismatch {
                        gate: "squeezing".to_string(),
                        expected: modes,
                        actual: values.len(),
                    });
                }
                if let Some(bin) = values.iter().position(|v| !v.is_finite()) {
                    return Err(TdmcError::NonFiniteValue {
                        gate: "squeezing".to_string(),
                        bin,
                    });
                }
                Ok(())
            }
            SqueezingSpec::Uniform(value) => {
                if !value.is_finite() {
                    return Err(TdmcError::NonFiniteValue {
                        gate: "squeezing".to_string(),
                        bin: 0,
                    });
                }
                Ok(())
            }
            SqueezingSpec::Level(_) => Ok(()),
        }
    }
}

impl Default for SqueezingSpec {
    fn default() -> Self {
        SqueezingSpec::Level(SqueezingLevel::Zero)
    }
}

// ============================================================================
// Per-Loop Gates
// ============================================================================

/// User gate sequences for one delay loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopGates {
    /// Rotation (phase-modulator) values, one per mode
    pub rotation: GateSequence,
    /// Beamsplitter (attenuation-angle) values, one per mode
    pub beamsplitter: GateSequence,
}

impl LoopGates {
    /// Create from raw value vectors
    pub fn new(rotation: Vec<f64>, beamsplitter: Vec<f64>) -> Self {
        Self {
            rotation: GateSequence::new(rotation),
            beamsplitter: GateSequence::new(beamsplitter),
        }
    }

    /// All-idle gates for `modes` bins
    pub fn idle(modes: usize) -> Self {
        Self {
            rotation: GateSequence::zeros(modes),
            beamsplitter: GateSequence::zeros(modes),
        }
    }
}

// ============================================================================
// Raw Circuit Specification
// ============================================================================

/// User-facing circuit description, one gate sequence per programmable gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCircuitSpec {
    /// Number of computational modes `M`
    pub modes: usize,
    /// Requested squeezing
    pub squeezing: SqueezingSpec,
    /// Per-loop gate sequences, physical order
    pub loops: Vec<LoopGates>,
}

impl RawCircuitSpec {
    /// Create with validation
    pub fn new(modes: usize, squeezing: SqueezingSpec, loops: Vec<LoopGates>) -> TdmcResult<Self> {
        let spec = Self {
            modes,
            squeezing,
            loops,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// All-idle spec over vacuum inputs (for tests and padding studies)
    pub fn vacuum(modes: usize, num_loops: usize) -> TdmcResult<Self> {
        Self::new(
            modes,
            SqueezingSpec::Level(SqueezingLevel::Zero),
            (0..num_loops).map(|_| LoopGates::idle(modes)).collect(),
        )
    }

    /// Number of delay loops addressed by this spec
    pub fn num_loops(&self) -> usize {
        self.loops.len()
    }

    /// Check all sequence lengths and values
    pub fn validate(&self) -> TdmcResult<()> {
        if self.modes == 0 {
            return Err(TdmcError::InvalidModeCount(0));
        }
        if self.loops.is_empty() {
            return Err(TdmcError::EmptyDelayList);
        }

        self.squeezing.validate(self.modes)?;

        for (i, gates) in self.loops.iter().enumerate() {
            gates
                .rotation
                .expect_len(&format!("rotation[{}]", i), self.modes)?;
            gates.rotation.expect_finite(&format!("rotation[{}]", i))?;
            gates
                .beamsplitter
                .expect_len(&format!("beamsplitter[{}]", i), self.modes)?;
            gates
                .beamsplitter
                .expect_finite(&format!("beamsplitter[{}]", i))?;
        }
        Ok(())
    }
}

impl fmt::Display for RawCircuitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawCircuitSpec({} modes, {} loops)",
            self.modes,
            self.loops.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squeezing_level_parse() {
        assert_eq!(SqueezingLevel::parse("high"), Some(SqueezingLevel::High));
        assert_eq!(SqueezingLevel::parse("MED"), Some(SqueezingLevel::Medium));
        assert_eq!(SqueezingLevel::parse("off"), Some(SqueezingLevel::Zero));
        assert_eq!(SqueezingLevel::parse("ultra"), None);
    }

    #[test]
    fn test_vacuum_spec() {
        let spec = RawCircuitSpec::vacuum(5, 3).unwrap();
        assert_eq!(spec.modes, 5);
        assert_eq!(spec.num_loops(), 3);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_zero_modes_rejected() {
        let err = RawCircuitSpec::vacuum(0, 1).unwrap_err();
        assert_eq!(err, TdmcError::InvalidModeCount(0));
    }

    #[test]
    fn test_no_loops_rejected() {
        let err = RawCircuitSpec::new(4, SqueezingSpec::Uniform(0.5), vec![]).unwrap_err();
        assert_eq!(err, TdmcError::EmptyDelayList);
    }

    #[test]
    fn test_wrong_sequence_length_rejected() {
        let loops = vec![LoopGates::new(vec![0.0; 4], vec![0.0; 3])];
        let err = RawCircuitSpec::new(4, SqueezingSpec::Uniform(0.5), loops).unwrap_err();
        assert!(matches!(
            err,
            TdmcError::SequenceLengthMismatch { expected: 4, actual: 3, .. }
        ));
    }

    #[test]
    fn test_wrong_squeezing_length_rejected() {
        let loops = vec![LoopGates::idle(4)];
        let err =
            RawCircuitSpec::new(4, SqueezingSpec::Values(vec![0.5; 3]), loops).unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_non_finite_rejected() {
        let loops = vec![LoopGates::new(vec![0.0, f64::INFINITY], vec![0.0, 0.0])];
        let err = RawCircuitSpec::new(2, SqueezingSpec::Uniform(0.5), loops).unwrap_err();
        assert!(matches!(err, TdmcError::NonFiniteValue { bin: 1, .. }));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let spec = RawCircuitSpec::vacuum(3, 2).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        let restored: RawCircuitSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, restored);
    }
}
