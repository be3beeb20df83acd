//! Error types for TDMC
//!
//! Comprehensive error handling for the TDMC compilation pipeline.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for TDMC
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TdmcError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Delay list is empty
    #[error("Delay list is empty: at least one delay loop is required")]
    EmptyDelayList,

    /// Delay loop with zero length
    #[error("Delay loop {loop_index} has zero length: must be >= 1 time bin")]
    ZeroLengthDelay { loop_index: usize },

    /// Mode count must be positive
    #[error("Invalid mode count {0}: must be >= 1")]
    InvalidModeCount(usize),

    /// Efficiency out of range (0, 1]
    #[error("Invalid efficiency {0}: must be in range (0, 1]")]
    InvalidEfficiency(f64),

    /// Gate sequence has wrong length
    #[error("Sequence length mismatch for {gate}: expected {expected}, got {actual}")]
    SequenceLengthMismatch {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Loop count does not match the delay list
    #[error("Loop count mismatch: expected {expected} loops, got {actual}")]
    LoopCountMismatch { expected: usize, actual: usize },

    /// Non-finite gate value
    #[error("Non-finite value in {gate} at bin {bin}")]
    NonFiniteValue { gate: String, bin: usize },

    /// Phase outside the modulator's representable range
    #[error(
        "Phase {value:.6} out of range [{min:.6}, {max:.6}] for loop {loop_index} at bin {bin}"
    )]
    PhaseOutOfRange {
        loop_index: usize,
        bin: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    // ========================================================================
    // Calibration Errors
    // ========================================================================
    /// Named squeezing level not present in the calibration table
    #[error("Unknown squeezing level '{0}'")]
    UnknownSqueezingLevel(String),

    /// Supported squeezing set is empty
    #[error("Calibration has an empty supported-squeezing set")]
    EmptySupportedSet,

    /// Relative channel-efficiency table is empty
    #[error("Calibration has an empty channel-efficiency table")]
    EmptyChannelTable,

    /// Generic calibration error
    #[error("Calibration error: {0}")]
    CalibrationError(String),

    // ========================================================================
    // Unroll Errors (internal, should be unreachable)
    // ========================================================================
    /// Operation references a register before its creation
    #[error("Register {register} referenced at bin {bin} before creation")]
    RegisterNotCreated { register: usize, bin: usize },

    /// Register measured more than once
    #[error("Register {register} measured more than once")]
    DoubleMeasurement { register: usize },

    // ========================================================================
    // Transfer Errors
    // ========================================================================
    /// Non-passive operation in a passive composition
    #[error("Non-passive operation at bin {bin}: strip squeezing before extracting")]
    NonPassiveOperation { bin: usize },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for TDMC operations
pub type TdmcResult<T> = Result<T, TdmcError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for TdmcError {
    fn from(err: serde_json::Error) -> Self {
        TdmcError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for TdmcError {
    fn from(err: std::io::Error) -> Self {
        TdmcError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl TdmcError {
    /// Check if error is a compile-time validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            TdmcError::EmptyDelayList
                | TdmcError::ZeroLengthDelay { .. }
                | TdmcError::InvalidModeCount(_)
                | TdmcError::InvalidEfficiency(_)
                | TdmcError::SequenceLengthMismatch { .. }
                | TdmcError::LoopCountMismatch { .. }
                | TdmcError::NonFiniteValue { .. }
                | TdmcError::PhaseOutOfRange { .. }
        )
    }

    /// Check if error originates from calibration data
    pub fn is_calibration_error(&self) -> bool {
        matches!(
            self,
            TdmcError::UnknownSqueezingLevel(_)
                | TdmcError::EmptySupportedSet
                | TdmcError::EmptyChannelTable
                | TdmcError::CalibrationError(_)
        )
    }

    /// Check if error indicates an internal logic defect (fatal)
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TdmcError::RegisterNotCreated { .. }
                | TdmcError::DoubleMeasurement { .. }
                | TdmcError::InternalError(_)
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
    fn test_error_display() {
        let err = TdmcError::ZeroLengthDelay { loop_index: 2 };
        assert!(err.to_string().contains("2"));
    }

    #[test]
    fn test_sequence_length_mismatch_display() {
        let err = TdmcError::SequenceLengthMismatch {
            gate: "rotation[1]".into(),
            expected: 259,
            actual: 216,
        };
        assert!(err.to_string().contains("rotation[1]"));
        assert!(err.to_string().contains("259"));
    }

    #[test]
    fn test_is_validation_error() {
        assert!(TdmcError::EmptyDelayList.is_validation_error());
        assert!(TdmcError::InvalidEfficiency(1.5).is_validation_error());
        assert!(!TdmcError::EmptySupportedSet.is_validation_error());
    }

    #[test]
    fn test_is_internal() {
        assert!(TdmcError::DoubleMeasurement { register: 7 }.is_internal());
        assert!(!TdmcError::EmptyDelayList.is_internal());
    }
}
