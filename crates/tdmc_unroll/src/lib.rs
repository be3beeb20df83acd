//! # tdmc_unroll - Space-Unrolling and Transfer Extraction
//!
//! Rewrites a compiled recurrent program into an acyclic circuit over
//! unique registers, and composes the passive part of that circuit into
//! a single transfer operator.
//!
//! ## Architecture
//!
//! ```text
//! tdmc_unroll
//! ├── register   - unrolled register ids and allocation
//! ├── operation  - UnrolledOp / UnrolledCircuit and its invariants
//! ├── unroller   - SpaceUnroller (cyclic -> acyclic rewrite)
//! └── transfer   - TransferOperator extraction
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tdmc_calibration::DeviceCalibration;
//! use tdmc_compile::{GateCompiler, LossProgram};
//! use tdmc_core::RawCircuitSpec;
//! use tdmc_unroll::{SpaceUnroller, TransferOperator};
//!
//! let spec = RawCircuitSpec::vacuum(5, 1).unwrap();
//! let calibration = DeviceCalibration::ideal(1, 4);
//!
//! let (program, _) = GateCompiler::new().compile(&spec, &[3], &calibration).unwrap();
//! let loss = LossProgram::compose(program, &calibration).unwrap();
//!
//! let circuit = SpaceUnroller::new().unroll(&loss).unwrap();
//! assert_eq!(circuit.measurements().len(), 8);
//! assert_eq!(circuit.cropped_measurements().len(), 5);
//!
//! let transfer = TransferOperator::extract(&circuit.strip_active()).unwrap();
//! assert_eq!(transfer.dim(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Unrolled operations and circuits
pub mod operation;

/// Register identifiers and allocation
pub mod register;

/// Transfer-operator extraction
pub mod transfer;

/// Cyclic-to-acyclic circuit rewrite
pub mod unroller;

// ============================================================================
// Re-exports
// ============================================================================

pub use operation::{Measurement, UnrolledCircuit, UnrolledOp};
pub use register::{RegisterId, RegisterTable};
pub use transfer::TransferOperator;
pub use unroller::SpaceUnroller;

// ============================================================================
// Prelude
// ============================================================================

/// Common imports for unroller users
pub mod prelude {
    pub use crate::operation::{Measurement, UnrolledCircuit, UnrolledOp};
    pub use crate::register::RegisterId;
    pub use crate::transfer::TransferOperator;
    pub use crate::unroller::SpaceUnroller;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tdmc_calibration::DeviceCalibration;
    use tdmc_compile::{GateCompiler, LossProgram};
    use tdmc_core::RawCircuitSpec;

    /// Three-loop device end to end: compile, compose, unroll, verify
    #[test]
    fn test_three_loop_unroll() {
        let spec = RawCircuitSpec::vacuum(216, 3).unwrap();
        let calibration = DeviceCalibration::three_loop_typical();

        let (program, _) = GateCompiler::new()
            .compile(&spec, &[1, 6, 36], &calibration)
            .unwrap();
        let loss = LossProgram::compose(program, &calibration).unwrap();
        let circuit = SpaceUnroller::new().unroll(&loss).unwrap();

        assert_eq!(circuit.measurements().len(), 259);
        assert_eq!(circuit.cropped_measurements().len(), 216);
        assert_eq!(circuit.num_registers(), 44 + 259);
        assert!(circuit.verify().is_ok());
    }

    /// Unrolling the same program twice yields identical circuits
    #[test]
    fn test_unrolling_is_deterministic() {
        let spec = RawCircuitSpec::vacuum(10, 2).unwrap();
        let calibration = DeviceCalibration::three_loop_typical();
        // Only the first two loops of the typical device
        let calibration = {
            let mut c = calibration;
            c.loop_phase_offsets.truncate(2);
            c.loop_efficiencies.truncate(2);
            c
        };

        let (program, _) = GateCompiler::new()
            .compile(&spec, &[1, 6], &calibration)
            .unwrap();
        let loss = LossProgram::compose(program, &calibration).unwrap();

        let a = SpaceUnroller::new().unroll(&loss).unwrap();
        let b = SpaceUnroller::new().unroll(&loss).unwrap();
        assert_eq!(a, b);
    }
}
