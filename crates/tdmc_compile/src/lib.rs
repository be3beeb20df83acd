//! # tdmc_compile - Gate-Argument Compiler
//!
//! Compiles user circuit specifications into hardware-deployable padded
//! programs and composes calibrated loss channels onto them.
//!
//! ## Architecture
//!
//! ```text
//! tdmc_compile
//! ├── quantize   - squeezing resolution against the supported set
//! ├── phase      - static-phase compensation (explicit / absorbed)
//! ├── padding    - fill/drain alignment of gate sequences
//! ├── program    - PaddedProgram (compiled output)
//! ├── loss       - LossProgram (calibrated loss composition)
//! ├── report     - CompileReport and per-compilation notices
//! └── compiler   - GateCompiler orchestration
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tdmc_calibration::DeviceCalibration;
//! use tdmc_compile::{GateCompiler, LossProgram};
//! use tdmc_core::RawCircuitSpec;
//!
//! let spec = RawCircuitSpec::vacuum(216, 3).unwrap();
//! let calibration = DeviceCalibration::three_loop_typical();
//!
//! let compiler = GateCompiler::new();
//! let (program, report) = compiler.compile(&spec, &[1, 6, 36], &calibration).unwrap();
//! assert_eq!(program.len(), 259);
//! assert!(report.is_clean());
//!
//! let loss = LossProgram::compose(program, &calibration).unwrap();
//! assert_eq!(loss.num_channels(), 16);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// GateCompiler orchestration
pub mod compiler;

/// Calibrated loss composition
pub mod loss;

/// Fill/drain padding construction
pub mod padding;

/// Static-phase compensation policies
pub mod phase;

/// Compiled padded programs
pub mod program;

/// Squeezing quantization
pub mod quantize;

/// Compilation notices and reports
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use compiler::GateCompiler;
pub use loss::{tile_channel_efficiencies, LossProgram};
pub use padding::{pad_beamsplitter, pad_rotation, pad_squeezing};
pub use phase::{fit_absorbed_phase, AbsorbedPhase, CompensationMode, WrapPolicy};
pub use program::PaddedProgram;
pub use quantize::{quantize_value, resolve_squeezing};
pub use report::{CompileNotice, CompileReport};

// ============================================================================
// Prelude
// ============================================================================

/// Common imports for compiler users
pub mod prelude {
    pub use crate::compiler::GateCompiler;
    pub use crate::loss::LossProgram;
    pub use crate::phase::{CompensationMode, WrapPolicy};
    pub use crate::program::PaddedProgram;
    pub use crate::report::{CompileNotice, CompileReport};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
