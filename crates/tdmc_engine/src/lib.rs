//! # tdmc_engine - Integrated Compilation Pipeline
//!
//! Ties the TDMC crates together: configuration, staged compilation,
//! and the submission contract with execution collaborators.
//!
//! ## Architecture
//!
//! ```text
//! tdmc_engine
//! ├── config      - TdmcConfig (geometry, policies, execution flags)
//! ├── pipeline    - staged Pipeline (calibrate → compile → compose → unroll)
//! └── submission  - ExecutionRequest / SampleShape contract
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tdmc_core::RawCircuitSpec;
//! use tdmc_engine::{Pipeline, TdmcConfig};
//!
//! let config = TdmcConfig::three_loop().with_space_unroll(true);
//! let mut pipeline = Pipeline::new(config);
//!
//! let spec = RawCircuitSpec::vacuum(216, 3).unwrap();
//! let result = pipeline.run(&spec).unwrap();
//!
//! assert_eq!(result.sample_shape.temporal_modes, 216);
//! assert!(result.request.space_unroll());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Unified configuration
pub mod config;

/// Staged compilation pipeline
pub mod pipeline;

/// Submission contract
pub mod submission;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{DeviceProfile, TdmcConfig};
pub use pipeline::{CompilationResult, Pipeline, PipelineStage, PipelineState};
pub use submission::{ExecutionRequest, SampleShape, Shots};

// ============================================================================
// Prelude
// ============================================================================

/// Common imports for engine users
pub mod prelude {
    pub use crate::config::{DeviceProfile, TdmcConfig};
    pub use crate::pipeline::{CompilationResult, Pipeline, PipelineStage};
    pub use crate::submission::{ExecutionRequest, SampleShape, Shots};
    pub use tdmc_calibration::DeviceCalibration;
    pub use tdmc_compile::{CompensationMode, WrapPolicy};
    pub use tdmc_core::prelude::*;
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
    use approx::assert_relative_eq;
    use tdmc_calibration::DeviceCalibration;
    use tdmc_core::{LoopGates, RawCircuitSpec, SqueezingSpec};

    /// Full three-loop flow with a custom calibration snapshot
    #[test]
    fn test_custom_snapshot_flow() {
        let mut calibration = DeviceCalibration::three_loop_typical();
        calibration.global_efficiency = 0.9;

        let config = TdmcConfig::three_loop().with_space_unroll(true);
        let mut pipeline = Pipeline::new(config);
        pipeline.set_calibration(calibration);

        let spec = RawCircuitSpec::vacuum(216, 3).unwrap();
        let result = pipeline.run(&spec).unwrap();

        let circuit = result.request.circuit.as_ref().unwrap();
        assert_eq!(circuit.measurements().len(), 259);
        assert_eq!(circuit.cropped_measurements().len(), 216);
    }

    /// Quantization notices surface in the final result
    #[test]
    fn test_notices_in_result() {
        let config = TdmcConfig::single_loop(1, 2);
        let mut pipeline = Pipeline::new(config);

        let loops = vec![LoopGates::idle(2)];
        let spec = RawCircuitSpec::new(2, SqueezingSpec::Uniform(0.35), loops).unwrap();
        let result = pipeline.run(&spec).unwrap();

        // 0.35 lands on the supported 0.4
        assert_eq!(result.report.quantization_count(), 1);
        assert_relative_eq!(
            result.request.program.program().squeezing().values()[0],
            0.4
        );
    }

    /// The submission serializes, collaborators consume JSON
    #[test]
    fn test_request_serializes() {
        let mut pipeline = Pipeline::new(TdmcConfig::single_loop(3, 5));
        let spec = RawCircuitSpec::vacuum(5, 1).unwrap();

        let result = pipeline.run(&spec).unwrap();
        let json = serde_json::to_string(&result.request).unwrap();
        let restored: ExecutionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(result.request, restored);
    }

    #[test]
    fn test_version_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "tdmc_engine");
    }
}
