//! Fluent builder for raw circuit specifications
//!
//! Mirrors the shape of a physical submission: choose the squeezing request
//! once, then add one gate pair per delay loop in traversal order.

use crate::circuit::{LoopGates, RawCircuitSpec, SqueezingLevel, SqueezingSpec};
use crate::error::TdmcResult;

/// Builder for [`RawCircuitSpec`]
///
/// ```rust
/// use tdmc_core::prelude::*;
///
/// let spec = RawSpecBuilder::new(4)
///     .squeezing_level(SqueezingLevel::High)
///     .loop_gates(vec![0.1; 4], vec![0.5; 4])
///     .loop_gates(vec![0.2; 4], vec![0.6; 4])
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.num_loops(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RawSpecBuilder {
    modes: usize,
    squeezing: SqueezingSpec,
    loops: Vec<LoopGates>,
}

impl RawSpecBuilder {
    /// Start a spec for `modes` computational modes
    pub fn new(modes: usize) -> Self {
        Self {
            modes,
            squeezing: SqueezingSpec::default(),
            loops: Vec::new(),
        }
    }

    // ========================================================================
    // Squeezing
    // ========================================================================

    /// Set the full squeezing spec
    pub fn squeezing(mut self, spec: SqueezingSpec) -> Self {
        self.squeezing = spec;
        self
    }

    /// Request one numeric squeezing value per mode
    pub fn squeezing_values(mut self, values: Vec<f64>) -> Self {
        self.squeezing = SqueezingSpec::Values(values);
        self
    }

    /// Broadcast a single numeric squeezing value across all modes
    pub fn uniform_squeezing(mut self, value: f64) -> Self {
        self.squeezing = SqueezingSpec::Uniform(value);
        self
    }

    /// Broadcast a named calibration level across all modes
    pub fn squeezing_level(mut self, level: SqueezingLevel) -> Self {
        self.squeezing = SqueezingSpec::Level(level);
        self
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// Append the gate pair for the next delay loop in physical order
    pub fn loop_gates(mut self, rotation: Vec<f64>, beamsplitter: Vec<f64>) -> Self {
        self.loops.push(LoopGates::new(rotation, beamsplitter));
        self
    }

    /// Append an all-idle loop
    pub fn idle_loop(mut self) -> Self {
        self.loops.push(LoopGates::idle(self.modes));
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Validate and build the spec
    pub fn build(self) -> TdmcResult<RawCircuitSpec> {
        RawCircuitSpec::new(self.modes, self.squeezing, self.loops)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TdmcError;

    #[test]
    fn test_builder_basic() {
        let spec = RawSpecBuilder::new(3)
            .uniform_squeezing(0.8)
            .loop_gates(vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6])
            .build()
            .unwrap();

        assert_eq!(spec.modes, 3);
        assert_eq!(spec.num_loops(), 1);
        assert_eq!(spec.squeezing, SqueezingSpec::Uniform(0.8));
    }

    #[test]
    fn test_builder_idle_loops() {
        let spec = RawSpecBuilder::new(5)
            .idle_loop()
            .idle_loop()
            .idle_loop()
            .build()
            .unwrap();
        assert_eq!(spec.num_loops(), 3);
    }

    #[test]
    fn test_builder_validates() {
        let err = RawSpecBuilder::new(3)
            .loop_gates(vec![0.1, 0.2], vec![0.4, 0.5])
            .build()
            .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_builder_no_loops_rejected() {
        let err = RawSpecBuilder::new(3).build().unwrap_err();
        assert_eq!(err, TdmcError::EmptyDelayList);
    }
}
