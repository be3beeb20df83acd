//! Submission contract with execution collaborators
//!
//! The engine does not talk to hardware or simulators itself; it hands a
//! compiled program plus execution flags to a collaborator and defines
//! the shape of the sample arrays it expects back.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_compile::LossProgram;
use tdmc_unroll::UnrolledCircuit;

/// Requested shot count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shots {
    /// Exact / no-sampling mode
    None,
    /// Finite number of samples
    Finite(u64),
}

impl Shots {
    /// Shot count, if finite
    pub fn count(&self) -> Option<u64> {
        match self {
            Shots::None => None,
            Shots::Finite(n) => Some(*n),
        }
    }
}

impl Default for Shots {
    fn default() -> Self {
        Shots::Finite(10_000)
    }
}

impl fmt::Display for Shots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shots::None => write!(f, "none"),
            Shots::Finite(n) => write!(f, "{}", n),
        }
    }
}

/// Shape of the sample array a collaborator must return
///
/// `(shots, spatial_registers, temporal_modes)`; the device has a single
/// spatial output, so the middle axis is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleShape {
    /// Number of samples, `None` in exact mode
    pub shots: Option<u64>,
    /// Spatial output registers, always 1
    pub spatial_registers: usize,
    /// Temporal modes per sample: `L` uncropped, `M` cropped
    pub temporal_modes: usize,
}

impl fmt::Display for SampleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shots {
            Some(n) => write!(f, "({}, {}, {})", n, self.spatial_registers, self.temporal_modes),
            None => write!(f, "(exact, {}, {})", self.spatial_registers, self.temporal_modes),
        }
    }
}

/// One fully compiled submission, ready for a collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Compiled program with composed losses
    pub program: LossProgram,
    /// Unrolled form, present when `space_unroll` was requested
    pub circuit: Option<UnrolledCircuit>,
    /// Requested shot count
    pub shots: Shots,
    /// Drop the leading vacuum bins from returned samples
    pub crop: bool,
}

impl ExecutionRequest {
    /// Build a request from a compiled program and execution flags
    pub fn new(
        program: LossProgram,
        circuit: Option<UnrolledCircuit>,
        shots: Shots,
        crop: bool,
    ) -> Self {
        Self {
            program,
            circuit,
            shots,
            crop,
        }
    }

    /// Whether the unrolled form was requested
    pub fn space_unroll(&self) -> bool {
        self.circuit.is_some()
    }

    /// Shape of the sample array the collaborator must return
    pub fn sample_shape(&self) -> SampleShape {
        let padded = self.program.program();
        SampleShape {
            shots: self.shots.count(),
            spatial_registers: 1,
            temporal_modes: if self.crop {
                padded.modes()
            } else {
                padded.len()
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tdmc_calibration::DeviceCalibration;
    use tdmc_compile::GateCompiler;
    use tdmc_core::RawCircuitSpec;

    fn toy_loss_program() -> LossProgram {
        let calibration = DeviceCalibration::ideal(1, 4);
        let spec = RawCircuitSpec::vacuum(5, 1).unwrap();
        let (program, _) = GateCompiler::new()
            .compile(&spec, &[3], &calibration)
            .unwrap();
        LossProgram::compose(program, &calibration).unwrap()
    }

    #[test]
    fn test_cropped_shape_uses_mode_count() {
        let request = ExecutionRequest::new(toy_loss_program(), None, Shots::Finite(100), true);
        let shape = request.sample_shape();
        assert_eq!(shape.shots, Some(100));
        assert_eq!(shape.spatial_registers, 1);
        assert_eq!(shape.temporal_modes, 5);
    }

    #[test]
    fn test_uncropped_shape_uses_program_length() {
        let request = ExecutionRequest::new(toy_loss_program(), None, Shots::None, false);
        let shape = request.sample_shape();
        assert_eq!(shape.shots, None);
        assert_eq!(shape.temporal_modes, 8);
    }

    #[test]
    fn test_shots_display() {
        assert_eq!(Shots::None.to_string(), "none");
        assert_eq!(Shots::Finite(512).to_string(), "512");
    }
}
