//! Integrated configuration for TDMC
//!
//! Unified configuration covering the device geometry, the compilation
//! policies, and the execution flags handed to collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_core::{device, TdmcError, TdmcResult};
use tdmc_compile::{CompensationMode, GateCompiler, WrapPolicy};

use crate::submission::Shots;

/// Calibration source used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceProfile {
    /// Typical three-loop device certificate
    #[default]
    Typical,
    /// Lossless, phase-free device (simulation baselines)
    Ideal,
    /// Calibration snapshot injected by the caller
    Custom,
}

/// Unified TDMC configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdmcConfig {
    // ========================================================================
    // Device Geometry
    // ========================================================================
    /// Loop delay lengths, physical order
    pub delays: Vec<usize>,

    /// Number of computational modes `M`
    pub modes: usize,

    /// Number of physical detection channels `C`
    pub channels: usize,

    /// Calibration source
    pub device: DeviceProfile,

    // ========================================================================
    // Compilation Policies
    // ========================================================================
    /// Static-phase compensation mode
    pub compensation: CompensationMode,

    /// Boundary rule for absorbed-phase wrapping
    pub wrap_policy: WrapPolicy,

    // ========================================================================
    // Execution Flags
    // ========================================================================
    /// Shot count handed to the execution collaborator
    pub shots: Shots,

    /// Drop the leading vacuum bins from returned samples
    pub crop: bool,

    /// Request the space-unrolled circuit form
    pub space_unroll: bool,

    /// Enable verbose output
    pub verbose: bool,
}

impl TdmcConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Default three-loop configuration (216 modes, 16 channels)
    pub fn three_loop() -> Self {
        Self {
            delays: device::DEFAULT_DELAYS.to_vec(),
            modes: device::DEFAULT_MODES,
            channels: device::DEFAULT_CHANNELS,
            device: DeviceProfile::Typical,
            compensation: CompensationMode::Explicit,
            wrap_policy: WrapPolicy::InclusiveUpper,
            shots: Shots::Finite(10_000),
            crop: true,
            space_unroll: false,
            verbose: false,
        }
    }

    /// Single-loop configuration, handy for small studies
    pub fn single_loop(delay: usize, modes: usize) -> Self {
        Self {
            delays: vec![delay],
            modes,
            channels: 1,
            device: DeviceProfile::Ideal,
            ..Self::three_loop()
        }
    }

    /// Noiseless configuration over the given geometry
    pub fn ideal(delays: Vec<usize>, modes: usize) -> Self {
        Self {
            delays,
            modes,
            device: DeviceProfile::Ideal,
            ..Self::three_loop()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set the mode count
    pub fn with_modes(mut self, modes: usize) -> Self {
        self.modes = modes;
        self
    }

    /// Set the loop delays
    pub fn with_delays(mut self, delays: Vec<usize>) -> Self {
        self.delays = delays;
        self
    }

    /// Set the detection channel count
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Set the calibration source
    pub fn with_device(mut self, device: DeviceProfile) -> Self {
        self.device = device;
        self
    }

    /// Set the phase compensation mode
    pub fn with_compensation(mut self, mode: CompensationMode) -> Self {
        self.compensation = mode;
        self
    }

    /// Set the wrap boundary rule
    pub fn with_wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.wrap_policy = policy;
        self
    }

    /// Set the shot count
    pub fn with_shots(mut self, shots: Shots) -> Self {
        self.shots = shots;
        self
    }

    /// Enable or disable sample cropping
    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    /// Request the unrolled circuit form
    pub fn with_space_unroll(mut self, enabled: bool) -> Self {
        self.space_unroll = enabled;
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Compiler configured with this config's policies
    pub fn to_compiler(&self) -> GateCompiler {
        GateCompiler::new()
            .with_mode(self.compensation)
            .with_wrap_policy(self.wrap_policy)
    }

    /// Number of delay loops
    pub fn num_loops(&self) -> usize {
        self.delays.len()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check geometry and flag consistency
    pub fn validate(&self) -> TdmcResult<()> {
        if self.modes == 0 {
            return Err(TdmcError::InvalidModeCount(0));
        }
        if self.delays.is_empty() {
            return Err(TdmcError::EmptyDelayList);
        }
        if let Some(i) = self.delays.iter().position(|&d| d == 0) {
            return Err(TdmcError::ZeroLengthDelay { loop_index: i });
        }
        if self.channels == 0 {
            return Err(TdmcError::EmptyChannelTable);
        }
        if self.device == DeviceProfile::Typical && self.num_loops() != 3 {
            return Err(TdmcError::LoopCountMismatch {
                expected: 3,
                actual: self.num_loops(),
            });
        }
        Ok(())
    }
}

impl Default for TdmcConfig {
    fn default() -> Self {
        Self::three_loop()
    }
}

impl fmt::Display for TdmcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TdmcConfig({} modes, delays {:?}, {} compensation, shots {})",
            self.modes, self.delays, self.compensation, self.shots
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
