//! Constants for TDMC
//!
//! Control values, modulator ranges, and typical three-loop device defaults.

// ============================================================================
// Control Constants
// ============================================================================

pub mod control {
    //! Canonical control values for programmable gates

    /// Beamsplitter setting for full transmission (zero attenuation angle).
    ///
    /// During loop fill and drain the beamsplitters are held at this value
    /// so pulses load into and unload from the loops without interference.
    pub const FULL_TRANSMISSION: f64 = 0.0;

    /// Idle rotation value used for padding entries
    pub const IDLE_PHASE: f64 = 0.0;

    /// Squeezing value of an unpumped (vacuum) time bin
    pub const VACUUM_SQUEEZING: f64 = 0.0;
}

// ============================================================================
// Modulator Constants
// ============================================================================

pub mod modulator {
    //! Phase-modulator range defaults
    //!
    //! The calibration snapshot may override the range; these are the
    //! defaults used when a device does not declare its own bounds.

    use std::f64::consts::{FRAC_PI_2, PI};

    /// Default lower bound of the representable phase range (radians)
    pub const DEFAULT_PHASE_MIN: f64 = -FRAC_PI_2;

    /// Default upper bound of the representable phase range (radians)
    pub const DEFAULT_PHASE_MAX: f64 = FRAC_PI_2;

    /// Step applied when wrapping an out-of-range absorbed phase (radians)
    pub const WRAP_STEP: f64 = PI;
}

// ============================================================================
// Device Constants
// ============================================================================

pub mod device {
    //! Typical three-loop device defaults
    //!
    //! A 216-mode configuration with round-trip lengths 1, 6 and 36 time
    //! bins and a 16-channel detection stage.

    /// Round-trip lengths of the three delay loops (time bins)
    pub const DEFAULT_DELAYS: [usize; 3] = [1, 6, 36];

    /// Default number of computational modes per submission
    pub const DEFAULT_MODES: usize = 216;

    /// Number of detection channels
    pub const DEFAULT_CHANNELS: usize = 16;

    /// Typical global (common-path) efficiency
    pub const DEFAULT_GLOBAL_EFFICIENCY: f64 = 0.88;

    /// Typical per-loop round-trip efficiencies
    pub const DEFAULT_LOOP_EFFICIENCIES: [f64; 3] = [0.94, 0.92, 0.85];

    /// Typical static loop phase offsets (radians)
    pub const DEFAULT_LOOP_PHASES: [f64; 3] = [0.13, -0.44, 0.78];
}

// ============================================================================
// Tests
// ============================================================================
