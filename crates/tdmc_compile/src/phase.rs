//! Static-phase compensation for TDMC
//!
//! Each loop picks up a calibration-dependent static phase per round trip.
//! Two mutually exclusive policies compensate it:
//!
//! - `Explicit`: the offset is added to every entry of the loop's rotation
//!   sequence. Values that leave the modulator range are a hard validation
//!   error; no wrapping is permitted.
//! - `Absorbed`: the offset is folded into one additional rotation per
//!   loop, independent of time bin. If that angle leaves the modulator
//!   range it is shifted by pi and the affected bins are reported as
//!   approximately compensated.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_core::modulator::WRAP_STEP;
use tdmc_core::{TdmcError, TdmcResult};

// ============================================================================
// Compensation Mode
// ============================================================================

/// Phase-compensation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompensationMode {
    /// Fold the offset into the per-bin rotation sequences
    #[default]
    Explicit,
    /// Fold the offset into one per-loop compensation rotation
    Absorbed,
}

impl fmt::Display for CompensationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompensationMode::Explicit => write!(f, "explicit"),
            CompensationMode::Absorbed => write!(f, "absorbed"),
        }
    }
}

// ============================================================================
// Wrap Policy
// ============================================================================

/// Boundary rule for wrapping an out-of-range absorbed phase
///
/// The source hardware documents the wrap-by-pi compensation as an
/// approximation without a fully specified boundary rule, so the boundary
/// is configurable rather than guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WrapPolicy {
    /// Angles equal to either bound are representable (closed interval)
    #[default]
    InclusiveUpper,
    /// An angle equal to the upper bound already wraps (half-open interval)
    ExclusiveUpper,
}

impl WrapPolicy {
    /// Check whether `angle` is representable within `[min, max]`
    pub fn in_range(&self, angle: f64, min: f64, max: f64) -> bool {
        match self {
            WrapPolicy::InclusiveUpper => angle >= min && angle <= max,
            WrapPolicy::ExclusiveUpper => angle >= min && angle < max,
        }
    }
}

// ============================================================================
// Wrapping
// ============================================================================

/// Outcome of fitting an absorbed compensation angle to the modulator range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorbedPhase {
    /// Angle actually programmed
    pub angle: f64,
    /// Whether a wrap by pi was applied
    pub wrapped: bool,
}

/// Fit an absorbed compensation angle into the modulator range
///
/// Shifts by pi downward while above the range and upward while below it.
/// With the default pi-wide range a single step always suffices; the loop
/// is capped so a degenerate calibration range cannot hang compilation.
pub fn fit_absorbed_phase(
    offset: f64,
    min: f64,
    max: f64,
    policy: WrapPolicy,
) -> TdmcResult<AbsorbedPhase> {
    if policy.in_range(offset, min, max) {
        return Ok(AbsorbedPhase {
            angle: offset,
            wrapped: false,
        });
    }

    let mut angle = offset;
    for _ in 0..16 {
        if angle > max || (policy == WrapPolicy::ExclusiveUpper && angle >= max) {
            angle -= WRAP_STEP;
        } else if angle < min {
            angle += WRAP_STEP;
        } else {
            return Ok(AbsorbedPhase {
                angle,
                wrapped: true,
            });
        }
    }

    Err(TdmcError::CalibrationError(format!(
        "phase range [{:.4}, {:.4}] too narrow to wrap offset {:.4}",
        min, max, offset
    )))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_in_range_no_wrap() {
        let fit = fit_absorbed_phase(0.3, -FRAC_PI_2, FRAC_PI_2, WrapPolicy::default()).unwrap();
        assert_eq!(fit.angle, 0.3);
        assert!(!fit.wrapped);
    }

    #[test]
    fn test_wrap_above() {
        let fit = fit_absorbed_phase(2.0, -FRAC_PI_2, FRAC_PI_2, WrapPolicy::default()).unwrap();
        assert!(fit.wrapped);
        assert!((fit.angle - (2.0 - PI)).abs() < 1e-12);
        assert!(fit.angle >= -FRAC_PI_2 && fit.angle <= FRAC_PI_2);
    }

    #[test]
    fn test_wrap_below() {
        let fit = fit_absorbed_phase(-2.5, -FRAC_PI_2, FRAC_PI_2, WrapPolicy::default()).unwrap();
        assert!(fit.wrapped);
        assert!((fit.angle - (-2.5 + PI)).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_policies_differ() {
        let max = FRAC_PI_2;

        let inclusive =
            fit_absorbed_phase(max, -max, max, WrapPolicy::InclusiveUpper).unwrap();
        assert!(!inclusive.wrapped);

        let exclusive =
            fit_absorbed_phase(max, -max, max, WrapPolicy::ExclusiveUpper).unwrap();
        assert!(exclusive.wrapped);
        assert!((exclusive.angle - (max - PI)).abs() < 1e-12);
    }

    #[test]
    fn test_far_offset_wraps_repeatedly() {
        let fit = fit_absorbed_phase(7.0, -FRAC_PI_2, FRAC_PI_2, WrapPolicy::default()).unwrap();
        assert!(fit.wrapped);
        assert!(fit.angle >= -FRAC_PI_2 && fit.angle <= FRAC_PI_2);
    }

    #[test]
    fn test_degenerate_range_fails() {
        // Range narrower than the wrap step can never admit this offset
        let err = fit_absorbed_phase(10.0, -0.01, 0.01, WrapPolicy::default()).unwrap_err();
        assert!(err.is_calibration_error());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(CompensationMode::Explicit.to_string(), "explicit");
        assert_eq!(CompensationMode::Absorbed.to_string(), "absorbed");
    }
}
