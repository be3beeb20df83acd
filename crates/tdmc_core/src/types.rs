//! Core types for TDMC
//!
//! Provides fundamental type aliases and validated wrapper types
//! used throughout the TDMC system.

use crate::error::{TdmcError, TdmcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Discrete temporal slot of one pulse repetition period (0-indexed)
pub type TimeBin = usize;

/// Delay loop identifier, in physical traversal order (0-indexed)
pub type LoopId = usize;

/// Phase value in radians
pub type Phase = f64;

/// Squeezing parameter (dimensionless)
pub type Squeezing = f64;

// ============================================================================
// Efficiency (Validated Wrapper)
// ============================================================================

/// Optical efficiency value in range (0, 1]
///
/// Zero efficiency is rejected: a fully opaque element is a broken device,
/// not a programmable loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Efficiency(f64);

impl Efficiency {
    /// Create a new Efficiency with validation
    pub fn new(value: f64) -> TdmcResult<Self> {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(TdmcError::InvalidEfficiency(value));
        }
        Ok(Self(value))
    }

    /// Create without validation (for internal use only)
    ///
    /// # Safety
    /// Caller must ensure value is in (0, 1]
    #[inline]
    #[allow(dead_code)]
    pub(crate) fn new_unchecked(value: f64) -> Self {
        debug_assert!(value > 0.0 && value <= 1.0);
        Self(value)
    }

    /// Get the efficiency value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Amplitude transmission factor, `sqrt(eta)`
    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.0.sqrt()
    }

    /// Compose two efficiencies in series
    #[inline]
    pub fn compose(&self, other: Efficiency) -> Efficiency {
        Self(self.0 * other.0)
    }

    /// Loss fraction, `1 - eta`
    #[inline]
    pub fn loss(&self) -> f64 {
        1.0 - self.0
    }

    /// Lossless element (eta = 1)
    pub const ONE: Self = Self(1.0);
}

impl Default for Efficiency {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl TryFrom<f64> for Efficiency {
    type Error = TdmcError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
