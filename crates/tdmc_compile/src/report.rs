//! Compile notices for TDMC
//!
//! Informational, non-fatal findings produced during compilation. Notices
//! never fail a compilation; they record where the compiler adjusted a
//! requested value so the caller can audit the deployed program.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_core::{LoopId, TimeBin};

// ============================================================================
// Notices
// ============================================================================

/// One informational finding from compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompileNotice {
    /// A requested squeezing value was replaced by the nearest supported one
    Quantization {
        /// Affected time bin; `None` for a broadcast (uniform) request
        bin: Option<TimeBin>,
        /// Requested value
        requested: f64,
        /// Supported value actually deployed
        applied: f64,
    },

    /// An absorbed compensation phase was shifted by pi to fit the modulator
    ///
    /// The listed bins are only approximately compensated. This is a known,
    /// documented approximation, not a silent failure.
    PhaseWrap {
        /// Loop whose compensation angle was wrapped
        loop_index: LoopId,
        /// Angle before wrapping
        original: f64,
        /// Angle after wrapping
        wrapped: f64,
        /// First affected time bin (inclusive)
        bin_start: TimeBin,
        /// Last affected time bin (exclusive)
        bin_end: TimeBin,
    },
}

impl CompileNotice {
    /// Check if this is a quantization notice
    pub fn is_quantization(&self) -> bool {
        matches!(self, CompileNotice::Quantization { .. })
    }

    /// Check if this is a phase-wrap notice
    pub fn is_phase_wrap(&self) -> bool {
        matches!(self, CompileNotice::PhaseWrap { .. })
    }

    /// Time bins affected by a phase wrap (empty for other notices)
    pub fn affected_bins(&self) -> std::ops::Range<TimeBin> {
        match self {
            CompileNotice::PhaseWrap {
                bin_start, bin_end, ..
            } => *bin_start..*bin_end,
            _ => 0..0,
        }
    }
}

impl fmt::Display for CompileNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileNotice::Quantization {
                bin,
                requested,
                applied,
            } => match bin {
                Some(t) => write!(
                    f,
                    "quantized squeezing at bin {}: {:.4} -> {:.4}",
                    t, requested, applied
                ),
                None => write!(f, "quantized squeezing: {:.4} -> {:.4}", requested, applied),
            },
            CompileNotice::PhaseWrap {
                loop_index,
                original,
                wrapped,
                bin_start,
                bin_end,
            } => write!(
                f,
                "wrapped compensation phase of loop {}: {:.4} -> {:.4} (bins {}..{})",
                loop_index, original, wrapped, bin_start, bin_end
            ),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Accumulated notices from one compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompileReport {
    notices: Vec<CompileNotice>,
}

impl CompileReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notice
    pub fn push(&mut self, notice: CompileNotice) {
        self.notices.push(notice);
    }

    /// Absorb another report
    pub fn extend(&mut self, other: CompileReport) {
        self.notices.extend(other.notices);
    }

    /// All notices, in the order they were produced
    pub fn notices(&self) -> &[CompileNotice] {
        &self.notices
    }

    /// Number of quantization notices
    pub fn quantization_count(&self) -> usize {
        self.notices.iter().filter(|n| n.is_quantization()).count()
    }

    /// Number of phase-wrap notices
    pub fn phase_wrap_count(&self) -> usize {
        self.notices.iter().filter(|n| n.is_phase_wrap()).count()
    }

    /// Check if compilation produced no notices
    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompileReport({} quantized, {} wrapped)",
            self.quantization_count(),
            self.phase_wrap_count()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
