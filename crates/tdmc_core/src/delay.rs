//! Delay-loop model for TDMC
//!
//! A `DelayLine` is a fixed-length optical buffer that reintroduces a mode
//! into the interferometer after a fixed number of time bins. The physical
//! order of the collection is the traversal order of the interferometer.

use crate::error::{TdmcError, TdmcResult};
use crate::types::{Efficiency, LoopId, Phase};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One optical delay loop with its programmable stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayLine {
    /// Position in physical traversal order (0-indexed)
    pub index: LoopId,

    /// Round-trip length in time bins (>= 1)
    pub length: usize,

    /// Static phase picked up per round trip (radians)
    pub phase_offset: Phase,

    /// Round-trip efficiency
    pub efficiency: Efficiency,
}

impl DelayLine {
    /// Create a new delay line with validation
    pub fn new(
        index: LoopId,
        length: usize,
        phase_offset: Phase,
        efficiency: f64,
    ) -> TdmcResult<Self> {
        if length == 0 {
            return Err(TdmcError::ZeroLengthDelay { loop_index: index });
        }
        Ok(Self {
            index,
            length,
            phase_offset,
            efficiency: Efficiency::new(efficiency)?,
        })
    }

    /// Build an ordered chain of delay lines from parallel per-loop tables
    ///
    /// `phase_offsets` and `efficiencies` come from the calibration snapshot
    /// and must have one entry per delay.
    pub fn chain(
        delays: &[usize],
        phase_offsets: &[f64],
        efficiencies: &[f64],
    ) -> TdmcResult<Vec<DelayLine>> {
        if delays.is_empty() {
            return Err(TdmcError::EmptyDelayList);
        }
        if phase_offsets.len() != delays.len() {
            return Err(TdmcError::LoopCountMismatch {
                expected: delays.len(),
                actual: phase_offsets.len(),
            });
        }
        if efficiencies.len() != delays.len() {
            return Err(TdmcError::LoopCountMismatch {
                expected: delays.len(),
                actual: efficiencies.len(),
            });
        }

        delays
            .iter()
            .zip(phase_offsets)
            .zip(efficiencies)
            .enumerate()
            .map(|(i, ((&length, &phase), &eta))| DelayLine::new(i, length, phase, eta))
            .collect()
    }
}

impl fmt::Display for DelayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DelayLine(#{}, {} bins, phase={:.4}, eta={:.4})",
            self.index,
            self.length,
            self.phase_offset,
            self.efficiency.value()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
