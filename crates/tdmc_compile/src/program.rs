//! Hardware-deployable padded program
//!
//! A `PaddedProgram` is the immutable output of the gate-argument
//! compiler: every sequence shares the common length `L = M + sum(delays)`,
//! squeezing values are calibration-supported, and the fill/drain windows
//! of every beamsplitter hold full transmission.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_core::control::FULL_TRANSMISSION;
use tdmc_core::{ConcurrencyProfile, GateSequence, TdmcError, TdmcResult};

/// Compiled gate-argument sequences over `L` time bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddedProgram {
    modes: usize,
    profile: ConcurrencyProfile,
    squeezing: GateSequence,
    rotations: Vec<GateSequence>,
    beamsplitters: Vec<GateSequence>,
    /// Per-loop compensation rotation (all zero in explicit mode)
    compensation: Vec<f64>,
}

impl PaddedProgram {
    /// Assemble a program, checking the equal-length invariant
    pub fn new(
        modes: usize,
        profile: ConcurrencyProfile,
        squeezing: GateSequence,
        rotations: Vec<GateSequence>,
        beamsplitters: Vec<GateSequence>,
        compensation: Vec<f64>,
    ) -> TdmcResult<Self> {
        let program = Self {
            modes,
            profile,
            squeezing,
            rotations,
            beamsplitters,
            compensation,
        };
        program.validate()?;
        Ok(program)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of computational modes `M`
    pub fn modes(&self) -> usize {
        self.modes
    }

    /// Compiled length `L = M + sum(delays)`
    pub fn len(&self) -> usize {
        self.squeezing.len()
    }

    /// A program always spans at least one time bin
    pub fn is_empty(&self) -> bool {
        self.squeezing.is_empty()
    }

    /// Concurrency accounting this program was compiled against
    pub fn profile(&self) -> &ConcurrencyProfile {
        &self.profile
    }

    /// Number of delay loops
    pub fn num_loops(&self) -> usize {
        self.rotations.len()
    }

    /// Loop delay lengths, physical order
    pub fn delays(&self) -> &[usize] {
        self.profile.delays()
    }

    /// Number of leading vacuum bins to crop from returned samples
    pub fn crop_offset(&self) -> usize {
        self.profile.total_delay()
    }

    /// Compiled squeezing sequence
    pub fn squeezing(&self) -> &GateSequence {
        &self.squeezing
    }

    /// Compiled rotation sequence of loop `i`
    pub fn rotation(&self, loop_index: usize) -> &GateSequence {
        &self.rotations[loop_index]
    }

    /// Compiled beamsplitter sequence of loop `i`
    pub fn beamsplitter(&self, loop_index: usize) -> &GateSequence {
        &self.beamsplitters[loop_index]
    }

    /// Per-loop compensation rotation (zero in explicit mode)
    pub fn compensation(&self, loop_index: usize) -> f64 {
        self.compensation[loop_index]
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check the equal-length invariant and table shapes
    pub fn validate(&self) -> TdmcResult<()> {
        let expected = self.profile.program_length(self.modes);

        self.squeezing.expect_len("squeezing", expected)?;

        if self.rotations.len() != self.profile.num_loops() {
            return Err(TdmcError::LoopCountMismatch {
                expected: self.profile.num_loops(),
                actual: self.rotations.len(),
            });
        }
        if self.beamsplitters.len() != self.profile.num_loops() {
            return Err(TdmcError::LoopCountMismatch {
                expected: self.profile.num_loops(),
                actual: self.beamsplitters.len(),
            });
        }
        if self.compensation.len() != self.profile.num_loops() {
            return Err(TdmcError::LoopCountMismatch {
                expected: self.profile.num_loops(),
                actual: self.compensation.len(),
            });
        }

        for (i, (rot, bs)) in self.rotations.iter().zip(&self.beamsplitters).enumerate() {
            rot.expect_len(&format!("rotation[{}]", i), expected)?;
            bs.expect_len(&format!("beamsplitter[{}]", i), expected)?;
        }
        Ok(())
    }

    /// Check the loop fill/drain invariants on every beamsplitter sequence
    pub fn verify_fill_drain(&self) -> TdmcResult<()> {
        let len = self.len();
        for (i, bs) in self.beamsplitters.iter().enumerate() {
            let fill = self.profile.delays()[i];
            let drain = self.profile.drain_length(i);

            let bad_fill = bs.values()[..fill]
                .iter()
                .any(|&v| v != FULL_TRANSMISSION);
            let bad_drain = bs.values()[len - drain..]
                .iter()
                .any(|&v| v != FULL_TRANSMISSION);
            if bad_fill || bad_drain {
                return Err(TdmcError::InternalError(format!(
                    "fill/drain window of beamsplitter[{}] not at full transmission",
                    i
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PaddedProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PaddedProgram(M={}, L={}, {} loops, N={})",
            self.modes,
            self.len(),
            self.num_loops(),
            self.profile.n()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
