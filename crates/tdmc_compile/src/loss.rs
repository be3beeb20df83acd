//! Loss composition
//!
//! Attaches calibrated efficiencies to a compiled program: one global
//! input efficiency, one per-loop efficiency applied after each
//! beamsplitter interaction, and the relative detection-channel
//! efficiencies tiled over the full program length.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_calibration::DeviceCalibration;
use tdmc_core::{Efficiency, GateSequence, TdmcError, TdmcResult, TimeBin};

use crate::program::PaddedProgram;

/// Tile a per-channel efficiency table over `len` time bins
///
/// Bin `t` is detected by channel `t % C`, so the tiled sequence repeats
/// the table cyclically.
pub fn tile_channel_efficiencies(relative: &[f64], len: usize) -> TdmcResult<GateSequence> {
    if relative.is_empty() {
        return Err(TdmcError::EmptyChannelTable);
    }
    let values = (0..len).map(|t| relative[t % relative.len()]).collect();
    Ok(GateSequence::new(values))
}

/// A padded program annotated with calibrated loss channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossProgram {
    program: PaddedProgram,
    global: Efficiency,
    loop_losses: Vec<Efficiency>,
    channel: GateSequence,
    channels: usize,
}

impl LossProgram {
    /// Compose calibrated losses onto a compiled program
    pub fn compose(program: PaddedProgram, calibration: &DeviceCalibration) -> TdmcResult<Self> {
        if calibration.num_loops() != program.num_loops() {
            return Err(TdmcError::LoopCountMismatch {
                expected: program.num_loops(),
                actual: calibration.num_loops(),
            });
        }

        let global = Efficiency::new(calibration.global_efficiency)?;
        let loop_losses = calibration
            .loop_efficiencies
            .iter()
            .map(|&eta| Efficiency::new(eta))
            .collect::<TdmcResult<Vec<_>>>()?;
        let channel =
            tile_channel_efficiencies(&calibration.relative_channel_efficiencies, program.len())?;
        let channels = calibration.num_channels();

        Ok(Self {
            program,
            global,
            loop_losses,
            channel,
            channels,
        })
    }

    /// The underlying compiled program
    pub fn program(&self) -> &PaddedProgram {
        &self.program
    }

    /// Global input efficiency applied to every register at creation
    pub fn global(&self) -> Efficiency {
        self.global
    }

    /// Loop efficiency applied after each interaction with loop `i`
    pub fn loop_loss(&self, loop_index: usize) -> Efficiency {
        self.loop_losses[loop_index]
    }

    /// Relative detection efficiency of time bin `t`
    pub fn channel_efficiency(&self, bin: TimeBin) -> f64 {
        self.channel.values()[bin]
    }

    /// Tiled channel efficiency sequence, length `L`
    pub fn channel_sequence(&self) -> &GateSequence {
        &self.channel
    }

    /// Number of physical detection channels
    pub fn num_channels(&self) -> usize {
        self.channels
    }

    /// Physical detector that measures time bin `t`
    pub fn detector_for(&self, bin: TimeBin) -> usize {
        bin % self.channels
    }
}

impl fmt::Display for LossProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LossProgram({}, global={}, {} channels)",
            self.program,
            self.global,
            self.channels
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
