//! Unrolled operations and circuits
//!
//! An `UnrolledCircuit` is the acyclic form of one compiled program:
//! an ordered operation list over unique registers, feed-forward by
//! construction, with one measurement per time bin.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tdmc_core::{Efficiency, TdmcError, TdmcResult, TimeBin};

use crate::register::{RegisterId, RegisterTable};

// ============================================================================
// Operations
// ============================================================================

/// One operation of the unrolled circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnrolledOp {
    /// Single-mode squeezing on a freshly created input register
    Squeeze {
        /// Target register
        register: RegisterId,
        /// Squeezing parameter
        value: f64,
        /// Time bin of application
        bin: TimeBin,
    },
    /// Two-register loop interaction (rotation followed by beamsplitter)
    Couple {
        /// Delay loop the interaction belongs to
        loop_index: usize,
        /// Register currently inside the loop (rotation operand)
        inside: RegisterId,
        /// Register arriving at the loop coupler
        incoming: RegisterId,
        /// Rotation angle, compensation already folded in
        rotation: f64,
        /// Beamsplitter attenuation angle
        beamsplitter: f64,
        /// Time bin of application
        bin: TimeBin,
    },
    /// Single-register attenuation (global, loop, or channel loss)
    Loss {
        /// Target register
        register: RegisterId,
        /// Intensity transmission
        efficiency: Efficiency,
        /// Time bin of application
        bin: TimeBin,
    },
    /// Terminal detection of one register
    Measure {
        /// Measured register
        register: RegisterId,
        /// Time bin of detection
        bin: TimeBin,
        /// Physical detector channel (`bin mod C`)
        detector: usize,
    },
}

impl UnrolledOp {
    /// Time bin this operation is applied at
    pub fn bin(&self) -> TimeBin {
        match self {
            UnrolledOp::Squeeze { bin, .. }
            | UnrolledOp::Couple { bin, .. }
            | UnrolledOp::Loss { bin, .. }
            | UnrolledOp::Measure { bin, .. } => *bin,
        }
    }

    /// Registers referenced by this operation
    pub fn registers(&self) -> Vec<RegisterId> {
        match self {
            UnrolledOp::Squeeze { register, .. }
            | UnrolledOp::Loss { register, .. }
            | UnrolledOp::Measure { register, .. } => vec![*register],
            UnrolledOp::Couple {
                inside, incoming, ..
            } => vec![*inside, *incoming],
        }
    }

    /// True for squeezing, the only non-passive operation
    pub fn is_active(&self) -> bool {
        matches!(self, UnrolledOp::Squeeze { .. })
    }

    /// True for the terminal detection operation
    pub fn is_measurement(&self) -> bool {
        matches!(self, UnrolledOp::Measure { .. })
    }
}

// ============================================================================
// Measurements
// ============================================================================

/// One terminal detection event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measured register
    pub register: RegisterId,
    /// Time bin of detection
    pub bin: TimeBin,
    /// Physical detector channel
    pub detector: usize,
}

// ============================================================================
// Unrolled Circuit
// ============================================================================

/// Acyclic circuit over unique per-occurrence registers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnrolledCircuit {
    modes: usize,
    crop_offset: usize,
    registers: RegisterTable,
    /// Input register of each time bin, chronological
    inputs: Vec<RegisterId>,
    ops: Vec<UnrolledOp>,
    /// One entry per time bin, chronological
    measurements: Vec<Measurement>,
}

impl UnrolledCircuit {
    /// Assemble a circuit from unroller state
    pub(crate) fn new(
        modes: usize,
        crop_offset: usize,
        registers: RegisterTable,
        inputs: Vec<RegisterId>,
        ops: Vec<UnrolledOp>,
        measurements: Vec<Measurement>,
    ) -> Self {
        Self {
            modes,
            crop_offset,
            registers,
            inputs,
            ops,
            measurements,
        }
    }

    /// Number of computational modes `M`
    pub fn modes(&self) -> usize {
        self.modes
    }

    /// Number of leading vacuum measurements dropped by cropping
    pub fn crop_offset(&self) -> usize {
        self.crop_offset
    }

    /// Total number of registers ever created
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Full chronological operation list
    pub fn ops(&self) -> &[UnrolledOp] {
        &self.ops
    }

    /// Input register created at each time bin
    pub fn inputs(&self) -> &[RegisterId] {
        &self.inputs
    }

    /// Input registers carrying the `M` computational modes
    pub fn computational_inputs(&self) -> &[RegisterId] {
        &self.inputs[..self.modes]
    }

    /// All measurements, one per time bin
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Measurements with the leading vacuum drain removed, `M` entries
    pub fn cropped_measurements(&self) -> &[Measurement] {
        &self.measurements[self.crop_offset..]
    }

    /// Creation bin of a register
    pub fn creation_bin(&self, id: RegisterId) -> Option<TimeBin> {
        self.registers.creation_bin(id)
    }

    /// Copy of this circuit with all squeezing operations removed
    ///
    /// The result is fully passive and accepted by the transfer-operator
    /// extractor.
    pub fn strip_active(&self) -> Self {
        let mut stripped = self.clone();
        stripped.ops.retain(|op| !op.is_active());
        stripped
    }

    /// Check the feed-forward and single-measurement invariants
    ///
    /// A failure here indicates a defect in the unroller itself, not bad
    /// user input.
    pub fn verify(&self) -> TdmcResult<()> {
        let mut measured: HashSet<RegisterId> = HashSet::new();

        for op in &self.ops {
            let bin = op.bin();
            for register in op.registers() {
                match self.registers.creation_bin(register) {
                    Some(created) if created <= bin => {}
                    _ => {
                        return Err(TdmcError::RegisterNotCreated {
                            register: register.index(),
                            bin,
                        });
                    }
                }
            }
            if let UnrolledOp::Measure { register, .. } = op {
                if !measured.insert(*register) {
                    return Err(TdmcError::DoubleMeasurement {
                        register: register.index(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for UnrolledCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UnrolledCircuit({} registers, {} ops, {} measurements)",
            self.num_registers(),
            self.ops.len(),
            self.measurements.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
