//! Space-unrolling of compiled programs
//!
//! Rewrites the recurrent circuit (a few physical buffer slots reused
//! over `L` time bins) into an acyclic circuit over unique registers.
//! Buffer slots are modelled as an array of owned register ids; each
//! interaction moves a register id out of a slot and writes another one
//! back, so no register is ever aliased.

use tdmc_compile::LossProgram;
use tdmc_core::control::VACUUM_SQUEEZING;
use tdmc_core::{Efficiency, TdmcResult};

use crate::operation::{Measurement, UnrolledCircuit, UnrolledOp};
use crate::register::{RegisterId, RegisterTable};

/// Converts a loss-composed program into an `UnrolledCircuit`
///
/// Pure and deterministic: the same program always yields the same
/// circuit, operation for operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceUnroller;

impl SpaceUnroller {
    /// New unroller
    pub fn new() -> Self {
        Self
    }

    /// Unroll one program into its acyclic form
    pub fn unroll(&self, program: &LossProgram) -> TdmcResult<UnrolledCircuit> {
        let padded = program.program();
        let profile = padded.profile();
        let len = padded.len();
        let num_loops = profile.num_loops();

        let mut registers = RegisterTable::new();
        let mut ops = Vec::new();
        let mut inputs = Vec::with_capacity(len);
        let mut measurements = Vec::with_capacity(len);

        // Every buffer slot starts out holding a vacuum register. Slot
        // layout: loop i owns slots offset_i .. offset_i + delay_i, the
        // last slot (N-1) is the terminal detection point.
        let mut resident: Vec<RegisterId> =
            (0..profile.n()).map(|_| registers.alloc(0)).collect();
        let terminal = profile.terminal_slot();

        for t in 0..len {
            // Incoming pulse: fresh register, squeezed, globally attenuated
            let fresh = registers.alloc(t);
            inputs.push(fresh);

            let squeezing = padded.squeezing().values()[t];
            if squeezing != VACUUM_SQUEEZING {
                ops.push(UnrolledOp::Squeeze {
                    register: fresh,
                    value: squeezing,
                    bin: t,
                });
            }
            self.push_loss(&mut ops, fresh, program.global(), t);

            // Cascade through the loops in physical order. The arriving
            // register takes the place at the back of the loop's slot
            // window; the register leaving the loop travels onward.
            let mut onward = fresh;
            for i in 0..num_loops {
                let offset = profile.offset(i);
                let delay = profile.delays()[i];
                let inside = resident[offset];

                ops.push(UnrolledOp::Couple {
                    loop_index: i,
                    inside,
                    incoming: onward,
                    rotation: padded.rotation(i).values()[t] + padded.compensation(i),
                    beamsplitter: padded.beamsplitter(i).values()[t],
                    bin: t,
                });

                let window = &mut resident[offset..offset + delay];
                window.rotate_left(1);
                window[delay - 1] = onward;

                self.push_loss(&mut ops, inside, program.loop_loss(i), t);
                onward = inside;
            }

            // Detection: channel attenuation, then measurement
            resident[terminal] = onward;
            let channel = Efficiency::new(program.channel_efficiency(t))?;
            self.push_loss(&mut ops, onward, channel, t);

            let detector = program.detector_for(t);
            ops.push(UnrolledOp::Measure {
                register: onward,
                bin: t,
                detector,
            });
            measurements.push(Measurement {
                register: onward,
                bin: t,
                detector,
            });
        }

        let circuit = UnrolledCircuit::new(
            padded.modes(),
            padded.crop_offset(),
            registers,
            inputs,
            ops,
            measurements,
        );
        circuit.verify()?;
        Ok(circuit)
    }

    /// Emit an attenuation op, skipping lossless channels
    fn push_loss(
        &self,
        ops: &mut Vec<UnrolledOp>,
        register: RegisterId,
        efficiency: Efficiency,
        bin: usize,
    ) {
        if efficiency.value() < 1.0 {
            ops.push(UnrolledOp::Loss {
                register,
                efficiency,
                bin,
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
