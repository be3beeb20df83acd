//! Gate-argument compiler
//!
//! Turns a user `RawCircuitSpec` into a hardware-deployable
//! `PaddedProgram` against a given delay configuration and calibration
//! snapshot. The pipeline runs in a fixed order: validation, squeezing
//! resolution, phase compensation, padding, assembly.

use tdmc_calibration::DeviceCalibration;
use tdmc_core::{ConcurrencyProfile, GateSequence, RawCircuitSpec, TdmcError, TdmcResult};

use crate::padding::{pad_beamsplitter, pad_rotation, pad_squeezing};
use crate::phase::{fit_absorbed_phase, CompensationMode, WrapPolicy};
use crate::program::PaddedProgram;
use crate::quantize::resolve_squeezing;
use crate::report::{CompileNotice, CompileReport};

/// Compiles raw circuit specs into padded programs
///
/// The compiler itself is stateless apart from its policy knobs; one
/// instance can compile any number of specs.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateCompiler {
    mode: CompensationMode,
    wrap_policy: WrapPolicy,
}

impl GateCompiler {
    /// Compiler with default policies (explicit compensation)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the static-phase compensation mode
    pub fn with_mode(mut self, mode: CompensationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the boundary rule used when absorbing wraps a phase
    pub fn with_wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.wrap_policy = policy;
        self
    }

    /// Active compensation mode
    pub fn mode(&self) -> CompensationMode {
        self.mode
    }

    /// Active wrap policy
    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap_policy
    }

    /// Compile one spec against a delay configuration and calibration
    pub fn compile(
        &self,
        spec: &RawCircuitSpec,
        delays: &[usize],
        calibration: &DeviceCalibration,
    ) -> TdmcResult<(PaddedProgram, CompileReport)> {
        spec.validate()?;
        calibration.validate()?;

        let profile = ConcurrencyProfile::from_delays(delays)?;
        if spec.num_loops() != profile.num_loops() {
            return Err(TdmcError::LoopCountMismatch {
                expected: profile.num_loops(),
                actual: spec.num_loops(),
            });
        }
        if calibration.num_loops() != profile.num_loops() {
            return Err(TdmcError::LoopCountMismatch {
                expected: profile.num_loops(),
                actual: calibration.num_loops(),
            });
        }

        let mut report = CompileReport::new();

        // Squeezing: resolve against the supported set, then drain-pad
        let (user_squeezing, notices) = resolve_squeezing(&spec.squeezing, spec.modes, calibration)?;
        for notice in notices {
            report.push(notice);
        }
        let squeezing = pad_squeezing(&user_squeezing, &profile);

        // Per-loop rotation and beamsplitter sequences
        let mut rotations = Vec::with_capacity(profile.num_loops());
        let mut beamsplitters = Vec::with_capacity(profile.num_loops());
        let mut compensation = vec![0.0; profile.num_loops()];

        for (i, gates) in spec.loops.iter().enumerate() {
            let rotation = self.compensate_rotation(&gates.rotation, i, calibration)?;
            rotations.push(pad_rotation(&rotation, &profile, i));
            beamsplitters.push(pad_beamsplitter(&gates.beamsplitter, &profile, i));
            if self.mode == CompensationMode::Absorbed {
                compensation[i] = self.absorbed_angle(i, calibration, &profile, spec.modes, &mut report)?;
            }
        }

        let program = PaddedProgram::new(
            spec.modes,
            profile,
            squeezing,
            rotations,
            beamsplitters,
            compensation,
        )?;
        program.verify_fill_drain()?;

        Ok((program, report))
    }

    /// Apply explicit compensation to one user rotation sequence
    ///
    /// In absorbed mode the sequence passes through untouched; the static
    /// phase is handled by `absorbed_angle` instead.
    fn compensate_rotation(
        &self,
        rotation: &GateSequence,
        loop_index: usize,
        calibration: &DeviceCalibration,
    ) -> TdmcResult<GateSequence> {
        match self.mode {
            CompensationMode::Absorbed => Ok(rotation.clone()),
            CompensationMode::Explicit => {
                let shifted = rotation.shift_all(calibration.loop_phase(loop_index)?);
                if let Some((bin, value)) =
                    shifted.first_out_of_range(calibration.phase_min, calibration.phase_max)
                {
                    return Err(TdmcError::PhaseOutOfRange {
                        loop_index,
                        bin,
                        value,
                        min: calibration.phase_min,
                        max: calibration.phase_max,
                    });
                }
                Ok(shifted)
            }
        }
    }

    /// Fit the per-loop compensation angle, recording a wrap notice
    fn absorbed_angle(
        &self,
        loop_index: usize,
        calibration: &DeviceCalibration,
        profile: &ConcurrencyProfile,
        modes: usize,
        report: &mut CompileReport,
    ) -> TdmcResult<f64> {
        let offset = calibration.loop_phase(loop_index)?;
        let fitted = fit_absorbed_phase(
            offset,
            calibration.phase_min,
            calibration.phase_max,
            self.wrap_policy,
        )?;
        if fitted.wrapped {
            let start = profile.offset(loop_index);
            report.push(CompileNotice::PhaseWrap {
                loop_index,
                original: offset,
                wrapped: fitted.angle,
                bin_start: start,
                bin_end: start + modes,
            });
        }
        Ok(fitted.angle)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};
    use tdmc_core::control::FULL_TRANSMISSION;
    use tdmc_core::{LoopGates, SqueezingLevel, SqueezingSpec};

    fn three_loop_spec(modes: usize) -> RawCircuitSpec {
        RawCircuitSpec::vacuum(modes, 3).unwrap()
    }

    #[test]
    fn test_three_loop_shape() {
        let compiler = GateCompiler::new();
        let calibration = DeviceCalibration::ideal(3, 16);
        let (program, report) = compiler
            .compile(&three_loop_spec(216), &[1, 6, 36], &calibration)
            .unwrap();

        assert_eq!(program.len(), 259);
        assert_eq!(program.profile().n(), 44);
        assert_eq!(program.crop_offset(), 43);
        assert!(report.is_clean());
    }

    #[test]
    fn test_explicit_shift_applies_loop_phase() {
        let compiler = GateCompiler::new();
        let mut calibration = DeviceCalibration::ideal(1, 4);
        calibration.loop_phase_offsets = vec![0.25];

        let loops = vec![LoopGates::new(vec![0.1, 0.2, 0.3], vec![0.5, 0.5, 0.5])];
        let spec =
            RawCircuitSpec::new(3, SqueezingSpec::Level(SqueezingLevel::Zero), loops).unwrap();
        let (program, _) = compiler.compile(&spec, &[2], &calibration).unwrap();

        // User window starts after the register offset (0 for loop 0)
        assert_relative_eq!(program.rotation(0).values()[0], 0.35);
        assert_relative_eq!(program.rotation(0).values()[2], 0.55);
        assert_relative_eq!(program.compensation(0), 0.0);
    }

    #[test]
    fn test_explicit_out_of_range_is_hard_error() {
        let compiler = GateCompiler::new();
        let mut calibration = DeviceCalibration::ideal(1, 4);
        calibration.loop_phase_offsets = vec![FRAC_PI_2];

        let loops = vec![LoopGates::new(vec![0.0, 0.2], vec![0.0, 0.0])];
        let spec =
            RawCircuitSpec::new(2, SqueezingSpec::Level(SqueezingLevel::Zero), loops).unwrap();
        let err = compiler.compile(&spec, &[1], &calibration).unwrap_err();

        assert!(matches!(
            err,
            TdmcError::PhaseOutOfRange { loop_index: 0, bin: 1, .. }
        ));
    }

    #[test]
    fn test_absorbed_mode_wraps_and_reports() {
        let compiler = GateCompiler::new().with_mode(CompensationMode::Absorbed);
        let mut calibration = DeviceCalibration::ideal(2, 4);
        calibration.loop_phase_offsets = vec![0.3, 2.0];

        let (program, report) = compiler
            .compile(&RawCircuitSpec::vacuum(4, 2).unwrap(), &[1, 3], &calibration)
            .unwrap();

        assert_relative_eq!(program.compensation(0), 0.3);
        assert_relative_eq!(program.compensation(1), 2.0 - PI);
        assert_eq!(report.phase_wrap_count(), 1);

        // Wrap notice covers the second loop's user window
        let notice = report
            .notices()
            .iter()
            .find(|n| n.is_phase_wrap())
            .unwrap();
        assert_eq!(notice.affected_bins(), 1..5);
    }

    #[test]
    fn test_quantization_notices_propagate() {
        let compiler = GateCompiler::new();
        let calibration = DeviceCalibration::ideal(1, 4); // supports {0.0, 0.4, 0.7, 1.0}

        let loops = vec![LoopGates::idle(2)];
        let spec = RawCircuitSpec::new(2, SqueezingSpec::Uniform(0.95), loops).unwrap();
        let (program, report) = compiler.compile(&spec, &[1], &calibration).unwrap();

        assert_eq!(report.quantization_count(), 1);
        assert_relative_eq!(program.squeezing().values()[0], 1.0);
    }

    #[test]
    fn test_fill_windows_forced_to_full_transmission() {
        let compiler = GateCompiler::new();
        let calibration = DeviceCalibration::ideal(1, 4);

        // User requests non-trivial coupling everywhere
        let loops = vec![LoopGates::new(vec![0.0; 5], vec![0.7; 5])];
        let spec =
            RawCircuitSpec::new(5, SqueezingSpec::Level(SqueezingLevel::Zero), loops).unwrap();
        let (program, _) = compiler.compile(&spec, &[3], &calibration).unwrap();

        let bs = program.beamsplitter(0).values();
        assert_eq!(bs.len(), 8);
        assert_eq!(&bs[..3], &[FULL_TRANSMISSION; 3]);
        assert_relative_eq!(bs[3], 0.7);
        assert_relative_eq!(bs[4], 0.7);
        assert_eq!(&bs[5..], &[FULL_TRANSMISSION; 3]);
    }

    #[test]
    fn test_loop_count_mismatch() {
        let compiler = GateCompiler::new();
        let calibration = DeviceCalibration::ideal(2, 4);
        let err = compiler
            .compile(&RawCircuitSpec::vacuum(4, 2).unwrap(), &[1], &calibration)
            .unwrap_err();
        assert!(matches!(err, TdmcError::LoopCountMismatch { .. }));
    }
}
