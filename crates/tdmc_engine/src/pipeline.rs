//! Pipeline for staged TDMC compilation
//!
//! Provides staged execution with intermediate results: calibration,
//! gate-argument compilation, loss composition, and optional
//! space-unrolling, ending in an `ExecutionRequest` for a collaborator.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tdmc_calibration::DeviceCalibration;
use tdmc_compile::{CompileReport, LossProgram, PaddedProgram};
use tdmc_core::{DelayLine, RawCircuitSpec, TdmcError, TdmcResult};
use tdmc_unroll::{SpaceUnroller, TransferOperator, UnrolledCircuit};

use crate::config::{DeviceProfile, TdmcConfig};
use crate::submission::{ExecutionRequest, SampleShape};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Initial state
    Initial,
    /// Calibration snapshot loaded
    Calibrated,
    /// Padded program compiled
    Compiled,
    /// Losses composed
    Composed,
    /// Circuit unrolled
    Unrolled,
}

/// Pipeline state holding intermediate results
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// Current stage
    pub stage: PipelineStage,

    /// Configuration
    pub config: TdmcConfig,

    /// Calibration snapshot
    pub calibration: Option<DeviceCalibration>,

    /// Loop chain, geometry cross-checked against the snapshot
    pub delay_lines: Option<Vec<DelayLine>>,

    /// Compiled padded program
    pub program: Option<PaddedProgram>,

    /// Notices gathered during compilation
    pub report: Option<CompileReport>,

    /// Loss-composed program
    pub loss: Option<LossProgram>,

    /// Space-unrolled circuit
    pub circuit: Option<UnrolledCircuit>,
}

impl PipelineState {
    /// Create new pipeline state
    pub fn new(config: TdmcConfig) -> Self {
        Self {
            stage: PipelineStage::Initial,
            config,
            calibration: None,
            delay_lines: None,
            program: None,
            report: None,
            loss: None,
            circuit: None,
        }
    }

    /// Check if a calibration snapshot is loaded
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Check if a program was compiled
    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    /// Check if losses were composed
    pub fn is_composed(&self) -> bool {
        self.loss.is_some()
    }

    /// Check if the circuit was unrolled
    pub fn is_unrolled(&self) -> bool {
        self.circuit.is_some()
    }
}

/// Result of a full pipeline run
#[derive(Debug, Clone)]
pub struct CompilationResult {
    /// Submission handed to the execution collaborator
    pub request: ExecutionRequest,

    /// Notices gathered during compilation
    pub report: CompileReport,

    /// Shape of the sample array the collaborator must return
    pub sample_shape: SampleShape,

    /// Wall-clock compilation time in milliseconds
    pub total_time_ms: u64,
}

/// TDMC compilation pipeline
pub struct Pipeline {
    /// Current state
    state: PipelineState,

    /// Verbose output
    verbose: bool,
}

impl Pipeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new pipeline with configuration
    pub fn new(config: TdmcConfig) -> Self {
        let verbose = config.verbose;
        Self {
            state: PipelineState::new(config),
            verbose,
        }
    }

    /// Create pipeline with the default three-loop configuration
    pub fn three_loop() -> Self {
        Self::new(TdmcConfig::three_loop())
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> PipelineStage {
        self.state.stage
    }

    /// Get current state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Get configuration
    pub fn config(&self) -> &TdmcConfig {
        &self.state.config
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Stage 1: Calibration
    ///
    /// Loads the calibration snapshot selected by the configuration. A
    /// `Custom` profile requires [`Pipeline::set_calibration`] first; the
    /// snapshot is then held immutable for the rest of the compilation.
    pub fn calibrate(&mut self) -> TdmcResult<&DeviceCalibration> {
        if self.verbose {
            println!("Pipeline: Loading calibration...");
        }

        self.state.config.validate()?;

        let calibration = match self.state.config.device {
            DeviceProfile::Typical => DeviceCalibration::three_loop_typical(),
            DeviceProfile::Ideal => DeviceCalibration::ideal(
                self.state.config.num_loops(),
                self.state.config.channels,
            ),
            DeviceProfile::Custom => match self.state.calibration.take() {
                Some(calibration) => calibration,
                None => {
                    return Err(TdmcError::CalibrationError(
                        "custom device profile requires an injected snapshot".to_string(),
                    ));
                }
            },
        };
        calibration.validate()?;

        // Cross-check the configured geometry against the snapshot tables
        let delay_lines = DelayLine::chain(
            &self.state.config.delays,
            &calibration.loop_phase_offsets,
            &calibration.loop_efficiencies,
        )?;

        self.state.calibration = Some(calibration);
        self.state.delay_lines = Some(delay_lines);
        self.state.stage = PipelineStage::Calibrated;

        Ok(self.state.calibration.as_ref().unwrap())
    }

    /// Inject a caller-supplied calibration snapshot (`Custom` profile)
    pub fn set_calibration(&mut self, calibration: DeviceCalibration) {
        self.state.config.device = DeviceProfile::Custom;
        self.state.calibration = Some(calibration);
    }

    /// Stage 2: Gate-argument compilation
    ///
    /// Compiles the raw spec into a padded program, collecting
    /// quantization and phase-wrap notices.
    pub fn compile(&mut self, spec: &RawCircuitSpec) -> TdmcResult<&PaddedProgram> {
        if self.state.calibration.is_none() {
            self.calibrate()?;
        }

        if self.verbose {
            println!(
                "Pipeline: Compiling {} modes over {} loops...",
                spec.modes,
                spec.num_loops()
            );
        }

        let calibration = self.state.calibration.as_ref().unwrap();
        let compiler = self.state.config.to_compiler();
        let (program, report) = compiler.compile(spec, &self.state.config.delays, calibration)?;

        self.state.program = Some(program);
        self.state.report = Some(report);
        self.state.stage = PipelineStage::Compiled;

        Ok(self.state.program.as_ref().unwrap())
    }

    /// Stage 3: Loss composition
    ///
    /// Attaches the calibrated global, loop, and channel losses.
    pub fn compose_loss(&mut self) -> TdmcResult<&LossProgram> {
        let program = match self.state.program.as_ref() {
            Some(program) => program.clone(),
            None => {
                return Err(TdmcError::InternalError(
                    "compose_loss called before compile".to_string(),
                ));
            }
        };

        if self.verbose {
            println!("Pipeline: Composing losses...");
        }

        let calibration = self.state.calibration.as_ref().unwrap();
        let loss = LossProgram::compose(program, calibration)?;

        self.state.loss = Some(loss);
        self.state.stage = PipelineStage::Composed;

        Ok(self.state.loss.as_ref().unwrap())
    }

    /// Stage 4: Space-unrolling
    ///
    /// Rewrites the recurrent program into its acyclic form.
    pub fn unroll(&mut self) -> TdmcResult<&UnrolledCircuit> {
        if self.state.loss.is_none() {
            self.compose_loss()?;
        }

        if self.verbose {
            println!("Pipeline: Unrolling circuit...");
        }

        let loss = self.state.loss.as_ref().unwrap();
        let circuit = SpaceUnroller::new().unroll(loss)?;

        self.state.circuit = Some(circuit);
        self.state.stage = PipelineStage::Unrolled;

        Ok(self.state.circuit.as_ref().unwrap())
    }

    /// Extract the transfer operator of the current unrolled circuit
    ///
    /// Squeezing operations are stripped first; the result covers the
    /// passive action on the computational registers only.
    pub fn transfer_operator(&mut self) -> TdmcResult<TransferOperator> {
        if self.state.circuit.is_none() {
            self.unroll()?;
        }
        let circuit = self.state.circuit.as_ref().unwrap();
        TransferOperator::extract(&circuit.strip_active())
    }

    /// Run the full pipeline on one spec
    ///
    /// Executes all stages in sequence and packages the submission.
    pub fn run(&mut self, spec: &RawCircuitSpec) -> TdmcResult<CompilationResult> {
        let start_time = Instant::now();

        self.calibrate()?;
        self.compile(spec)?;
        self.compose_loss()?;
        if self.state.config.space_unroll {
            self.unroll()?;
        }

        let loss = self.state.loss.clone().unwrap();
        let report = self.state.report.clone().unwrap();
        let circuit = self.state.circuit.clone();

        let request = ExecutionRequest::new(
            loss,
            circuit,
            self.state.config.shots,
            self.state.config.crop,
        );
        let sample_shape = request.sample_shape();
        let total_time_ms = start_time.elapsed().as_millis() as u64;

        if self.verbose {
            println!(
                "Pipeline: Done in {} ms, sample shape {}",
                total_time_ms, sample_shape
            );
        }

        Ok(CompilationResult {
            request,
            report,
            sample_shape,
            total_time_ms,
        })
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Reset pipeline to initial state
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.state = PipelineState::new(config);
    }

    /// Reset and reconfigure
    pub fn reconfigure(&mut self, config: TdmcConfig) {
        self.verbose = config.verbose;
        self.state = PipelineState::new(config);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tdmc_compile::CompensationMode;
    use tdmc_core::RawCircuitSpec;

    #[test]
    fn test_pipeline_new() {
        let pipeline = Pipeline::three_loop();
        assert_eq!(pipeline.stage(), PipelineStage::Initial);
    }

    #[test]
    fn test_calibrate() {
        let mut pipeline = Pipeline::three_loop();

        pipeline.calibrate().unwrap();

        assert_eq!(pipeline.stage(), PipelineStage::Calibrated);
        assert!(pipeline.state().is_calibrated());

        let lines = pipeline.state().delay_lines.as_ref().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].length, 36);
    }

    #[test]
    fn test_snapshot_geometry_mismatch_rejected() {
        let config = TdmcConfig::ideal(vec![1, 2], 4);
        let mut pipeline = Pipeline::new(config);
        pipeline.set_calibration(DeviceCalibration::ideal(1, 4));

        assert!(matches!(
            pipeline.calibrate().unwrap_err(),
            TdmcError::LoopCountMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_custom_profile_requires_snapshot() {
        let config = TdmcConfig::single_loop(3, 5).with_device(DeviceProfile::Custom);
        let mut pipeline = Pipeline::new(config);
        assert!(pipeline.calibrate().is_err());

        pipeline.set_calibration(DeviceCalibration::ideal(1, 4));
        assert!(pipeline.calibrate().is_ok());
    }

    #[test]
    fn test_compile_stage() {
        let mut pipeline = Pipeline::new(TdmcConfig::single_loop(3, 5));
        let spec = RawCircuitSpec::vacuum(5, 1).unwrap();

        let program = pipeline.compile(&spec).unwrap();
        assert_eq!(program.len(), 8);
        assert_eq!(pipeline.stage(), PipelineStage::Compiled);
        assert!(pipeline.state().is_compiled());
    }

    #[test]
    fn test_compose_before_compile_fails() {
        let mut pipeline = Pipeline::new(TdmcConfig::single_loop(3, 5));
        assert!(pipeline.compose_loss().is_err());
    }

    #[test]
    fn test_unroll_stage() {
        let mut pipeline = Pipeline::new(TdmcConfig::single_loop(3, 5));
        let spec = RawCircuitSpec::vacuum(5, 1).unwrap();

        pipeline.compile(&spec).unwrap();
        let circuit = pipeline.unroll().unwrap();

        assert_eq!(circuit.measurements().len(), 8);
        assert_eq!(pipeline.stage(), PipelineStage::Unrolled);
        assert!(pipeline.state().is_unrolled());
    }

    #[test]
    fn test_full_run() {
        let config = TdmcConfig::three_loop().with_space_unroll(true);
        let mut pipeline = Pipeline::new(config);
        let spec = RawCircuitSpec::vacuum(216, 3).unwrap();

        let result = pipeline.run(&spec).unwrap();

        assert!(result.request.space_unroll());
        assert_eq!(result.sample_shape.temporal_modes, 216);
        assert_eq!(result.sample_shape.spatial_registers, 1);
    }

    #[test]
    fn test_run_without_unroll_flag() {
        let mut pipeline = Pipeline::new(TdmcConfig::single_loop(2, 4).with_crop(false));
        let spec = RawCircuitSpec::vacuum(4, 1).unwrap();

        let result = pipeline.run(&spec).unwrap();
        assert!(!result.request.space_unroll());
        assert_eq!(result.sample_shape.temporal_modes, 6);
    }

    #[test]
    fn test_absorbed_mode_configuration() {
        let config = TdmcConfig::three_loop().with_compensation(CompensationMode::Absorbed);
        let mut pipeline = Pipeline::new(config);
        let spec = RawCircuitSpec::vacuum(216, 3).unwrap();

        let program = pipeline.compile(&spec).unwrap().clone();
        // Typical loop phases all fit without wrapping
        assert!(pipeline.state().report.as_ref().unwrap().is_clean());
        assert!(program.compensation(0).abs() > 0.0);
    }

    #[test]
    fn test_reset() {
        let mut pipeline = Pipeline::three_loop();

        pipeline.calibrate().unwrap();
        assert!(pipeline.state().is_calibrated());

        pipeline.reset();
        assert_eq!(pipeline.stage(), PipelineStage::Initial);
        assert!(!pipeline.state().is_calibrated());
    }

    #[test]
    fn test_reconfigure() {
        let mut pipeline = Pipeline::three_loop();

        pipeline.calibrate().unwrap();
        pipeline.reconfigure(TdmcConfig::single_loop(3, 5));

        assert_eq!(pipeline.stage(), PipelineStage::Initial);
        assert_eq!(pipeline.config().modes, 5);
    }

    #[test]
    fn test_transfer_operator_shortcut() {
        let mut pipeline = Pipeline::new(TdmcConfig::single_loop(2, 4));
        let spec = RawCircuitSpec::vacuum(4, 1).unwrap();

        pipeline.compile(&spec).unwrap();
        let transfer = pipeline.transfer_operator().unwrap();
        assert_eq!(transfer.dim(), 4);
    }
}
