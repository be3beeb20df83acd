//! Squeezing quantization for TDMC
//!
//! The pump laser supports a small discrete set of squeezing values.
//! Requested values are projected onto the nearest supported value; ties
//! resolve toward the lower supported value. Quantization is idempotent:
//! a value already in the supported set is returned unchanged.

use crate::report::CompileNotice;
use tdmc_calibration::DeviceCalibration;
use tdmc_core::{GateSequence, SqueezingSpec, TdmcError, TdmcResult};

/// Project one value onto the nearest supported value (ties toward lower)
pub fn quantize_value(value: f64, supported: &[f64]) -> TdmcResult<f64> {
    if supported.is_empty() {
        return Err(TdmcError::EmptySupportedSet);
    }

    let mut best = supported[0];
    let mut best_diff = (value - best).abs();
    for &candidate in &supported[1..] {
        let diff = (value - candidate).abs();
        if diff < best_diff || (diff == best_diff && candidate < best) {
            best = candidate;
            best_diff = diff;
        }
    }
    Ok(best)
}

/// Resolve a squeezing spec into a per-mode sequence of supported values
///
/// Named levels map directly to their calibrated value and emit no notice.
/// A uniform numeric request emits at most one broadcast notice; per-bin
/// requests emit one notice per changed bin.
pub fn resolve_squeezing(
    spec: &SqueezingSpec,
    modes: usize,
    calibration: &DeviceCalibration,
) -> TdmcResult<(GateSequence, Vec<CompileNotice>)> {
    let mut notices = Vec::new();

    let sequence = match spec {
        SqueezingSpec::Level(level) => {
            let value = calibration.level_value(*level)?;
            GateSequence::constant(value, modes)
        }
        SqueezingSpec::Uniform(requested) => {
            let applied = quantize_value(*requested, &calibration.supported_squeezing)?;
            if applied != *requested {
                notices.push(CompileNotice::Quantization {
                    bin: None,
                    requested: *requested,
                    applied,
                });
            }
            GateSequence::constant(applied, modes)
        }
        SqueezingSpec::Values(requested) => {
            let mut applied = Vec::with_capacity(requested.len());
            for (bin, &value) in requested.iter().enumerate() {
                let q = quantize_value(value, &calibration.supported_squeezing)?;
                if q != value {
                    notices.push(CompileNotice::Quantization {
                        bin: Some(bin),
                        requested: value,
                        applied: q,
                    });
                }
                applied.push(q);
            }
            GateSequence::new(applied)
        }
    };

    Ok((sequence, notices))
}

// ============================================================================
// Tests
// ============================================================================
