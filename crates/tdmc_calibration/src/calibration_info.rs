//! Device calibration snapshot for TDMC
//!
//! A `DeviceCalibration` is a read-only snapshot of the certificate a
//! photonic device publishes: discrete supported squeezing values, static
//! loop phases, and the efficiency ladder. It is fetched once per session
//! by a collaborator and passed explicitly into every compilation call;
//! the compiler never re-fetches mid-compilation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, SystemTime};
use tdmc_core::{modulator, SqueezingLevel, TdmcError, TdmcResult};

/// Calibration data from a delay-loop photonic device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCalibration {
    /// Device name
    pub device_name: String,

    /// Snapshot timestamp
    #[serde(with = "system_time_serde")]
    pub timestamp: SystemTime,

    /// Named squeezing level -> calibrated numeric value
    pub squeezing_levels: HashMap<String, f64>,

    /// Full supported squeezing value set, used for quantization
    pub supported_squeezing: Vec<f64>,

    /// Static phase offset per loop (radians, physical order)
    pub loop_phase_offsets: Vec<f64>,

    /// Common-path efficiency applied once at circuit input
    pub global_efficiency: f64,

    /// Round-trip efficiency per loop (physical order)
    pub loop_efficiencies: Vec<f64>,

    /// Relative efficiency per detection channel (length = channel count)
    pub relative_channel_efficiencies: Vec<f64>,

    /// Lower bound of the modulator's representable phase range (radians)
    pub phase_min: f64,

    /// Upper bound of the modulator's representable phase range (radians)
    pub phase_max: f64,
}

impl DeviceCalibration {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty calibration snapshot
    pub fn new(device_name: &str) -> Self {
        Self {
            device_name: device_name.to_string(),
            timestamp: SystemTime::now(),
            squeezing_levels: HashMap::new(),
            supported_squeezing: Vec::new(),
            loop_phase_offsets: Vec::new(),
            global_efficiency: 1.0,
            loop_efficiencies: Vec::new(),
            relative_channel_efficiencies: Vec::new(),
            phase_min: modulator::DEFAULT_PHASE_MIN,
            phase_max: modulator::DEFAULT_PHASE_MAX,
        }
    }

    /// Create from uniform values (for testing/simulation)
    pub fn uniform(
        device_name: &str,
        num_loops: usize,
        num_channels: usize,
        loop_efficiency: f64,
        global_efficiency: f64,
    ) -> Self {
        let mut cal = Self::new(device_name);

        cal.squeezing_levels = [
            ("zero".to_string(), 0.0),
            ("low".to_string(), 0.4),
            ("medium".to_string(), 0.7),
            ("high".to_string(), 1.0),
        ]
        .into_iter()
        .collect();
        cal.supported_squeezing = vec![0.0, 0.4, 0.7, 1.0];

        cal.loop_phase_offsets = vec![0.0; num_loops];
        cal.loop_efficiencies = vec![loop_efficiency; num_loops];
        cal.global_efficiency = global_efficiency;
        cal.relative_channel_efficiencies = vec![1.0; num_channels];

        cal
    }

    /// Ideal (lossless, phase-free) calibration for `num_loops` loops
    pub fn ideal(num_loops: usize, num_channels: usize) -> Self {
        Self::uniform("ideal_device", num_loops, num_channels, 1.0, 1.0)
    }

    /// Typical three-loop device certificate (for testing)
    ///
    /// Three loops with round-trip lengths 1, 6 and 36 time bins and a
    /// 16-channel detection stage.
    pub fn three_loop_typical() -> Self {
        use tdmc_core::device;

        let mut cal = Self::new("triple_loop");

        cal.squeezing_levels = [
            ("zero".to_string(), 0.0),
            ("low".to_string(), 0.601),
            ("medium".to_string(), 0.897),
            ("high".to_string(), 1.123),
        ]
        .into_iter()
        .collect();
        cal.supported_squeezing = vec![0.0, 0.601, 0.897, 1.123];

        cal.loop_phase_offsets = device::DEFAULT_LOOP_PHASES.to_vec();
        cal.loop_efficiencies = device::DEFAULT_LOOP_EFFICIENCIES.to_vec();
        cal.global_efficiency = device::DEFAULT_GLOBAL_EFFICIENCY;

        // Mild channel-to-channel spread around unity
        cal.relative_channel_efficiencies = (0..device::DEFAULT_CHANNELS)
            .map(|c| 1.0 - 0.004 * (c % 5) as f64)
            .collect();

        cal
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of delay loops covered by this snapshot
    pub fn num_loops(&self) -> usize {
        self.loop_phase_offsets.len().max(self.loop_efficiencies.len())
    }

    /// Number of detection channels
    pub fn num_channels(&self) -> usize {
        self.relative_channel_efficiencies.len()
    }

    /// Calibrated value for a named squeezing level
    pub fn level_value(&self, level: SqueezingLevel) -> TdmcResult<f64> {
        self.squeezing_levels
            .get(level.as_str())
            .copied()
            .ok_or_else(|| TdmcError::UnknownSqueezingLevel(level.as_str().to_string()))
    }

    /// Static phase offset for loop `i`
    pub fn loop_phase(&self, loop_index: usize) -> TdmcResult<f64> {
        self.loop_phase_offsets.get(loop_index).copied().ok_or(
            TdmcError::LoopCountMismatch {
                expected: loop_index + 1,
                actual: self.loop_phase_offsets.len(),
            },
        )
    }

    /// Round-trip efficiency for loop `i`
    pub fn loop_efficiency(&self, loop_index: usize) -> TdmcResult<f64> {
        self.loop_efficiencies.get(loop_index).copied().ok_or(
            TdmcError::LoopCountMismatch {
                expected: loop_index + 1,
                actual: self.loop_efficiencies.len(),
            },
        )
    }

    /// Check if the snapshot is fresh (within TTL)
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        match self.timestamp.elapsed() {
            Ok(elapsed) => elapsed < ttl,
            Err(_) => false,
        }
    }

    /// Age of the snapshot
    pub fn age(&self) -> Option<Duration> {
        self.timestamp.elapsed().ok()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check internal consistency of the snapshot
    pub fn validate(&self) -> TdmcResult<()> {
        if self.supported_squeezing.is_empty() {
            return Err(TdmcError::EmptySupportedSet);
        }
        if self.relative_channel_efficiencies.is_empty() {
            return Err(TdmcError::EmptyChannelTable);
        }
        if self.loop_phase_offsets.len() != self.loop_efficiencies.len() {
            return Err(TdmcError::LoopCountMismatch {
                expected: self.loop_phase_offsets.len(),
                actual: self.loop_efficiencies.len(),
            });
        }
        if !(self.global_efficiency > 0.0 && self.global_efficiency <= 1.0) {
            return Err(TdmcError::InvalidEfficiency(self.global_efficiency));
        }
        for &eta in &self.loop_efficiencies {
            if !(eta > 0.0 && eta <= 1.0) {
                return Err(TdmcError::InvalidEfficiency(eta));
            }
        }
        for &eta in &self.relative_channel_efficiencies {
            if !(eta > 0.0 && eta <= 1.0) {
                return Err(TdmcError::InvalidEfficiency(eta));
            }
        }
        if self.phase_min >= self.phase_max {
            return Err(TdmcError::CalibrationError(format!(
                "empty phase range [{}, {}]",
                self.phase_min, self.phase_max
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DeviceCalibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeviceCalibration({}, {} loops, {} channels, eta_glob={:.3})",
            self.device_name,
            self.num_loops(),
            self.num_channels(),
            self.global_efficiency
        )
    }
}

// ============================================================================
// SystemTime Serde Helper
// ============================================================================

mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_new() {
        let cal = DeviceCalibration::new("test_device");
        assert_eq!(cal.device_name, "test_device");
        assert_eq!(cal.num_loops(), 0);
    }

    #[test]
    fn test_uniform_calibration() {
        let cal = DeviceCalibration::uniform("test", 3, 16, 0.9, 0.95);
        assert_eq!(cal.num_loops(), 3);
        assert_eq!(cal.num_channels(), 16);
        assert!(cal.validate().is_ok());
    }

    #[test]
    fn test_three_loop_typical() {
        let cal = DeviceCalibration::three_loop_typical();
        assert_eq!(cal.num_loops(), 3);
        assert_eq!(cal.num_channels(), 16);
        assert!(cal.validate().is_ok());
    }

    #[test]
    fn test_level_value() {
        let cal = DeviceCalibration::three_loop_typical();
        assert_eq!(cal.level_value(SqueezingLevel::Zero).unwrap(), 0.0);
        assert!(cal.level_value(SqueezingLevel::High).unwrap() > 1.0);
    }

    #[test]
    fn test_unknown_level() {
        let cal = DeviceCalibration::new("empty");
        let err = cal.level_value(SqueezingLevel::High).unwrap_err();
        assert!(err.is_calibration_error());
    }

    #[test]
    fn test_loop_accessors() {
        let cal = DeviceCalibration::three_loop_typical();
        assert!(cal.loop_phase(2).is_ok());
        assert!(cal.loop_efficiency(2).is_ok());
        assert!(cal.loop_phase(3).is_err());
    }

    #[test]
    fn test_validate_empty_supported_set() {
        let mut cal = DeviceCalibration::three_loop_typical();
        cal.supported_squeezing.clear();
        assert_eq!(cal.validate().unwrap_err(), TdmcError::EmptySupportedSet);
    }

    #[test]
    fn test_validate_empty_channels() {
        let mut cal = DeviceCalibration::three_loop_typical();
        cal.relative_channel_efficiencies.clear();
        assert_eq!(cal.validate().unwrap_err(), TdmcError::EmptyChannelTable);
    }

    #[test]
    fn test_validate_bad_efficiency() {
        let mut cal = DeviceCalibration::three_loop_typical();
        cal.loop_efficiencies[1] = 1.4;
        assert!(cal.validate().is_err());
    }

    #[test]
    fn test_freshness() {
        let cal = DeviceCalibration::new("test");
        assert!(cal.is_fresh(Duration::from_secs(60)));
    }

    #[test]
    fn test_serialization() {
        let cal = DeviceCalibration::three_loop_typical();
        let json = serde_json::to_string(&cal).unwrap();
        let restored: DeviceCalibration = serde_json::from_str(&json).unwrap();

        assert_eq!(cal.device_name, restored.device_name);
        assert_eq!(cal.supported_squeezing, restored.supported_squeezing);
        assert_eq!(cal.num_channels(), restored.num_channels());
    }
}
