//! # TDMC Calibration
//!
//! Device calibration snapshot management for delay-loop photonic devices.
//!
//! ## Architecture
//!
//! ```text
//! tdmc_calibration
//!     DeviceCalibration // read-only session snapshot
//!         squeezing_levels, supported_squeezing
//!         loop_phase_offsets, loop/global/channel efficiencies
//!         phase_min, phase_max
//!         uniform(), ideal(), three_loop_typical()
//!         level_value(), validate(), is_fresh()
//! ```
//!
//! Calibration data is logically global, session-scoped state. It is passed
//! explicitly into every compilation call so compilation stays a pure
//! function of its inputs; staleness handling belongs to the collaborator
//! that fetched the snapshot.
//!
//! ## Quick Start
//!
//! ```rust
//! use tdmc_calibration::prelude::*;
//! use tdmc_core::SqueezingLevel;
//!
//! let cal = DeviceCalibration::three_loop_typical();
//! assert!(cal.validate().is_ok());
//!
//! let high = cal.level_value(SqueezingLevel::High).unwrap();
//! assert!(cal.supported_squeezing.contains(&high));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Calibration snapshot
pub mod calibration_info;

pub use calibration_info::DeviceCalibration;

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::calibration_info::DeviceCalibration;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
