//! # TDMC Core
//!
//! Foundation types, gate sequences, and the delay-loop model for the
//! Time-Domain Multiplexing Compiler.
//!
//! ## Architecture
//!
//! ```text
//! tdmc_core
//!     Foundation
//!         CoreTypes   // aliases + validated Efficiency wrapper
//!         Constants   // control values, modulator range, device defaults
//!         Errors      // TdmcError taxonomy
//!     Circuit
//!         GateSequence        // per-time-bin control values
//!         DelayLine           // optical buffer model
//!         ConcurrencyProfile  // mode-index calculator output
//!         RawCircuitSpec      // user-facing circuit description
//!         RawSpecBuilder      // fluent construction
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tdmc_core::prelude::*;
//!
//! // Derive concurrency accounting from the loop delays
//! let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
//! assert_eq!(profile.n(), 44);
//! assert_eq!(profile.program_length(216), 259);
//!
//! // Describe a submission
//! let spec = RawSpecBuilder::new(216)
//!     .squeezing_level(SqueezingLevel::High)
//!     .idle_loop()
//!     .idle_loop()
//!     .idle_loop()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(spec.num_loops(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types and validated wrappers
pub mod types;

/// Control-value and device constants
pub mod constants;

/// Error types
pub mod error;

/// Per-time-bin gate sequences
pub mod sequence;

/// Delay-loop model
pub mod delay;

/// Mode-index calculator
pub mod modes;

/// Raw circuit specification
pub mod circuit;

/// Circuit spec builder
pub mod builder;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::RawSpecBuilder;
pub use circuit::{LoopGates, RawCircuitSpec, SqueezingLevel, SqueezingSpec};
pub use constants::{control, device, modulator};
pub use delay::DelayLine;
pub use error::{TdmcError, TdmcResult};
pub use modes::ConcurrencyProfile;
pub use sequence::GateSequence;
pub use types::{Efficiency, LoopId, Phase, Squeezing, TimeBin};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use tdmc_core::prelude::*;
    //! ```

    pub use crate::builder::RawSpecBuilder;
    pub use crate::circuit::{LoopGates, RawCircuitSpec, SqueezingLevel, SqueezingSpec};
    pub use crate::constants::{control, device, modulator};
    pub use crate::delay::DelayLine;
    pub use crate::error::{TdmcError, TdmcResult};
    pub use crate::modes::ConcurrencyProfile;
    pub use crate::sequence::GateSequence;
    pub use crate::types::{Efficiency, LoopId, Phase, Squeezing, TimeBin};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
