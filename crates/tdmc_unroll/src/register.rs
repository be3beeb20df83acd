//! Unrolled register identifiers
//!
//! Space-unrolling replaces the handful of physical buffer slots with one
//! register per mode occurrence. Registers are allocated in strictly
//! increasing id order, created exactly once and never reused, which is
//! what makes the unrolled operation list feed-forward.

use serde::{Deserialize, Serialize};
use std::fmt;
use tdmc_core::TimeBin;

/// Identifier of one unrolled register
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegisterId(pub usize);

impl RegisterId {
    /// Raw index, usable as a matrix row/column
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Allocates register ids and remembers each register's creation bin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTable {
    created_at: Vec<TimeBin>,
}

impl RegisterTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh register created at `bin`
    pub fn alloc(&mut self, bin: TimeBin) -> RegisterId {
        let id = RegisterId(self.created_at.len());
        self.created_at.push(bin);
        id
    }

    /// Number of registers allocated so far
    pub fn len(&self) -> usize {
        self.created_at.len()
    }

    /// True when nothing has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.created_at.is_empty()
    }

    /// Creation bin of `id`, if it was allocated by this table
    pub fn creation_bin(&self, id: RegisterId) -> Option<TimeBin> {
        self.created_at.get(id.0).copied()
    }
}

// ============================================================================
// Tests
// ============================================================================
