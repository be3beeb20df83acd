//! Mode-index accounting for TDMC
//!
//! Derives the concurrent-mode count and per-loop register offsets from the
//! ordered list of loop delay lengths. Pure, constant-time bookkeeping used
//! by both the gate-argument compiler (padding lengths) and the
//! space-unroller (resident buffer slots).

use crate::error::{TdmcError, TdmcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Concurrency accounting derived from the loop delay lengths
///
/// `n` is the number of simultaneously live physical registers:
/// one traveling mode plus one stored mode per time bin of delay.
/// `register_offsets[i]` is the resident-buffer slot loop `i` reads and
/// writes at a given time bin; the trailing slot `n - 1` is the terminal
/// (detection) reference used after the last loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyProfile {
    n: usize,
    register_offsets: Vec<usize>,
    delays: Vec<usize>,
}

impl ConcurrencyProfile {
    /// Derive the profile from ordered positive delay lengths
    pub fn from_delays(delays: &[usize]) -> TdmcResult<Self> {
        if delays.is_empty() {
            return Err(TdmcError::EmptyDelayList);
        }
        if let Some(loop_index) = delays.iter().position(|&d| d == 0) {
            return Err(TdmcError::ZeroLengthDelay { loop_index });
        }

        let mut register_offsets = Vec::with_capacity(delays.len());
        let mut acc = 0usize;
        for &d in delays {
            register_offsets.push(acc);
            acc += d;
        }

        Ok(Self {
            n: 1 + acc,
            register_offsets,
            delays: delays.to_vec(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of simultaneously live physical registers, `1 + sum(delays)`
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Buffer slot loop `i` reads/writes at a given time bin
    #[inline]
    pub fn offset(&self, loop_index: usize) -> usize {
        self.register_offsets[loop_index]
    }

    /// All per-loop register offsets, physical order
    pub fn register_offsets(&self) -> &[usize] {
        &self.register_offsets
    }

    /// Terminal (detection) slot, `n - 1`
    #[inline]
    pub fn terminal_slot(&self) -> usize {
        self.n - 1
    }

    /// Number of delay loops
    pub fn num_loops(&self) -> usize {
        self.delays.len()
    }

    /// Delay lengths, physical order
    pub fn delays(&self) -> &[usize] {
        &self.delays
    }

    /// Total delay `sum(delays)`, also the crop offset of a compiled program
    #[inline]
    pub fn total_delay(&self) -> usize {
        self.n - 1
    }

    /// Compiled program length for `modes` computational modes,
    /// `L = M + sum(delays)`
    #[inline]
    pub fn program_length(&self, modes: usize) -> usize {
        modes + self.total_delay()
    }

    /// Number of trailing drain bins for loop `i`, `sum(delays[i..])`
    pub fn drain_length(&self, loop_index: usize) -> usize {
        self.delays[loop_index..].iter().sum()
    }
}

impl fmt::Display for ConcurrencyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConcurrencyProfile(N={}, offsets={:?})",
            self.n, self.register_offsets
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_loop_device() {
        // delays [1, 6, 36] -> N = 44, offsets [0, 1, 7], terminal 43
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        assert_eq!(profile.n(), 44);
        assert_eq!(profile.register_offsets(), &[0, 1, 7]);
        assert_eq!(profile.terminal_slot(), 43);
        assert_eq!(profile.total_delay(), 43);
    }

    #[test]
    fn test_program_length_216_modes() {
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        assert_eq!(profile.program_length(216), 259);
    }

    #[test]
    fn test_single_loop() {
        let profile = ConcurrencyProfile::from_delays(&[3]).unwrap();
        assert_eq!(profile.n(), 4);
        assert_eq!(profile.register_offsets(), &[0]);
        assert_eq!(profile.program_length(5), 8);
    }

    #[test]
    fn test_drain_lengths() {
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        assert_eq!(profile.drain_length(0), 43);
        assert_eq!(profile.drain_length(1), 42);
        assert_eq!(profile.drain_length(2), 36);
    }

    #[test]
    fn test_empty_delays_rejected() {
        assert_eq!(
            ConcurrencyProfile::from_delays(&[]).unwrap_err(),
            TdmcError::EmptyDelayList
        );
    }

    #[test]
    fn test_zero_delay_rejected() {
        assert_eq!(
            ConcurrencyProfile::from_delays(&[1, 0, 3]).unwrap_err(),
            TdmcError::ZeroLengthDelay { loop_index: 1 }
        );
    }
}
