//! Loop fill/drain padding for TDMC
//!
//! Every user sequence of length `M` is extended to the common compiled
//! length `L = M + sum(delays)`:
//!
//! - rotations of loop `i` are prefixed with `offset_i` idle entries so the
//!   first live pulse's gate coincides with its physical arrival, then
//!   drain-padded with `sum(delays[i..])` idle entries;
//! - beamsplitters of loop `i` get the same alignment, then their first
//!   `delay_i` entries are forced to full transmission (loop fill) and the
//!   trailing `sum(delays[i..])` entries hold full transmission (loop
//!   drain);
//! - the squeezer is drain-padded with `sum(delays)` vacuum entries.
//!
//! Forcing the fill window overwrites any user values that fall inside it:
//! during loading the loop holds no live pulse, so those bins cannot carry
//! an interference setting.

use tdmc_core::control::{FULL_TRANSMISSION, IDLE_PHASE, VACUUM_SQUEEZING};
use tdmc_core::{ConcurrencyProfile, GateSequence};

/// Pad a rotation sequence of loop `loop_index` to the compiled length
pub fn pad_rotation(
    user: &GateSequence,
    profile: &ConcurrencyProfile,
    loop_index: usize,
) -> GateSequence {
    user.prefix_pad(profile.offset(loop_index), IDLE_PHASE)
        .suffix_pad(profile.drain_length(loop_index), IDLE_PHASE)
}

/// Pad a beamsplitter sequence of loop `loop_index` to the compiled length
pub fn pad_beamsplitter(
    user: &GateSequence,
    profile: &ConcurrencyProfile,
    loop_index: usize,
) -> GateSequence {
    user.prefix_pad(profile.offset(loop_index), FULL_TRANSMISSION)
        .suffix_pad(profile.drain_length(loop_index), FULL_TRANSMISSION)
        .force_prefix(profile.delays()[loop_index], FULL_TRANSMISSION)
}

/// Pad the squeezing sequence to the compiled length
pub fn pad_squeezing(user: &GateSequence, profile: &ConcurrencyProfile) -> GateSequence {
    user.suffix_pad(profile.total_delay(), VACUUM_SQUEEZING)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tdmc_core::ConcurrencyProfile;

    #[test]
    fn test_single_loop_windows() {
        // delays = [3], M = 5 -> L = 8.
        // Beamsplitter: indices [0,1,2] and [5,6,7] forced to full
        // transmission; [3,4] carry user values.
        let profile = ConcurrencyProfile::from_delays(&[3]).unwrap();
        let user = GateSequence::new(vec![0.9, 0.8, 0.7, 0.6, 0.5]);

        let bs = pad_beamsplitter(&user, &profile, 0);
        assert_eq!(bs.len(), 8);
        assert_eq!(&bs.values()[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&bs.values()[5..], &[0.0, 0.0, 0.0]);
        assert_eq!(&bs.values()[3..5], &[0.6, 0.5]);
    }

    #[test]
    fn test_rotation_alignment() {
        // delays [1, 6, 36]: rotations of loop i start after offset_i idle
        // entries and every padded sequence has length M + 43.
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        let user = GateSequence::constant(0.25, 216);

        for (i, offset) in [(0usize, 0usize), (1, 1), (2, 7)] {
            let rot = pad_rotation(&user, &profile, i);
            assert_eq!(rot.len(), 259);
            assert!(rot.values()[..offset].iter().all(|&v| v == 0.0));
            assert_eq!(rot.get(offset), Some(0.25));
        }
    }

    #[test]
    fn test_beamsplitter_fill_and_drain_lengths() {
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        let user = GateSequence::constant(0.5, 216);

        for i in 0..3 {
            let bs = pad_beamsplitter(&user, &profile, i);
            assert_eq!(bs.len(), 259);

            let fill = profile.delays()[i];
            let drain = profile.drain_length(i);
            assert!(bs.values()[..fill].iter().all(|&v| v == 0.0));
            assert!(bs.values()[259 - drain..].iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_fill_overwrites_leading_user_values() {
        // Loop 1 of [1, 6, 36]: offset 1, fill 6 -> the first 5 user
        // values fall inside the fill window and are overwritten.
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        let user = GateSequence::constant(0.5, 216);

        let bs = pad_beamsplitter(&user, &profile, 1);
        assert!(bs.values()[..6].iter().all(|&v| v == 0.0));
        assert_eq!(bs.get(6), Some(0.5));
    }

    #[test]
    fn test_squeezing_drain() {
        let profile = ConcurrencyProfile::from_delays(&[1, 6, 36]).unwrap();
        let user = GateSequence::constant(1.0, 216);

        let sq = pad_squeezing(&user, &profile);
        assert_eq!(sq.len(), 259);
        assert_eq!(sq.get(215), Some(1.0));
        assert!(sq.values()[216..].iter().all(|&v| v == 0.0));
    }
}
