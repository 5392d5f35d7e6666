//! Score-driven difficulty scaling

use super::effects::BackgroundTier;
use crate::tuning::Tuning;

/// Number of spikes to arm on the approached wall for a given score.
///
/// One extra spike every `points_per_spike` points, from `min_spikes` up to
/// `max_spikes`.
pub fn spike_count_for_score(score: u32, tuning: &Tuning) -> u32 {
    let increment = score / tuning.points_per_spike.max(1);
    tuning
        .max_spikes
        .min(tuning.min_spikes.saturating_add(increment))
}

/// Background tier for a given score
pub fn background_tier_for_score(score: u32, tuning: &Tuning) -> BackgroundTier {
    if score < tuning.tier_one_score {
        BackgroundTier::Calm
    } else if score < tuning.tier_two_score {
        BackgroundTier::Tense
    } else {
        BackgroundTier::Frantic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spike_count_buckets() {
        let tuning = Tuning::default();
        for score in 0..5 {
            assert_eq!(spike_count_for_score(score, &tuning), 2);
        }
        for score in 5..10 {
            assert_eq!(spike_count_for_score(score, &tuning), 3);
        }
        assert_eq!(spike_count_for_score(24, &tuning), 6);
        assert_eq!(spike_count_for_score(25, &tuning), 7);
        assert_eq!(spike_count_for_score(1000, &tuning), 7);
        assert_eq!(spike_count_for_score(u32::MAX, &tuning), 7);
    }

    #[test]
    fn test_background_tiers() {
        let tuning = Tuning::default();
        assert_eq!(background_tier_for_score(0, &tuning), BackgroundTier::Calm);
        assert_eq!(background_tier_for_score(4, &tuning), BackgroundTier::Calm);
        assert_eq!(background_tier_for_score(5, &tuning), BackgroundTier::Tense);
        assert_eq!(background_tier_for_score(9, &tuning), BackgroundTier::Tense);
        assert_eq!(background_tier_for_score(10, &tuning), BackgroundTier::Frantic);
    }

    proptest! {
        #[test]
        fn spike_count_is_bounded_and_monotonic(score in 0u32..100_000) {
            let tuning = Tuning::default();
            let here = spike_count_for_score(score, &tuning);
            let next = spike_count_for_score(score + 1, &tuning);
            prop_assert!((2..=7).contains(&here));
            prop_assert!(next >= here);
        }

        #[test]
        fn spike_count_stable_within_bucket(bucket in 0u32..1000, offset in 0u32..5) {
            let tuning = Tuning::default();
            prop_assert_eq!(
                spike_count_for_score(bucket * 5, &tuning),
                spike_count_for_score(bucket * 5 + offset, &tuning)
            );
        }

        #[test]
        fn background_tier_never_regresses(score in 0u32..10_000) {
            let tuning = Tuning::default();
            prop_assert!(
                background_tier_for_score(score + 1, &tuning)
                    >= background_tier_for_score(score, &tuning)
            );
        }
    }
}
