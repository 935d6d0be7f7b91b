use std::collections::BTreeSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use megasena_db::models::{NUM_MAX, NUM_MIN};

use crate::config::FocusMode;

/// How many numbers each ranked pool contributes to a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub frequent: usize,
    pub stale: usize,
}

/// ceil(0.8 * n) without going through floats.
fn ceil_80_percent(n: usize) -> usize {
    (8 * n + 9) / 10
}

fn ceil_half(n: usize) -> usize {
    (n + 1) / 2
}

impl FocusMode {
    pub fn quota(self, count: usize) -> Quota {
        match self {
            FocusMode::Frequent => {
                let frequent = ceil_80_percent(count);
                Quota { frequent, stale: count - frequent }
            }
            FocusMode::Stale => {
                let stale = ceil_80_percent(count);
                Quota { frequent: count - stale, stale }
            }
            FocusMode::Balanced => {
                let frequent = ceil_half(count);
                Quota { frequent, stale: count - frequent }
            }
        }
    }
}

/// The two ranked candidate pools a selection draws from.
#[derive(Debug, Clone)]
pub struct RankedPools {
    pub top_frequent: Vec<u8>,
    pub top_stale: Vec<u8>,
}

/// `amount` distinct numbers from `pool`, or the whole pool when it is smaller.
fn sample_up_to<R: Rng + ?Sized>(pool: &[u8], amount: usize, rng: &mut R) -> Vec<u8> {
    if pool.len() < amount {
        return pool.to_vec();
    }
    pool.choose_multiple(rng, amount).copied().collect()
}

/// Draws one candidate of `count` numbers according to the focus quota.
///
/// The frequent and stale samples are taken independently, so a number ranked
/// in both pools may be picked twice and collapse into one slot. Missing slots
/// are filled uniformly from the rest of 1..=60. The result can be shorter than
/// `count` only if the whole range is exhausted; the validator rejects it then.
/// Order is random: sort before validating.
pub fn select<R: Rng + ?Sized>(
    count: usize,
    focus: FocusMode,
    pools: &RankedPools,
    rng: &mut R,
) -> Vec<u8> {
    let quota = focus.quota(count);

    let mut chosen: BTreeSet<u8> = sample_up_to(&pools.top_frequent, quota.frequent, rng)
        .into_iter()
        .collect();
    chosen.extend(sample_up_to(&pools.top_stale, quota.stale, rng));

    while chosen.len() < count {
        let rest: Vec<u8> = (NUM_MIN..=NUM_MAX).filter(|n| !chosen.contains(n)).collect();
        match rest.choose(rng) {
            Some(&n) => {
                chosen.insert(n);
            }
            None => break,
        }
    }

    let mut combo: Vec<u8> = chosen.into_iter().collect();
    if combo.len() > count {
        combo = combo.choose_multiple(rng, count).copied().collect();
    }
    combo.shuffle(rng);
    combo
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pools(frequent: std::ops::RangeInclusive<u8>, stale: std::ops::RangeInclusive<u8>) -> RankedPools {
        RankedPools {
            top_frequent: frequent.collect(),
            top_stale: stale.collect(),
        }
    }

    #[test]
    fn test_quota_frequent_rounds_up() {
        assert_eq!(FocusMode::Frequent.quota(11), Quota { frequent: 9, stale: 2 });
        assert_eq!(FocusMode::Frequent.quota(6), Quota { frequent: 5, stale: 1 });
        assert_eq!(FocusMode::Frequent.quota(10), Quota { frequent: 8, stale: 2 });
        assert_eq!(FocusMode::Frequent.quota(15), Quota { frequent: 12, stale: 3 });
    }

    #[test]
    fn test_quota_stale_rounds_up_stale_side() {
        assert_eq!(FocusMode::Stale.quota(11), Quota { frequent: 2, stale: 9 });
        assert_eq!(FocusMode::Stale.quota(7), Quota { frequent: 1, stale: 6 });
    }

    #[test]
    fn test_quota_balanced() {
        assert_eq!(FocusMode::Balanced.quota(10), Quota { frequent: 5, stale: 5 });
        assert_eq!(FocusMode::Balanced.quota(7), Quota { frequent: 4, stale: 3 });
    }

    #[test]
    fn test_quota_sums_to_count() {
        for focus in [FocusMode::Frequent, FocusMode::Stale, FocusMode::Balanced] {
            for n in 6..=15 {
                let q = focus.quota(n);
                assert_eq!(q.frequent + q.stale, n, "{focus} n={n}");
            }
        }
    }

    #[test]
    fn test_disjoint_pools_respect_quota() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = pools(1..=30, 31..=60);
        for _ in 0..50 {
            let combo = select(11, FocusMode::Frequent, &p, &mut rng);
            assert_eq!(combo.len(), 11);
            assert_eq!(combo.iter().filter(|&&n| n <= 30).count(), 9);
            assert_eq!(combo.iter().filter(|&&n| n > 30).count(), 2);
        }
    }

    #[test]
    fn test_overlapping_pools_fill_to_count() {
        let mut rng = StdRng::seed_from_u64(2);
        // identical pools: collisions are frequent
        let p = pools(1..=8, 1..=8);
        for _ in 0..50 {
            let mut combo = select(8, FocusMode::Balanced, &p, &mut rng);
            assert_eq!(combo.len(), 8);
            combo.sort_unstable();
            combo.dedup();
            assert_eq!(combo.len(), 8);
        }
    }

    #[test]
    fn test_small_pool_taken_whole() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = pools(1..=3, 50..=52);
        let combo = select(10, FocusMode::Frequent, &p, &mut rng);
        assert_eq!(combo.len(), 10);
        for n in 1..=3 {
            assert!(combo.contains(&n), "missing {n} from small frequent pool");
        }
    }

    #[test]
    fn test_empty_pools_fill_from_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let p = RankedPools { top_frequent: vec![], top_stale: vec![] };
        let combo = select(15, FocusMode::Stale, &p, &mut rng);
        assert_eq!(combo.len(), 15);
        assert!(combo.iter().all(|&n| (1..=60).contains(&n)));
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let p = pools(1..=30, 31..=60);
        let a = select(6, FocusMode::Balanced, &p, &mut StdRng::seed_from_u64(99));
        let b = select(6, FocusMode::Balanced, &p, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
