use crate::Contestant;
use crate::shuffle::Shuffler;

pub const MIN_ROUND_SIZE: usize = 2;
pub const MAX_ROUND_SIZE: usize = 64;

/// Largest power of two that fits in `count`, clamped to 2..=64.
pub fn max_round_size(count: usize) -> usize {
    floor_pow2(count).clamp(MIN_ROUND_SIZE, MAX_ROUND_SIZE)
}

/// Round size to play given the player's (or author's) preference.
///
/// Returns 0 for an empty pool. Without a preference the largest playable
/// size wins; with one, it is capped and rounded down to a power of two.
pub fn resolve_round_size(preferred: Option<usize>, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let max = max_round_size(count);
    match preferred {
        None | Some(0) => max,
        Some(size) => floor_pow2(size.min(max)).max(MIN_ROUND_SIZE),
    }
}

/// Selectable sizes for a pool, largest first.
pub fn round_options(count: usize) -> Vec<usize> {
    let mut options = Vec::new();
    let mut size = MIN_ROUND_SIZE;
    while size <= count && size <= MAX_ROUND_SIZE {
        options.push(size);
        size *= 2;
    }
    options.reverse();
    options
}

/// Random `count`-sized subset of `items`. Returns everything, in order, when
/// `count` is 0 or the pool is not larger than `count`.
pub fn pick_random_items<S: Shuffler + ?Sized>(
    items: &[Contestant],
    count: usize,
    shuffler: &mut S,
) -> Vec<Contestant> {
    if count == 0 || items.len() <= count {
        return items.to_vec();
    }
    let mut pool = items.to_vec();
    shuffler.shuffle(&mut pool);
    pool.truncate(count);
    pool
}

fn floor_pow2(n: usize) -> usize {
    if n == 0 { 1 } else { 1 << n.ilog2() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::{NoShuffle, SeededShuffle};

    #[test]
    fn max_round_size_clamps_to_bounds() {
        assert_eq!(max_round_size(0), 2);
        assert_eq!(max_round_size(1), 2);
        assert_eq!(max_round_size(3), 2);
        assert_eq!(max_round_size(8), 8);
        assert_eq!(max_round_size(31), 16);
        assert_eq!(max_round_size(500), 64);
    }

    #[test]
    fn resolve_round_size_respects_preference() {
        assert_eq!(resolve_round_size(None, 0), 0);
        assert_eq!(resolve_round_size(None, 20), 16);
        assert_eq!(resolve_round_size(Some(8), 20), 8);
        assert_eq!(resolve_round_size(Some(12), 20), 8);
        assert_eq!(resolve_round_size(Some(32), 20), 16);
        assert_eq!(resolve_round_size(Some(1), 20), 2);
    }

    #[test]
    fn round_options_are_descending_powers_of_two() {
        assert_eq!(round_options(20), vec![16, 8, 4, 2]);
        assert_eq!(round_options(2), vec![2]);
        assert!(round_options(1).is_empty());
        assert_eq!(round_options(1000)[0], 64);
    }

    #[test]
    fn pick_random_items_keeps_small_pools_intact() {
        let items: Vec<Contestant> =
            (1..=4).map(|i| Contestant::new(i, "", "", i as i32)).collect();
        assert_eq!(pick_random_items(&items, 8, &mut NoShuffle), items);
        assert_eq!(pick_random_items(&items, 0, &mut NoShuffle), items);
    }

    #[test]
    fn pick_random_items_draws_distinct_subset() {
        let items: Vec<Contestant> =
            (1..=20).map(|i| Contestant::new(i, "", "", i as i32)).collect();
        let picked = pick_random_items(&items, 8, &mut SeededShuffle::from_seed(3));
        assert_eq!(picked.len(), 8);
        let mut ids: Vec<i64> = picked.iter().map(|c| c.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
