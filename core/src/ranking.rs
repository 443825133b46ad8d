use crate::{Contestant, ContestantId};
use std::collections::HashMap;

/// Head-to-head wins per contestant for one run. Only feeds the standings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinTally {
    wins: HashMap<ContestantId, u32>,
}

impl WinTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_win(&mut self, id: ContestantId) -> u32 {
        let count = self.wins.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    pub fn wins(&self, id: ContestantId) -> u32 {
        self.wins.get(&id).copied().unwrap_or(0)
    }

    /// Number of matches played so far.
    pub fn total(&self) -> u32 {
        self.wins.values().sum()
    }

    pub fn clear(&mut self) {
        self.wins.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub contestant: Contestant,
    pub wins: u32,
}

/// Full standings for every contestant in `pool`, winners or not.
///
/// Ordered by wins (descending), then `sort_order` (ascending). The sort is
/// stable, so identical inputs always give identical output.
pub fn build_ranking(pool: &[Contestant], tally: &WinTally) -> Vec<RankEntry> {
    let mut rows: Vec<RankEntry> = pool
        .iter()
        .map(|c| RankEntry {
            contestant: c.clone(),
            wins: tally.wins(c.id),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| a.contestant.sort_order.cmp(&b.contestant.sort_order))
    });
    rows
}
