use crate::ranking::{RankEntry, WinTally, build_ranking};
use crate::round_size::{pick_random_items, resolve_round_size};
use crate::shuffle::{SeededShuffle, Shuffler};
use crate::{Contestant, ContestantId};
use log::debug;

// ---------------------------------------------------------------------------
// Round state — the pure reducer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run started yet.
    Idle,
    /// `current_match()` is the pair waiting for a pick.
    AwaitingMatch,
    /// Champion decided; only a new run can follow.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Working state of one elimination round.
///
/// `current_round` is always even-length; match `i` is
/// `current_round[2i]` vs `current_round[2i + 1]`. `carry` collects the bye
/// (if the round started odd) and each match winner, and becomes the next
/// round's pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    pub round_number: u32,
    /// Pool size this round started with, bye included.
    pub round_size: usize,
    pub current_round: Vec<Contestant>,
    pub carry: Vec<Contestant>,
    pub match_index: usize,
    pub champion: Option<Contestant>,
}

/// The pair currently presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub round_number: u32,
    pub round_size: usize,
    /// Zero-based index within the round.
    pub index: usize,
    pub total: usize,
    pub left: &'a Contestant,
    pub right: &'a Contestant,
}

impl Match<'_> {
    pub fn contestant(&self, side: Side) -> &Contestant {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn contains(&self, id: ContestantId) -> bool {
        self.left.id == id || self.right.id == id
    }
}

impl RoundState {
    pub fn new(pool: Vec<Contestant>, round_number: u32) -> Self {
        let mut state = Self::default();
        state.start_round(pool, round_number);
        state
    }

    /// Begin a round from `pool`. An odd pool sends its last contestant
    /// straight to `carry` as a bye. An empty pool leaves the state untouched.
    pub fn start_round(&mut self, pool: Vec<Contestant>, round_number: u32) {
        if pool.is_empty() {
            return;
        }

        let mut working = pool;
        self.round_number = round_number;
        self.round_size = working.len();
        self.match_index = 0;
        self.champion = None;
        self.carry.clear();

        if working.len() % 2 == 1
            && let Some(bye) = working.pop()
        {
            debug!("round {round_number}: bye for contestant {}", bye.id);
            self.carry.push(bye);
        }

        // A lone contestant has nobody left to beat.
        if working.is_empty() {
            self.champion = self.carry.pop();
        }
        self.current_round = working;
    }

    pub fn phase(&self) -> Phase {
        if self.champion.is_some() {
            Phase::Terminal
        } else if self.current_round.is_empty() {
            Phase::Idle
        } else {
            Phase::AwaitingMatch
        }
    }

    pub fn total_matches(&self) -> usize {
        self.current_round.len() / 2
    }

    pub fn current_match(&self) -> Option<Match<'_>> {
        if self.champion.is_some() {
            return None;
        }
        let left = self.current_round.get(self.match_index * 2)?;
        let right = self.current_round.get(self.match_index * 2 + 1)?;
        Some(Match {
            round_number: self.round_number,
            round_size: self.round_size,
            index: self.match_index,
            total: self.total_matches(),
            left,
            right,
        })
    }

    /// Record `winner` for the current match and move to the next match,
    /// the next round, or the terminal state.
    ///
    /// # Panics
    ///
    /// If a champion is already set or `winner` is not in the current pair.
    pub fn select_winner(&mut self, winner: &Contestant, tally: &mut WinTally) {
        let Some(current) = self.current_match() else {
            panic!("select_winner called with no match pending");
        };
        assert!(
            current.contains(winner.id),
            "contestant {} is not playing match {} of round {}",
            winner.id,
            current.index,
            current.round_number
        );

        tally.record_win(winner.id);
        self.carry.push(winner.clone());

        if self.match_index + 1 < self.total_matches() {
            self.match_index += 1;
            return;
        }

        if self.carry.len() == 1 {
            self.champion = self.carry.pop();
            self.current_round.clear();
            self.match_index = 0;
            return;
        }

        let next = std::mem::take(&mut self.carry);
        let next_round = self.round_number + 1;
        debug!("round {} complete, {} advance", self.round_number, next.len());
        self.start_round(next, next_round);
    }
}

// ---------------------------------------------------------------------------
// Engine — one tournament run
// ---------------------------------------------------------------------------

/// What a single pick did, for the host's analytics sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRecord {
    /// Zero-based position of this pick within the run.
    pub step_index: usize,
    pub round_number: u32,
    pub left: ContestantId,
    pub right: ContestantId,
    pub winner: ContestantId,
    /// True when this pick decided the champion.
    pub finished: bool,
}

/// Owns one run: the entrants, the round state, the win tally and the
/// shuffle used to order the first round.
#[derive(Debug, Clone)]
pub struct BracketEngine<S: Shuffler = SeededShuffle> {
    shuffler: S,
    entrants: Vec<Contestant>,
    state: RoundState,
    tally: WinTally,
    picks: usize,
}

impl Default for BracketEngine<SeededShuffle> {
    fn default() -> Self {
        Self::new(SeededShuffle::default())
    }
}

impl<S: Shuffler> BracketEngine<S> {
    pub fn new(shuffler: S) -> Self {
        Self {
            shuffler,
            entrants: Vec::new(),
            state: RoundState::default(),
            tally: WinTally::default(),
            picks: 0,
        }
    }

    /// Shuffle `contestants`, clear the tally and open round 1.
    ///
    /// # Panics
    ///
    /// With fewer than two contestants; callers gate the start on that.
    pub fn start_run(&mut self, contestants: Vec<Contestant>) -> &RoundState {
        assert!(
            contestants.len() >= 2,
            "a run needs at least 2 contestants, got {}",
            contestants.len()
        );

        let mut order = contestants.clone();
        self.shuffler.shuffle(&mut order);
        self.entrants = contestants;
        self.tally.clear();
        self.picks = 0;
        self.state = RoundState::new(order, 1);
        debug!("run started with {} contestants", self.entrants.len());
        &self.state
    }

    /// Draw a random subset matching the resolved round size, then start.
    pub fn start_run_with_size(
        &mut self,
        items: &[Contestant],
        preferred: Option<usize>,
    ) -> &RoundState {
        let size = resolve_round_size(preferred, items.len());
        let chosen = pick_random_items(items, size, &mut self.shuffler);
        self.start_run(chosen)
    }

    /// Play again with the same entrants, freshly shuffled.
    pub fn restart(&mut self) -> &RoundState {
        let entrants = self.entrants.clone();
        self.start_run(entrants)
    }

    /// # Panics
    ///
    /// If the run is over or `winner` is not in the current pair.
    pub fn select_winner(&mut self, winner: ContestantId) -> PickRecord {
        let Some(current) = self.state.current_match() else {
            panic!("no match pending, the run is {:?}", self.state.phase());
        };
        let (left, right, round_number) = (current.left.id, current.right.id, current.round_number);
        let winner = if current.left.id == winner {
            current.left.clone()
        } else if current.right.id == winner {
            current.right.clone()
        } else {
            panic!("contestant {winner} is not playing {left} vs {right}");
        };

        self.state.select_winner(&winner, &mut self.tally);
        let record = PickRecord {
            step_index: self.picks,
            round_number,
            left,
            right,
            winner: winner.id,
            finished: self.state.champion.is_some(),
        };
        self.picks += 1;
        record
    }

    pub fn pick(&mut self, side: Side) -> PickRecord {
        let Some(winner) = self.state.current_match().map(|m| m.contestant(side).id) else {
            panic!("no match pending, the run is {:?}", self.state.phase());
        };
        self.select_winner(winner)
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_match(&self) -> Option<Match<'_>> {
        self.state.current_match()
    }

    pub fn champion(&self) -> Option<&Contestant> {
        self.state.champion.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.champion.is_some()
    }

    pub fn entrants(&self) -> &[Contestant] {
        &self.entrants
    }

    pub fn tally(&self) -> &WinTally {
        &self.tally
    }

    /// (picks made, picks a full run takes).
    pub fn progress(&self) -> (usize, usize) {
        (self.picks, self.entrants.len().saturating_sub(1))
    }

    pub fn ranking(&self) -> Vec<RankEntry> {
        build_ranking(&self.entrants, &self.tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::NoShuffle;

    fn pool(names: &[&str]) -> Vec<Contestant> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Contestant::new(i as i64 + 1, *n, format!("{n}.png"), i as i32))
            .collect()
    }

    fn names(list: &[Contestant]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn start_round_moves_last_of_odd_pool_to_carry() {
        let state = RoundState::new(pool(&["A", "B", "C"]), 1);
        assert_eq!(names(&state.current_round), vec!["A", "B"]);
        assert_eq!(names(&state.carry), vec!["C"]);
        assert_eq!(state.round_size, 3);
        assert_eq!(state.phase(), Phase::AwaitingMatch);
    }

    #[test]
    fn start_round_with_empty_pool_is_a_no_op() {
        let mut state = RoundState::new(pool(&["A", "B"]), 1);
        let before = state.clone();
        state.start_round(Vec::new(), 2);
        assert_eq!(state, before);
    }

    #[test]
    fn single_contestant_pool_is_immediately_terminal() {
        let state = RoundState::new(pool(&["A"]), 3);
        assert_eq!(state.phase(), Phase::Terminal);
        assert_eq!(state.champion.as_ref().map(|c| c.name.as_str()), Some("A"));
        assert!(state.carry.is_empty());
        assert!(state.current_round.is_empty());
    }

    #[test]
    fn select_winner_advances_match_then_round() {
        let mut tally = WinTally::new();
        let mut state = RoundState::new(pool(&["A", "B", "C", "D"]), 1);
        let a = state.current_round[0].clone();
        let c = state.current_round[2].clone();

        state.select_winner(&a, &mut tally);
        assert_eq!(state.match_index, 1);
        assert_eq!(state.round_number, 1);

        state.select_winner(&c, &mut tally);
        assert_eq!(state.round_number, 2);
        assert_eq!(state.match_index, 0);
        assert_eq!(names(&state.current_round), vec!["A", "C"]);
        assert!(state.carry.is_empty());

        state.select_winner(&c, &mut tally);
        assert_eq!(state.phase(), Phase::Terminal);
        assert_eq!(state.champion.as_ref().map(|c| c.name.as_str()), Some("C"));
        assert!(state.current_match().is_none());
    }

    #[test]
    fn bye_plays_first_in_the_next_round() {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(pool(&["A", "B", "C"]));
        engine.pick(Side::Left);

        let next = engine.current_match().unwrap();
        assert_eq!(next.round_number, 2);
        assert_eq!((next.left.name.as_str(), next.right.name.as_str()), ("C", "A"));
    }

    #[test]
    #[should_panic(expected = "not playing")]
    fn selecting_a_spectator_panics() {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(pool(&["A", "B", "C", "D"]));
        engine.select_winner(ContestantId(4));
    }

    #[test]
    #[should_panic(expected = "at least 2")]
    fn start_run_rejects_a_single_contestant() {
        BracketEngine::new(NoShuffle).start_run(pool(&["A"]));
    }

    #[test]
    #[should_panic(expected = "no match pending")]
    fn no_picks_after_the_champion() {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(pool(&["A", "B"]));
        engine.pick(Side::Right);
        engine.pick(Side::Left);
    }

    #[test]
    fn pick_records_carry_step_and_finish() {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(pool(&["A", "B", "C", "D"]));

        let first = engine.pick(Side::Right);
        assert_eq!(first.step_index, 0);
        assert_eq!(
            (first.left, first.right, first.winner),
            (ContestantId(1), ContestantId(2), ContestantId(2))
        );
        assert!(!first.finished);

        engine.pick(Side::Left);
        let last = engine.pick(Side::Left);
        assert_eq!(last.step_index, 2);
        assert_eq!(last.round_number, 2);
        assert!(last.finished);
        assert_eq!(engine.progress(), (3, 3));
    }

    #[test]
    fn restart_resets_tally_and_keeps_entrants() {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(pool(&["A", "B", "C", "D"]));
        engine.pick(Side::Left);
        engine.pick(Side::Left);
        engine.pick(Side::Left);
        assert!(engine.is_finished());

        engine.restart();
        assert_eq!(engine.phase(), Phase::AwaitingMatch);
        assert_eq!(engine.tally().total(), 0);
        assert_eq!(engine.progress(), (0, 3));
        assert_eq!(engine.entrants().len(), 4);
    }

    #[test]
    fn start_run_with_size_draws_requested_bracket() {
        let items: Vec<Contestant> = (1..=20)
            .map(|i| Contestant::new(i, format!("c{i}"), "", i as i32))
            .collect();
        let mut engine = BracketEngine::new(SeededShuffle::from_seed(11));
        let state = engine.start_run_with_size(&items, Some(8));
        assert_eq!(state.round_size, 8);
        assert_eq!(state.total_matches(), 4);
        assert_eq!(engine.entrants().len(), 8);
    }
}
