use crate::app::Screen;
use std::collections::HashMap;
use std::path::PathBuf;
use worldcup_core::result::WorldcupResult;
use worldcup_core::round_size::{resolve_round_size, round_options};
use worldcup_core::{BracketEngine, Contestant, ContestantId, GameDetail, SeededShuffle};

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter, drives color cycling and the sparkle offset.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count;
    }
}

// ---------------------------------------------------------------------------
// Round size picker
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RoundPickerState {
    /// Offered sizes, largest first.
    pub options: Vec<usize>,
    pub selected: usize,
}

impl RoundPickerState {
    /// Offer every size `count` contestants allow, preselecting `preferred`.
    pub fn load(&mut self, count: usize, preferred: Option<usize>) {
        self.options = round_options(count);
        let wanted = resolve_round_size(preferred, count);
        self.selected = self.options.iter().position(|&n| n == wanted).unwrap_or(0);
    }

    pub fn select_down(&mut self) {
        let max = self.options.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_size(&self) -> Option<usize> {
        self.options.get(self.selected).copied()
    }
}

// ---------------------------------------------------------------------------
// Arena (running bracket) state
// ---------------------------------------------------------------------------

/// The pair that was just decided, kept on screen while the pick animates.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHighlight {
    pub left: Contestant,
    pub right: Contestant,
    pub winner: ContestantId,
    pub round_number: u32,
    pub round_size: usize,
    pub match_index: usize,
    pub total: usize,
    pub remaining_ticks: u32,
}

impl PickHighlight {
    /// Count one animation tick down. True once the highlight has expired.
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}

#[derive(Debug)]
pub struct ArenaState {
    pub engine: BracketEngine<SeededShuffle>,
    /// Bumped on every start or replay; session replies carry the run they
    /// were requested for.
    pub run_id: u64,
    pub highlight: Option<PickHighlight>,
    /// Round size the player chose for this run.
    pub selected_round: Option<usize>,
    /// `choice_id` that picks and the result are logged against.
    pub session_id: Option<i64>,
    pub result_reported: bool,
}

impl ArenaState {
    pub fn new(seed: Option<u64>) -> Self {
        let shuffler = match seed {
            Some(seed) => SeededShuffle::from_seed(seed),
            None => SeededShuffle::from_entropy(),
        };
        Self {
            engine: BracketEngine::new(shuffler),
            run_id: 0,
            highlight: None,
            selected_round: None,
            session_id: None,
            result_reported: false,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.highlight.is_some()
    }
}

// ---------------------------------------------------------------------------
// Result screen state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ResultState {
    pub result: Option<WorldcupResult>,
    pub scroll_offset: u16,
    pub saved_to: Option<PathBuf>,
    pub saved_at: Option<String>,
}

impl ResultState {
    pub fn show(&mut self, result: WorldcupResult) {
        self.result = Some(result);
        self.scroll_offset = 0;
        self.saved_to = None;
        self.saved_at = None;
    }

    pub fn scroll_down(&mut self) {
        let max = self
            .result
            .as_ref()
            .map(|r| r.ranking.len().saturating_sub(1))
            .unwrap_or(0) as u16;
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Per-process session cache
// ---------------------------------------------------------------------------

pub fn game_session_key(game_id: i64) -> String {
    format!("game_session_{game_id}")
}

pub fn result_key(game_id: i64) -> String {
    format!("worldcup-result-{game_id}")
}

/// Session ids and last results, keyed per game. Lives as long as the process.
#[derive(Debug, Default)]
pub struct SessionCache {
    sessions: HashMap<String, i64>,
    results: HashMap<String, WorldcupResult>,
}

impl SessionCache {
    pub fn session(&self, game_id: i64) -> Option<i64> {
        self.sessions.get(&game_session_key(game_id)).copied()
    }

    pub fn store_session(&mut self, game_id: i64, session_id: i64) {
        self.sessions.insert(game_session_key(game_id), session_id);
    }

    pub fn result(&self, game_id: i64) -> Option<&WorldcupResult> {
        self.results.get(&result_key(game_id))
    }

    pub fn store_result(&mut self, result: WorldcupResult) {
        self.results.insert(result_key(result.game_id), result);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub previous_screen: Screen,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub game: Option<GameDetail>,
    pub picker: RoundPickerState,
    pub arena: ArenaState,
    pub result: ResultState,
    pub session: SessionCache,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            screen: Screen::Intro,
            previous_screen: Screen::Intro,
            show_logs: false,
            last_error: None,
            game: None,
            picker: RoundPickerState::default(),
            arena: ArenaState::new(seed),
            result: ResultState::default(),
            session: SessionCache::default(),
            animation: AnimationState::default(),
        }
    }
}
