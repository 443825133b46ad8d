use crate::components::banner::FRAME_COUNT;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, PickHighlight};
use crate::state::messages::NetworkRequest;
use chrono::Local;
use log::{debug, info};
use std::path::PathBuf;
use worldcup_core::client::{GameResultRequest, PickLog};
use worldcup_core::result::WorldcupResult;
use worldcup_core::round_size::resolve_round_size;
use worldcup_core::{GameDetail, Side};

/// Animation tick period; also the resolution of the pick transition.
pub const TICK_MS: u64 = 80;

pub const SESSION_SOURCE: &str = "worldcup_arena";
pub const REPLAY_SESSION_SOURCE: &str = "worldcup_replay";

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Screen {
    #[default]
    Intro,
    RoundSelect,
    Arena,
    Champion,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(settings.seed),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_game_loaded(&mut self, detail: GameDetail) {
        self.state.last_error = None;
        if !detail.is_playable() {
            self.state.last_error = Some(format!(
                "{} ({}, {} contestants) cannot be played as a worldcup",
                detail.game.title,
                detail.game.kind.label(),
                detail.items.len()
            ));
        }
        let preferred = self.settings.round.or(detail.game.worldcup_round_size);
        self.state.picker.load(detail.items.len(), preferred);
        info!("loaded {} with {} contestants", detail.game.title, detail.items.len());
        self.state.game = Some(detail);
    }

    /// Attach the session to the run that asked for it. Reports the result if
    /// the run finished before the session arrived.
    pub fn on_session_started(
        &mut self,
        game_id: i64,
        run_id: u64,
        session_id: Option<i64>,
    ) -> Vec<NetworkRequest> {
        if self.game_id() != Some(game_id) {
            return Vec::new();
        }
        if run_id != self.state.arena.run_id {
            debug!("session for run {run_id} arrived after run {}", self.state.arena.run_id);
            return Vec::new();
        }
        let Some(session_id) = session_id else {
            return Vec::new();
        };
        self.state.session.store_session(game_id, session_id);
        self.state.arena.session_id = Some(session_id);

        if let Some(result) = self.state.result.result.as_mut()
            && result.game_id == game_id
            && result.choice_id.is_none()
        {
            result.choice_id = Some(session_id);
            self.state.session.store_result(result.clone());
        }
        self.report_result()
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Screen management
    // -----------------------------------------------------------------------

    pub fn update_screen(&mut self, next: Screen) {
        if self.state.screen == next {
            return;
        }
        self.state.previous_screen = self.state.screen;
        self.state.screen = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.screen == Screen::Help {
            self.state.screen = self.state.previous_screen;
        }
    }

    /// Esc: one screen back. A run in progress is abandoned.
    pub fn back(&mut self) {
        match self.state.screen {
            Screen::Help => self.exit_help(),
            Screen::RoundSelect => self.update_screen(Screen::Intro),
            Screen::Arena | Screen::Champion => {
                self.state.arena.highlight = None;
                self.update_screen(Screen::RoundSelect);
            }
            Screen::Intro => {}
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    /// Leave the intro once a playable game is loaded. A round size given on
    /// the command line skips the picker.
    pub fn dismiss_intro(&mut self) -> Vec<NetworkRequest> {
        if !self.state.game.as_ref().is_some_and(GameDetail::is_playable) {
            return Vec::new();
        }
        match self.settings.round {
            Some(size) => self.start_run(Some(size)),
            None => {
                self.update_screen(Screen::RoundSelect);
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Round picker
    // -----------------------------------------------------------------------

    pub fn picker_down(&mut self) {
        self.state.picker.select_down();
    }

    pub fn picker_up(&mut self) {
        self.state.picker.select_up();
    }

    pub fn confirm_round(&mut self) -> Vec<NetworkRequest> {
        match self.state.picker.selected_size() {
            Some(size) => self.start_run(Some(size)),
            None => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Running a bracket
    // -----------------------------------------------------------------------

    /// Draw `size` contestants and open round 1. Reuses the game's cached
    /// session, or asks for a new one.
    pub fn start_run(&mut self, size: Option<usize>) -> Vec<NetworkRequest> {
        let Some(detail) = self.state.game.as_ref().filter(|d| d.is_playable()) else {
            return Vec::new();
        };
        let game_id = detail.game.id;
        let arena = &mut self.state.arena;
        arena.selected_round = Some(resolve_round_size(size, detail.items.len()));
        arena.engine.start_run_with_size(&detail.items, arena.selected_round);
        arena.run_id += 1;
        arena.highlight = None;
        arena.result_reported = false;
        self.state.result = Default::default();
        self.update_screen(Screen::Arena);

        match self.state.session.session(game_id) {
            Some(session_id) => {
                self.state.arena.session_id = Some(session_id);
                Vec::new()
            }
            None => {
                self.state.arena.session_id = None;
                let run_id = self.state.arena.run_id;
                vec![NetworkRequest::StartSession { game_id, run_id, source: SESSION_SOURCE }]
            }
        }
    }

    /// Same entrants, fresh shuffle, new session.
    pub fn restart(&mut self) -> Vec<NetworkRequest> {
        let Some(game_id) = self.game_id() else {
            return Vec::new();
        };
        if self.state.arena.engine.entrants().len() < 2 {
            return Vec::new();
        }
        let arena = &mut self.state.arena;
        arena.engine.restart();
        arena.run_id += 1;
        arena.highlight = None;
        arena.result_reported = false;
        arena.session_id = None;
        self.state.result = Default::default();
        let run_id = self.state.arena.run_id;
        self.update_screen(Screen::Arena);
        vec![NetworkRequest::StartSession { game_id, run_id, source: REPLAY_SESSION_SOURCE }]
    }

    pub fn choose_new_round(&mut self) {
        self.state.arena.highlight = None;
        self.update_screen(Screen::RoundSelect);
    }

    /// Apply a pick. Ignored while the previous pick is still on screen.
    pub fn pick(&mut self, side: Side) -> Vec<NetworkRequest> {
        if self.state.screen != Screen::Arena || self.state.arena.is_animating() {
            return Vec::new();
        }
        let Some(game_id) = self.game_id() else {
            return Vec::new();
        };
        let arena = &mut self.state.arena;
        let Some(current) = arena.engine.current_match() else {
            return Vec::new();
        };
        let ticks = transition_ticks(self.settings.transition_ms);
        let highlight = (ticks > 0).then(|| PickHighlight {
            left: current.left.clone(),
            right: current.right.clone(),
            winner: current.contestant(side).id,
            round_number: current.round_number,
            round_size: current.round_size,
            match_index: current.index,
            total: current.total,
            remaining_ticks: ticks,
        });

        let record = arena.engine.pick(side);
        arena.highlight = highlight;

        let mut requests = Vec::new();
        match arena.session_id {
            Some(choice_id) => {
                let log = PickLog::new(choice_id, game_id, &record);
                requests.push(NetworkRequest::LogPick(log));
            }
            None => debug!("pick {} not logged, no session yet", record.step_index),
        }

        if record.finished && !arena.is_animating() {
            requests.extend(self.finish_run());
        }
        requests
    }

    /// Called every animation tick. The run finishes when the last highlight
    /// expires, whichever screen is showing.
    pub fn tick(&mut self) -> Vec<NetworkRequest> {
        self.state.animation.advance(FRAME_COUNT);

        let arena = &mut self.state.arena;
        if let Some(highlight) = arena.highlight.as_mut()
            && highlight.tick()
        {
            arena.highlight = None;
            if arena.engine.is_finished() {
                return self.finish_run();
            }
        }
        Vec::new()
    }

    fn finish_run(&mut self) -> Vec<NetworkRequest> {
        let Some(detail) = self.state.game.as_ref() else {
            return Vec::new();
        };
        let arena = &self.state.arena;
        let Some(result) = WorldcupResult::from_engine(
            &detail.game,
            arena.session_id,
            arena.selected_round,
            &arena.engine,
        ) else {
            return Vec::new();
        };
        info!("{}: {}", result.title(), result.champion.name);
        self.state.session.store_result(result.clone());
        self.state.result.show(result);
        // Help returns straight to the champion.
        if self.state.screen == Screen::Help {
            self.state.previous_screen = Screen::Champion;
        } else {
            self.update_screen(Screen::Champion);
        }
        self.report_result()
    }

    fn report_result(&mut self) -> Vec<NetworkRequest> {
        if self.state.arena.result_reported {
            return Vec::new();
        }
        let result = self.state.result.result.as_ref();
        let Some(request) = result.and_then(GameResultRequest::from_result) else {
            return Vec::new();
        };
        self.state.arena.result_reported = true;
        vec![NetworkRequest::PostResult(request)]
    }

    // -----------------------------------------------------------------------
    // Result screen
    // -----------------------------------------------------------------------

    pub fn result_scroll_down(&mut self) {
        self.state.result.scroll_down();
    }

    pub fn result_scroll_up(&mut self) {
        self.state.result.scroll_up();
    }

    pub fn save_result(&mut self) -> Result<PathBuf, String> {
        let Some(result) = self.state.result.result.as_ref() else {
            return Err("no result to save".to_string());
        };
        let path = result_path(result.game_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload = serde_json::to_string_pretty(result)
            .map_err(|e| format!("serialize result failed: {e}"))?;
        std::fs::write(&path, payload).map_err(|e| format!("write result failed: {e}"))?;

        self.state.result.saved_to = Some(path.clone());
        self.state.result.saved_at = Some(Local::now().format("%H:%M").to_string());
        Ok(path)
    }

    fn game_id(&self) -> Option<i64> {
        self.state.game.as_ref().map(|d| d.game.id)
    }
}

fn transition_ticks(transition_ms: u64) -> u32 {
    transition_ms.div_ceil(TICK_MS) as u32
}

fn result_path(game_id: i64) -> PathBuf {
    let file_name = format!("result_{game_id}.json");
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("worldcup").join(file_name);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("worldcup").join(file_name);
    }
    PathBuf::from(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldcup_core::demo::local_worldcup;
    use worldcup_core::{Contestant, Phase};

    fn app(transition_ms: u64) -> App {
        let settings = AppSettings { seed: Some(7), transition_ms, ..AppSettings::default() };
        let mut app = App::new(settings);
        app.on_game_loaded(local_worldcup().unwrap());
        app
    }

    fn posts(requests: &[NetworkRequest]) -> usize {
        requests.iter().filter(|r| matches!(r, NetworkRequest::PostResult(_))).count()
    }

    #[test]
    fn intro_leads_to_round_select() {
        let mut app = app(0);
        assert_eq!(app.state.screen, Screen::Intro);
        assert!(app.dismiss_intro().is_empty());
        assert_eq!(app.state.screen, Screen::RoundSelect);
        assert_eq!(app.state.picker.options, vec![8, 4, 2]);
    }

    #[test]
    fn intro_waits_for_a_playable_game() {
        let mut app = App::new(AppSettings::default());
        assert!(app.dismiss_intro().is_empty());
        assert_eq!(app.state.screen, Screen::Intro);

        let mut detail = local_worldcup().unwrap();
        detail.items.truncate(1);
        app.on_game_loaded(detail);
        assert!(app.state.last_error.is_some());
        app.dismiss_intro();
        assert_eq!(app.state.screen, Screen::Intro);
    }

    #[test]
    fn round_flag_skips_the_picker() {
        let settings = AppSettings { round: Some(4), transition_ms: 0, ..AppSettings::default() };
        let mut app = App::new(settings);
        app.on_game_loaded(local_worldcup().unwrap());
        let requests = app.dismiss_intro();
        assert_eq!(app.state.screen, Screen::Arena);
        assert_eq!(app.state.arena.engine.entrants().len(), 4);
        assert_eq!(
            requests,
            vec![NetworkRequest::StartSession { game_id: 0, run_id: 1, source: SESSION_SOURCE }]
        );
    }

    #[test]
    fn full_run_reaches_the_champion_screen() {
        let mut app = app(0);
        app.dismiss_intro();
        app.picker_down();
        app.confirm_round();
        assert_eq!(app.state.arena.selected_round, Some(4));

        for _ in 0..3 {
            app.pick(Side::Left);
        }
        assert_eq!(app.state.screen, Screen::Champion);
        let result = app.state.result.result.as_ref().unwrap();
        assert_eq!(result.round, 4);
        assert_eq!(result.ranking.len(), 4);
        assert_eq!(result.ranking[0].wins, 2);
        assert_eq!(result.ranking[0].id, result.champion.id);
        assert!(app.state.session.result(0).is_some());
    }

    #[test]
    fn picks_are_ignored_while_the_highlight_is_showing() {
        let mut app = app(1400);
        app.dismiss_intro();
        app.confirm_round();

        app.pick(Side::Right);
        let highlight = app.state.arena.highlight.clone().unwrap();
        assert_eq!(highlight.remaining_ticks, 18);
        assert_eq!(highlight.winner, highlight.right.id);

        app.pick(Side::Left);
        assert_eq!(app.state.arena.engine.progress().0, 1);

        for _ in 0..18 {
            app.tick();
        }
        assert!(app.state.arena.highlight.is_none());
        app.pick(Side::Left);
        assert_eq!(app.state.arena.engine.progress().0, 2);
    }

    #[test]
    fn champion_screen_waits_for_the_last_highlight() {
        let mut app = app(160);
        app.dismiss_intro();
        app.state.picker.selected = 2;
        app.confirm_round();

        app.pick(Side::Left);
        assert_eq!(app.state.arena.engine.phase(), Phase::Terminal);
        assert_eq!(app.state.screen, Screen::Arena);
        app.tick();
        app.tick();
        assert_eq!(app.state.screen, Screen::Champion);
    }

    #[test]
    fn help_during_the_last_highlight_still_crowns_the_champion() {
        let mut app = app(160);
        app.dismiss_intro();
        app.state.picker.selected = 2;
        app.confirm_round();
        app.on_session_started(0, app.state.arena.run_id, Some(12));

        app.pick(Side::Left);
        app.update_screen(Screen::Help);
        app.tick();
        let requests = app.tick();
        assert_eq!(posts(&requests), 1);
        assert_eq!(app.state.screen, Screen::Help);
        assert!(app.state.result.result.is_some());

        app.back();
        assert_eq!(app.state.screen, Screen::Champion);
        assert!(app.state.session.result(0).is_some());
    }

    #[test]
    fn picks_and_result_are_reported_against_the_session() {
        let mut app = app(0);
        app.dismiss_intro();
        app.state.picker.selected = 2;
        app.confirm_round();
        let run_id = app.state.arena.run_id;
        assert!(app.on_session_started(0, run_id, Some(55)).is_empty());

        let requests = app.pick(Side::Left);
        assert!(matches!(
            &requests[0],
            NetworkRequest::LogPick(log) if log.choice_id == 55 && log.step_index == 0
        ));
        assert_eq!(posts(&requests), 1);
        assert_eq!(app.state.session.session(0), Some(55));
    }

    #[test]
    fn late_session_still_reports_the_result_once() {
        let mut app = app(0);
        app.dismiss_intro();
        app.state.picker.selected = 2;
        app.confirm_round();

        let requests = app.pick(Side::Left);
        assert_eq!(posts(&requests), 0);
        let run_id = app.state.arena.run_id;

        assert_eq!(posts(&app.on_session_started(0, run_id, Some(9))), 1);
        assert_eq!(app.state.result.result.as_ref().unwrap().choice_id, Some(9));
        assert_eq!(posts(&app.on_session_started(0, run_id, Some(9))), 0);
    }

    #[test]
    fn session_replies_from_an_abandoned_run_are_dropped() {
        let mut app = app(0);
        app.dismiss_intro();
        let first = app.confirm_round();
        app.back();
        let second = app.confirm_round();
        let (stale, live) = match (&first[..], &second[..]) {
            (
                [NetworkRequest::StartSession { run_id: stale, .. }],
                [NetworkRequest::StartSession { run_id: live, .. }],
            ) => (*stale, *live),
            _ => panic!("each start asks for a session: {first:?} {second:?}"),
        };
        assert_ne!(stale, live);

        app.on_session_started(0, live, Some(2));
        let first_pick = app.pick(Side::Left);
        assert!(app.on_session_started(0, stale, Some(1)).is_empty());
        let second_pick = app.pick(Side::Left);

        let choice_ids: Vec<i64> = first_pick
            .iter()
            .chain(&second_pick)
            .filter_map(|r| match r {
                NetworkRequest::LogPick(log) => Some(log.choice_id),
                _ => None,
            })
            .collect();
        assert_eq!(choice_ids, vec![2, 2]);
        assert_eq!(app.state.session.session(0), Some(2));
    }

    #[test]
    fn late_reply_after_replay_does_not_attach() {
        let mut app = app(0);
        app.dismiss_intro();
        app.state.picker.selected = 2;
        app.confirm_round();
        let first_run = app.state.arena.run_id;
        app.pick(Side::Left);

        app.restart();
        assert!(app.on_session_started(0, first_run, Some(4)).is_empty());
        assert_eq!(app.state.arena.session_id, None);
    }

    #[test]
    fn cached_session_is_reused_and_replay_opens_a_new_one() {
        let mut app = app(0);
        app.dismiss_intro();
        app.confirm_round();
        app.on_session_started(0, app.state.arena.run_id, Some(3));

        app.choose_new_round();
        assert!(app.confirm_round().is_empty());
        assert_eq!(app.state.arena.session_id, Some(3));

        let requests = app.restart();
        assert_eq!(
            requests,
            vec![NetworkRequest::StartSession {
                game_id: 0,
                run_id: app.state.arena.run_id,
                source: REPLAY_SESSION_SOURCE,
            }]
        );
        assert_eq!(app.state.arena.session_id, None);
        assert_eq!(app.state.arena.engine.progress(), (0, 7));
    }

    #[test]
    fn restart_keeps_the_same_entrants() {
        let mut app = app(0);
        app.dismiss_intro();
        app.picker_down();
        app.confirm_round();
        let before: Vec<Contestant> = app.state.arena.engine.entrants().to_vec();
        for _ in 0..3 {
            app.pick(Side::Right);
        }
        app.restart();
        assert_eq!(app.state.screen, Screen::Arena);
        assert_eq!(app.state.arena.engine.entrants(), before.as_slice());
        assert!(app.state.result.result.is_none());
    }

    #[test]
    fn back_and_help_navigation() {
        let mut app = app(0);
        app.dismiss_intro();
        app.update_screen(Screen::Help);
        app.back();
        assert_eq!(app.state.screen, Screen::RoundSelect);
        app.back();
        assert_eq!(app.state.screen, Screen::Intro);
    }

    #[test]
    fn transition_rounds_up_to_whole_ticks() {
        assert_eq!(transition_ticks(0), 0);
        assert_eq!(transition_ticks(80), 1);
        assert_eq!(transition_ticks(1400), 18);
    }
}
