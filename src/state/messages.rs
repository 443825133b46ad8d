use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use worldcup_core::GameDetail;
use worldcup_core::client::{GameResultRequest, PickLog};

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadGame { game_id: i64 },
    StartSession { game_id: i64, run_id: u64, source: &'static str },
    /// Fire-and-forget: failures are logged, never reported back.
    LogPick(PickLog),
    /// Fire-and-forget: failures are logged, never reported back.
    PostResult(GameResultRequest),
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    GameLoaded { detail: GameDetail },
    SessionStarted { game_id: i64, run_id: u64, session_id: Option<i64> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
