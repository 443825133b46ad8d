use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use worldcup_core::client::{ApiError, WorldcupApi};

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: WorldcupApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        api_base: &str,
        items_json: Option<PathBuf>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: WorldcupApi::new(api_base).with_items_file(items_json),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let result = match request {
                NetworkRequest::LoadGame { game_id } => {
                    self.start_loading_animation().await;
                    let result = self.handle_load_game(game_id).await;
                    self.stop_loading_animation(result.is_ok()).await;
                    result
                }
                NetworkRequest::StartSession { game_id, run_id, source } => {
                    Ok(self.handle_start_session(game_id, run_id, source).await)
                }
                NetworkRequest::LogPick(pick) => {
                    // Analytics never blocks or fails the game.
                    let client = self.client.clone();
                    tokio::spawn(async move {
                        if let Err(e) = client.log_pick(&pick).await {
                            warn!("pick log {} dropped: {e}", pick.step_index);
                        }
                    });
                    continue;
                }
                NetworkRequest::PostResult(result) => {
                    let client = self.client.clone();
                    tokio::spawn(async move {
                        if let Err(e) = client.post_result(&result).await {
                            warn!("result for game {} dropped: {e}", result.game_id);
                        }
                    });
                    continue;
                }
            };

            debug!("network request complete");

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_game(&self, game_id: i64) -> Result<NetworkResponse, ApiError> {
        debug!("loading game {game_id}");
        let detail = self.client.fetch_game_detail(game_id).await?;
        Ok(NetworkResponse::GameLoaded { detail })
    }

    /// A failed session only disables logging for this run.
    async fn handle_start_session(
        &self,
        game_id: i64,
        run_id: u64,
        source: &str,
    ) -> NetworkResponse {
        debug!("starting {source} session for game {game_id}");
        let session_id = match self.client.create_session(game_id, source).await {
            Ok(id) => id,
            Err(e) => {
                warn!("session for game {game_id} not started: {e}");
                None
            }
        };
        NetworkResponse::SessionStarted { game_id, run_id, session_id }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
