use crate::bracket::PickRecord;
use crate::demo::{LOCAL_WORLDCUP_ID, local_worldcup, parse_detail};
use crate::result::{ChampionSummary, RESULT_CODE_WORLD_CUP, RankingRow, WorldcupResult};
use crate::{Contestant, ContestantId, Game, GameDetail};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Client for the games backend: game detail, play sessions, pick logs and
/// results.
#[derive(Debug, Clone)]
pub struct WorldcupApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    items_file: Option<PathBuf>,
}

impl Default for WorldcupApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Decode(serde_json::Error, String),
    Rejected { code: String, message: Option<String> },
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Decode(e, url) => write!(f, "Unexpected payload from {url}: {e}"),
            ApiError::Rejected { code, message } => match message {
                Some(message) => write!(f, "Request rejected ({code}): {message}"),
                None => write!(f, "Request rejected ({code})"),
            },
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub api: String,
    pub success: bool,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameDetailEnvelope {
    pub game: GameWithItems,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameWithItems {
    #[serde(flatten)]
    pub game: Game,
    #[serde(default)]
    pub items: Vec<Contestant>,
}

impl GameDetailEnvelope {
    pub fn into_detail(self) -> GameDetail {
        GameDetail {
            game: self.game.game,
            items: self.game.items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SessionRequest<'a> {
    game_id: i64,
    source: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SessionCreated {
    session_id: Option<i64>,
}

/// One pick, as logged against a play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickLog {
    pub choice_id: i64,
    pub game_id: i64,
    pub left_item_id: ContestantId,
    pub right_item_id: ContestantId,
    pub selected_item_id: ContestantId,
    pub step_index: usize,
}

impl PickLog {
    pub fn new(choice_id: i64, game_id: i64, pick: &PickRecord) -> Self {
        Self {
            choice_id,
            game_id,
            left_item_id: pick.left,
            right_item_id: pick.right,
            selected_item_id: pick.winner,
            step_index: pick.step_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPayload {
    pub round: usize,
    pub total_items: usize,
    pub champion: ChampionSummary,
    pub ranking: Vec<RankingRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResultRequest {
    pub choice_id: i64,
    pub game_id: i64,
    pub winner_item_id: ContestantId,
    pub result_title: String,
    pub result_code: &'static str,
    pub result_payload: ResultPayload,
}

impl GameResultRequest {
    /// Needs a session; results without one are not reported.
    pub fn from_result(result: &WorldcupResult) -> Option<Self> {
        let choice_id = result.choice_id?;
        Some(Self {
            choice_id,
            game_id: result.game_id,
            winner_item_id: result.champion.id,
            result_title: result.title(),
            result_code: RESULT_CODE_WORLD_CUP,
            result_payload: ResultPayload {
                round: result.round,
                total_items: result.total_items,
                champion: result.champion.clone(),
                ranking: result.ranking.clone(),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl WorldcupApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("worldcup-tui/0.1 (terminal worldcup player)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            items_file: None,
        }
    }

    /// Serve game detail from a local JSON file instead of the backend.
    pub fn with_items_file(mut self, path: Option<PathBuf>) -> Self {
        self.items_file = path;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a game and its contestant pool.
    ///
    /// Lookup order:
    /// 1) local items file, when configured.
    /// 2) the bundled worldcup for game id 0.
    /// 3) `GET {base}/games/{id}/`.
    pub async fn fetch_game_detail(&self, game_id: i64) -> ApiResult<GameDetail> {
        if let Some(path) = &self.items_file {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ApiError::NotFound(format!("could not read {}: {e}", path.display()))
            })?;
            return parse_detail(&content);
        }

        if game_id == LOCAL_WORLDCUP_ID {
            return local_worldcup();
        }

        let url = format!("{}/games/{game_id}/", self.base_url);
        let envelope: GameDetailEnvelope = self.get(&url).await?;
        Ok(envelope.into_detail())
    }

    /// Open a play session. `None` when the backend answers without an id.
    pub async fn create_session(&self, game_id: i64, source: &str) -> ApiResult<Option<i64>> {
        let url = format!("{}/games/session/", self.base_url);
        let created: SessionCreated = self.post(&url, &SessionRequest { game_id, source }).await?;
        Ok(created.session_id)
    }

    pub async fn log_pick(&self, pick: &PickLog) -> ApiResult<()> {
        let url = format!("{}/games/worldcup/pick/", self.base_url);
        self.post::<_, serde_json::Value>(&url, pick).await.map(|_| ())
    }

    pub async fn post_result(&self, result: &GameResultRequest) -> ApiResult<()> {
        let url = format!("{}/games/result/", self.base_url);
        self.post::<_, serde_json::Value>(&url, result).await.map(|_| ())
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        Self::read(response, url).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        Self::read(response, url).await
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> ApiResult<T> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_owned()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?;
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))?;
        unwrap_envelope(body, url)
    }
}

/// Strip the `{meta, data}` envelope. Bodies without `meta` pass through.
fn unwrap_envelope<T: DeserializeOwned>(body: serde_json::Value, url: &str) -> ApiResult<T> {
    let data = match body.get("meta") {
        Some(meta) => {
            let meta: Meta = serde_json::from_value(meta.clone())
                .map_err(|e| ApiError::Decode(e, url.to_owned()))?;
            if !meta.success {
                return Err(ApiError::Rejected {
                    code: meta.code,
                    message: meta.message,
                });
            }
            body.get("data").cloned().unwrap_or_default()
        }
        None => body,
    };
    serde_json::from_value(data).map_err(|e| ApiError::Decode(e, url.to_owned()))
}
