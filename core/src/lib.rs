pub mod bracket;
pub mod client;
pub mod demo;
pub mod ranking;
pub mod result;
pub mod round_size;
pub mod shuffle;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use bracket::{BracketEngine, Match, Phase, PickRecord, RoundState, Side};
pub use ranking::{RankEntry, WinTally, build_ranking};
pub use shuffle::{NoShuffle, SeededShuffle, Shuffler};

// ---------------------------------------------------------------------------
// Domain types — shared by the engine, the client and the host
// ---------------------------------------------------------------------------

/// Stable identifier of a contestant for the lifetime of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContestantId(pub i64);

impl fmt::Display for ContestantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One candidate in a worldcup. Wire names follow the backend item shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: ContestantId,
    #[serde(default)]
    pub name: String,
    /// Opaque image/video reference ("file_name" on the wire).
    #[serde(rename = "file_name", default)]
    pub media_ref: String,
    /// Original position; tiebreak for standings.
    #[serde(default)]
    pub sort_order: i32,
}

impl Contestant {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        media_ref: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            id: ContestantId(id),
            name: name.into(),
            media_ref: media_ref.into(),
            sort_order,
        }
    }

    /// Label shown to the player. Empty names fall back to the media reference.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.media_ref
        } else {
            &self.name
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        media_kind(&self.media_ref)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

pub fn media_kind(media_ref: &str) -> MediaKind {
    let lower = media_ref.to_ascii_lowercase();
    if [".mp4", ".mov", ".webm", ".ogg"]
        .iter()
        .any(|ext| lower.ends_with(ext))
    {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameKind {
    #[default]
    WorldCup,
    FortuneTest,
    Psychological,
    Quiz,
    #[serde(other)]
    Unknown,
}

impl GameKind {
    pub fn label(&self) -> &'static str {
        match self {
            GameKind::WorldCup => "Worldcup",
            GameKind::FortuneTest => "Fortune",
            GameKind::Psychological => "Psycho test",
            GameKind::Quiz => "Quiz",
            GameKind::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: GameKind,
    #[serde(rename = "thumbnail_image_url", default)]
    pub thumbnail: String,
    /// Round size configured by the game's author, if any.
    #[serde(default)]
    pub worldcup_round_size: Option<usize>,
}

/// A game together with its contestant pool, as handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDetail {
    pub game: Game,
    pub items: Vec<Contestant>,
}

impl GameDetail {
    pub fn is_playable(&self) -> bool {
        self.game.kind == GameKind::WorldCup && self.items.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_media_ref() {
        let named = Contestant::new(1, "Neoguri", "3.png", 0);
        let unnamed = Contestant::new(2, "  ", "4.png", 1);
        assert_eq!(named.display_name(), "Neoguri");
        assert_eq!(unnamed.display_name(), "4.png");
    }

    #[test]
    fn media_kind_detects_video_extensions() {
        assert_eq!(media_kind("/media/clip.MP4"), MediaKind::Video);
        assert_eq!(media_kind("a.webm"), MediaKind::Video);
        assert_eq!(media_kind("a.png"), MediaKind::Image);
        assert_eq!(media_kind(""), MediaKind::Image);
    }

    #[test]
    fn contestant_uses_backend_wire_names() {
        let c: Contestant =
            serde_json::from_str(r#"{"id":9,"name":"","file_name":"9.jpg","sort_order":4}"#)
                .unwrap();
        assert_eq!(c.id, ContestantId(9));
        assert_eq!(c.media_ref, "9.jpg");
        assert_eq!(c.sort_order, 4);
    }

    #[test]
    fn unknown_game_type_does_not_fail_parsing() {
        let g: Game = serde_json::from_str(r#"{"id":1,"title":"t","type":"BALANCE"}"#).unwrap();
        assert_eq!(g.kind, GameKind::Unknown);
        assert_eq!(g.worldcup_round_size, None);
    }
}
