use crate::bracket::BracketEngine;
use crate::ranking::RankEntry;
use crate::shuffle::Shuffler;
use crate::{Contestant, ContestantId, Game};
use serde::{Deserialize, Serialize};

pub const RESULT_CODE_WORLD_CUP: &str = "WORLD_CUP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionSummary {
    pub id: ContestantId,
    pub name: String,
    pub file_name: String,
    pub sort_order: i32,
}

impl From<&Contestant> for ChampionSummary {
    fn from(c: &Contestant) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            file_name: c.media_ref.clone(),
            sort_order: c.sort_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRow {
    pub id: ContestantId,
    pub name: String,
    pub file_name: String,
    pub sort_order: i32,
    pub wins: u32,
}

impl From<&RankEntry> for RankingRow {
    fn from(entry: &RankEntry) -> Self {
        Self {
            id: entry.contestant.id,
            name: entry.contestant.name.clone(),
            file_name: entry.contestant.media_ref.clone(),
            sort_order: entry.contestant.sort_order,
            wins: entry.wins,
        }
    }
}

/// Snapshot of a finished run, as shown on the results screen and cached
/// per game for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldcupResult {
    pub game_id: i64,
    pub game_title: String,
    pub choice_id: Option<i64>,
    /// Round size the player chose; the entrant count when none was chosen.
    pub round: usize,
    pub total_items: usize,
    pub champion: ChampionSummary,
    pub ranking: Vec<RankingRow>,
}

impl WorldcupResult {
    /// `None` until the engine has a champion.
    pub fn from_engine<S: Shuffler>(
        game: &Game,
        choice_id: Option<i64>,
        selected_round: Option<usize>,
        engine: &BracketEngine<S>,
    ) -> Option<Self> {
        let champion = engine.champion()?;
        let total_items = engine.entrants().len();
        Some(Self {
            game_id: game.id,
            game_title: game.title.clone(),
            choice_id,
            round: selected_round.unwrap_or(total_items),
            total_items,
            champion: champion.into(),
            ranking: engine.ranking().iter().map(RankingRow::from).collect(),
        })
    }

    pub fn title(&self) -> String {
        result_title(&self.game_title)
    }
}

pub fn result_title(game_title: &str) -> String {
    if game_title.trim().is_empty() {
        "Worldcup champion".to_string()
    } else {
        format!("{game_title} champion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::Side;
    use crate::shuffle::NoShuffle;

    fn finished_engine() -> BracketEngine<NoShuffle> {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(vec![
            Contestant::new(1, "A", "a.png", 0),
            Contestant::new(2, "B", "b.png", 1),
        ]);
        engine.pick(Side::Right);
        engine
    }

    #[test]
    fn result_is_absent_before_a_champion() {
        let mut engine = BracketEngine::new(NoShuffle);
        engine.start_run(vec![Contestant::new(1, "A", "", 0), Contestant::new(2, "B", "", 1)]);
        assert!(WorldcupResult::from_engine(&Game::default(), None, None, &engine).is_none());
    }

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let game = Game { id: 5, title: "Snacks".into(), ..Game::default() };
        let result =
            WorldcupResult::from_engine(&game, Some(77), None, &finished_engine()).unwrap();
        assert_eq!(result.round, 2);
        assert_eq!(result.champion.id, ContestantId(2));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["gameId"], 5);
        assert_eq!(json["choiceId"], 77);
        assert_eq!(json["totalItems"], 2);
        assert_eq!(json["champion"]["file_name"], "b.png");
        assert_eq!(json["ranking"][0]["wins"], 1);
    }

    #[test]
    fn result_title_has_a_fallback() {
        assert_eq!(result_title("Ramen"), "Ramen champion");
        assert_eq!(result_title(""), "Worldcup champion");
    }
}
