use crate::args::AppArgs;
use log::LevelFilter;
use std::path::PathBuf;
use worldcup_core::client::DEFAULT_API_BASE;
use worldcup_core::demo::LOCAL_WORLDCUP_ID;

/// Delay between a pick and the next pair, in milliseconds.
pub const DEFAULT_TRANSITION_MS: u64 = 1400;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_base: String,
    pub game_id: i64,
    pub round: Option<usize>,
    pub seed: Option<u64>,
    pub items_json: Option<PathBuf>,
    pub transition_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_base: DEFAULT_API_BASE.to_string(),
            game_id: LOCAL_WORLDCUP_ID,
            round: None,
            seed: None,
            items_json: None,
            transition_ms: DEFAULT_TRANSITION_MS,
        }
    }
}

impl AppSettings {
    /// CLI flags over `WORLDCUP_*` environment variables over defaults.
    pub fn load(args: &AppArgs) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    fn resolve(args: &AppArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            full_screen: args.full_screen,
            log_level: args
                .log_level
                .or_else(|| env("WORLDCUP_LOG_LEVEL").and_then(|v| v.parse().ok())),
            api_base: args
                .api_base
                .clone()
                .or_else(|| env("WORLDCUP_API_BASE"))
                .unwrap_or(defaults.api_base),
            game_id: args
                .game
                .or_else(|| env("WORLDCUP_GAME_ID").and_then(|v| v.parse().ok()))
                .unwrap_or(defaults.game_id),
            round: args
                .round
                .or_else(|| env("WORLDCUP_ROUND").and_then(|v| v.parse().ok())),
            seed: args
                .seed
                .or_else(|| env("WORLDCUP_SEED").and_then(|v| v.parse().ok())),
            items_json: args
                .items_json
                .clone()
                .or_else(|| env("WORLDCUP_ITEMS_JSON").map(PathBuf::from)),
            transition_ms: env("WORLDCUP_TRANSITION_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.transition_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_play_the_bundled_worldcup() {
        let settings = AppSettings::resolve(&AppArgs::default(), env_of(&[]));
        assert_eq!(settings.game_id, LOCAL_WORLDCUP_ID);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.transition_ms, DEFAULT_TRANSITION_MS);
        assert_eq!(settings.round, None);
    }

    #[test]
    fn environment_fills_unset_flags() {
        let env = env_of(&[
            ("WORLDCUP_GAME_ID", "42"),
            ("WORLDCUP_ROUND", "16"),
            ("WORLDCUP_API_BASE", "https://games.example/api"),
            ("WORLDCUP_TRANSITION_MS", "0"),
            ("WORLDCUP_LOG_LEVEL", "debug"),
        ]);
        let settings = AppSettings::resolve(&AppArgs::default(), env);
        assert_eq!(settings.game_id, 42);
        assert_eq!(settings.round, Some(16));
        assert_eq!(settings.api_base, "https://games.example/api");
        assert_eq!(settings.transition_ms, 0);
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn flags_win_over_environment() {
        let args = AppArgs { game: Some(7), seed: Some(1), ..AppArgs::default() };
        let env = env_of(&[("WORLDCUP_GAME_ID", "42"), ("WORLDCUP_SEED", "9")]);
        let settings = AppSettings::resolve(&args, env);
        assert_eq!(settings.game_id, 7);
        assert_eq!(settings.seed, Some(1));
    }

    #[test]
    fn blank_or_garbage_env_values_are_ignored() {
        let env = env_of(&[("WORLDCUP_GAME_ID", "  "), ("WORLDCUP_ROUND", "many")]);
        let settings = AppSettings::resolve(&AppArgs::default(), env);
        assert_eq!(settings.game_id, LOCAL_WORLDCUP_ID);
        assert_eq!(settings.round, None);
    }
}
