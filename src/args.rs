use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[clap(
    name = "worldcup",
    about = "Elimination-bracket worldcup games in your terminal",
    author,
    version,
    long_about = None
)]
pub struct AppArgs {
    #[clap(
        long,
        short = 'g',
        action = ArgAction::Set,
        help = "Game id to play (0 = bundled ramen worldcup)"
    )]
    pub game: Option<i64>,
    #[clap(
        long,
        short = 'r',
        action = ArgAction::Set,
        help = "Round size to start with, skipping the picker"
    )]
    pub round: Option<usize>,
    #[clap(long, action = ArgAction::Set, help = "Seed for the bracket shuffle")]
    pub seed: Option<u64>,
    #[clap(long, action = ArgAction::Set, help = "Backend API base url")]
    pub api_base: Option<String>,
    #[clap(
        long,
        action = ArgAction::Set,
        help = "Load contestants from a local game-detail JSON file"
    )]
    pub items_json: Option<PathBuf>,
    #[clap(
        long,
        short = 'l',
        action = ArgAction::Set,
        help = "Log level (error, warn, info, debug, trace)"
    )]
    pub log_level: Option<LevelFilter>,
    #[clap(long, short = 'f', action = ArgAction::SetTrue, help = "Start in full screen")]
    pub full_screen: bool,
}
