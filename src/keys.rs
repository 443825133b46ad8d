use crate::app::{App, Screen};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use worldcup_core::Side;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut requests = Vec::new();

    match (guard.state.screen, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        (_, Char('?'), _) => guard.update_screen(Screen::Help),
        (_, KeyCode::Esc, _) => guard.back(),

        (Screen::Intro, KeyCode::Enter, _) => requests = guard.dismiss_intro(),

        // Round picker
        (Screen::RoundSelect, Char('j') | KeyCode::Down, _) => guard.picker_down(),
        (Screen::RoundSelect, Char('k') | KeyCode::Up, _) => guard.picker_up(),
        (Screen::RoundSelect, KeyCode::Enter, _) => requests = guard.confirm_round(),

        // Arena
        (Screen::Arena, Char('1') | Char('h') | KeyCode::Left, _) => {
            requests = guard.pick(Side::Left);
        }
        (Screen::Arena, Char('2') | Char('l') | KeyCode::Right, _) => {
            requests = guard.pick(Side::Right);
        }

        // Champion and standings
        (Screen::Champion, Char('r'), _) => requests = guard.restart(),
        (Screen::Champion, Char('n'), _) => guard.choose_new_round(),
        (Screen::Champion, Char('j') | KeyCode::Down, _) => guard.result_scroll_down(),
        (Screen::Champion, Char('k') | KeyCode::Up, _) => guard.result_scroll_up(),
        (Screen::Champion, Char('s'), _) => match guard.save_result() {
            Ok(path) => info!("result saved to {}", path.display()),
            Err(e) => {
                error!("{e}");
                guard.on_error(e);
            }
        },

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    for request in requests {
        let _ = network_requests.send(request).await;
    }
}
