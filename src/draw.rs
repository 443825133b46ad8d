use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, Screen};
use crate::components::arena::MatchView;
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::{BannerColor, BannerTheme, resolve, round_label};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

const HELP_LINES: &[(&str, &str)] = &[
    ("Enter", "start / confirm round size"),
    ("j / k", "move in lists, scroll standings"),
    ("1  ←  h", "pick the left contestant"),
    ("2  →  l", "pick the right contestant"),
    ("r", "replay with the same contestants"),
    ("n", "choose a new round size"),
    ("s", "save the result as JSON"),
    ("\"", "toggle logs"),
    ("f", "toggle full screen"),
    ("Esc", "back"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }

        match app.state.screen {
            Screen::Intro => draw_intro(f, layout.main, app),
            Screen::RoundSelect => draw_round_select(f, layout.main, app),
            Screen::Arena => draw_arena(f, layout.main, app),
            Screen::Champion => draw_champion(f, layout.main, app),
            Screen::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs && layout.logs.height > 0 {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn game_title(app: &App) -> &str {
    app.state
        .game
        .as_ref()
        .map(|d| d.game.title.as_str())
        .unwrap_or("Worldcup")
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let screen = match app.state.screen {
        Screen::Intro => "",
        Screen::RoundSelect => "Round size",
        Screen::Arena => "Arena",
        Screen::Champion => "Champion",
        Screen::Help => "Help",
    };
    let kind = app
        .state
        .game
        .as_ref()
        .map(|d| d.game.kind.label())
        .unwrap_or_default();
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", game_title(app)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{kind} "), Style::default().fg(Color::DarkGray)),
        Span::raw(screen),
    ]);
    f.render_widget(
        Paragraph::new(title).block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        ),
        header[0],
    );

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, last_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            headline: game_title(app),
        },
        banner_area,
    );

    let (prompt, color) = match (&app.state.game, &app.state.last_error) {
        (_, Some(err)) => (err.clone(), Color::Red),
        (None, None) => ("Loading game...".to_string(), Color::DarkGray),
        (Some(detail), None) => (
            format!("{} contestants · press Enter to start", detail.items.len()),
            Color::Gray,
        ),
    };
    f.render_widget(
        Paragraph::new(prompt)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        prompt_area,
    );

    let last_champion = app
        .state
        .game
        .as_ref()
        .and_then(|d| app.state.session.result(d.game.id));
    if let Some(last) = last_champion {
        f.render_widget(
            Paragraph::new(format!("Last champion: {}", last.champion.name))
                .style(resolve(BannerColor::Dim, BannerTheme::Dark))
                .alignment(Alignment::Center),
            last_area,
        );
    }
}

fn draw_round_select(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Choose a round ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let count = app.state.game.as_ref().map(|d| d.items.len()).unwrap_or(0);
    let mut lines = vec![
        Line::from(format!("{count} contestants available")),
        Line::from(Span::styled(
            "Keys: j/k=move  Enter=start  Esc=back",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    for (idx, size) in app.state.picker.options.iter().enumerate() {
        let selected = idx == app.state.picker.selected;
        let marker = if selected { '>' } else { ' ' };
        let style = if selected {
            resolve(BannerColor::Accent, BannerTheme::Dark)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {:<14} {} picks", round_label(*size), size - 1),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_arena(f: &mut Frame, area: Rect, app: &App) {
    let arena = &app.state.arena;
    let (picks, total_picks) = arena.engine.progress();

    // The decided pair stays up while its pick animates.
    let view = match (&arena.highlight, arena.engine.current_match()) {
        (Some(h), _) => Some((
            &h.left,
            &h.right,
            Some(h.winner),
            h.round_number,
            h.round_size,
            h.match_index,
            h.total,
        )),
        (None, Some(m)) => {
            Some((m.left, m.right, None, m.round_number, m.round_size, m.index, m.total))
        }
        (None, None) => None,
    };

    let Some((left, right, winner, round_number, round_size, index, total)) = view else {
        f.render_widget(
            Paragraph::new("No match pending")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let title = format!(
        " Round {round_number} · {round_size}-strong · match {}/{total} · {} ",
        index + 1,
        round_label(round_size)
    );
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [progress_area, legend_area, cards_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)])
            .areas(inner);

    f.render_widget(
        Paragraph::new(progress_line(picks, total_picks, progress_area.width)),
        progress_area,
    );
    f.render_widget(
        Paragraph::new("Keys: 1/←/h=left  2/→/l=right  Esc=abandon  ?=help")
            .style(Style::default().fg(Color::DarkGray)),
        legend_area,
    );
    f.render_widget(
        MatchView { left, right, winner, theme: BannerTheme::Dark },
        cards_area,
    );
}

fn progress_line(done: usize, total: usize, width: u16) -> Line<'static> {
    let label = format!(" {done}/{total}");
    let bar_width = (width as usize).saturating_sub(label.len() + 2);
    let filled = if total == 0 { 0 } else { bar_width * done / total };
    Line::from(vec![
        Span::raw("["),
        Span::styled("=".repeat(filled), resolve(BannerColor::Primary, BannerTheme::Dark)),
        Span::raw(" ".repeat(bar_width - filled)),
        Span::raw("]"),
        Span::raw(label),
    ])
}

fn draw_champion(f: &mut Frame, area: Rect, app: &App) {
    let Some(result) = app.state.result.result.as_ref() else {
        draw_placeholder(f, area, "No champion yet");
        return;
    };

    let block = default_border(Color::White).title(format!(" {} ", result.title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [banner_area, status_area, legend_area, standings_area] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            headline: &result.champion.name,
        },
        banner_area,
    );

    let status = match (&app.state.result.saved_to, &app.state.last_error) {
        (_, Some(err)) => Span::styled(err.clone(), Style::default().fg(Color::Red)),
        (Some(path), None) => Span::styled(
            format!(
                "Saved to {} at {}",
                path.display(),
                app.state.result.saved_at.as_deref().unwrap_or_default()
            ),
            Style::default().fg(Color::Green),
        ),
        (None, None) => Span::raw(format!(
            "Round of {} · {} contestants",
            result.round, result.total_items
        )),
    };
    f.render_widget(Paragraph::new(Line::from(status)), status_area);
    f.render_widget(
        Paragraph::new("Keys: r=replay  n=new round  s=save  j/k=scroll  q=quit")
            .style(Style::default().fg(Color::DarkGray)),
        legend_area,
    );

    let lines: Vec<Line> = result
        .ranking
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if row.id == result.champion.id {
                resolve(BannerColor::Winner, BannerTheme::Dark)
            } else if row.wins == 0 {
                resolve(BannerColor::Dim, BannerTheme::Dark)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(
                format!("{:>3}. {:<32} {} win(s)", idx + 1, row.name, row.wins),
                style,
            ))
        })
        .collect();
    let standings = Paragraph::new(lines)
        .block(default_border(Color::DarkGray).title(" Standings "))
        .scroll((app.state.result.scroll_offset, 0));
    f.render_widget(standings, standings_area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:<10}"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .output_target(false);
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
