use tui::buffer::Buffer;
use tui::layout::{Constraint, Layout, Rect};
use tui::style::Style;
use tui::widgets::{Block, BorderType, Borders, Widget};
use worldcup_core::{Contestant, ContestantId, MediaKind, Side};

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

/// Cards narrower than this stack vertically instead of side by side.
const MIN_CARD_WIDTH: u16 = 24;

/// Text of the "versus" marker between the two cards.
const VS: &str = "VS";

// ---------------------------------------------------------------------------
// MatchView widget
// ---------------------------------------------------------------------------

/// Renders one head-to-head pair:
///
/// ```text
/// ╭ 1 ───────────────╮    ╭ 2 ───────────────╮
/// │ Shin Ramyun      │ VS │ Neoguri          │
/// │ [image] 1.png    │    │ [video] 3.mp4    │
/// │ #1               │    │ #3               │
/// ╰──────────────────╯    ╰──────────────────╯
/// ```
///
/// While a pick is animating, `winner` highlights the chosen card and dims
/// the other one.
pub struct MatchView<'a> {
    pub left: &'a Contestant,
    pub right: &'a Contestant,
    pub winner: Option<ContestantId>,
    pub theme: BannerTheme,
}

impl Widget for MatchView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < 3 {
            return;
        }
        let (left_area, vs_area, right_area) = card_areas(area);

        self.render_card(Side::Left, self.left, left_area, buf);
        self.render_card(Side::Right, self.right, right_area, buf);

        let vs_x = vs_area.x + vs_area.width.saturating_sub(VS.len() as u16) / 2;
        let vs_y = vs_area.y + vs_area.height / 2;
        if vs_area.width >= VS.len() as u16 && vs_area.height > 0 {
            buf.set_string(vs_x, vs_y, VS, resolve(BannerColor::Accent, self.theme));
        }
    }
}

impl MatchView<'_> {
    fn card_style(&self, contestant: &Contestant) -> Style {
        match self.winner {
            Some(id) if id == contestant.id => resolve(BannerColor::Winner, self.theme),
            Some(_) => resolve(BannerColor::Dim, self.theme),
            None => Style::default(),
        }
    }

    fn render_card(&self, side: Side, contestant: &Contestant, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        let style = self.card_style(contestant);
        let key = match side {
            Side::Left => " 1 ",
            Side::Right => " 2 ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style)
            .title(key);
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let lines = card_lines(contestant);
        for (row, text) in lines.iter().enumerate() {
            if row as u16 >= inner.height {
                break;
            }
            let clipped = clip(text, width);
            buf.set_string(inner.x, inner.y + row as u16, clipped, style);
        }
    }
}

/// Left card, gap, right card. Side by side when wide enough, else stacked.
pub fn card_areas(area: Rect) -> (Rect, Rect, Rect) {
    if area.width >= MIN_CARD_WIDTH * 2 + 4 {
        let [left, vs, right] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .areas(area);
        (left, vs, right)
    } else {
        let [left, vs, right] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        (left, vs, right)
    }
}

fn card_lines(contestant: &Contestant) -> Vec<String> {
    let tag = match contestant.media_kind() {
        MediaKind::Image => "[image]",
        MediaKind::Video => "[video]",
    };
    let mut lines = vec![contestant.display_name().to_string()];
    if !contestant.media_ref.is_empty() {
        lines.push(format!("{tag} {}", contestant.media_ref));
    }
    lines.push(format!("#{}", contestant.sort_order + 1));
    lines
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
