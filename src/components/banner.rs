use crate::components::banner_frames::{
    BannerColor, BannerTheme, resolve, sparkle_row, title_rows, trophy_frame,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

pub use crate::components::banner_frames::FRAME_COUNT;

/// Title banner with an animated trophy. Shown on the intro and champion screens.
pub struct AnimatedBanner<'a> {
    pub frame: usize,
    pub tick: u64,
    pub theme: BannerTheme,
    /// Line under the title: game name, or the champion's name.
    pub headline: &'a str,
}

impl Widget for AnimatedBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(Line::from(" WORLDCUP "), area.x, area.y, area.width, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(BannerColor::Primary, self.theme));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if inner.width < 64 || inner.height < 5 {
            render_compact(&self, inner, buf);
            return;
        }
        render_full(&self, inner, buf);
    }
}

fn render_compact(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    render_centered(
        Line::from(Span::styled("WORLDCUP", resolve(BannerColor::Accent, banner.theme))),
        inner,
        inner.y,
        buf,
    );
    if inner.height > 1 {
        render_centered(
            Line::from(Span::styled(
                banner.headline.to_string(),
                resolve(BannerColor::Secondary, banner.theme),
            )),
            inner,
            inner.y + 1,
            buf,
        );
    }
}

fn render_full(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = title_rows();
    let left = trophy_frame(banner.frame);
    let right = trophy_frame((banner.frame + 2) % FRAME_COUNT);
    let lit_row = sparkle_row(banner.tick, 4);

    for row in 0..4u16 {
        if row >= inner.height {
            break;
        }
        let y = inner.y + row;
        let trophy_style = if row == lit_row {
            resolve(BannerColor::Accent, banner.theme)
        } else {
            resolve(BannerColor::Primary, banner.theme)
        };

        let line = Line::from(vec![
            Span::styled(left[row as usize].to_string(), trophy_style),
            Span::raw(" "),
            Span::styled(
                title[row as usize].to_string(),
                resolve(BannerColor::Secondary, banner.theme),
            ),
            Span::raw(" "),
            Span::styled(right[row as usize].to_string(), trophy_style),
        ]);
        render_centered(line, inner, y, buf);
    }

    render_centered(
        Line::from(Span::styled(
            format!(" {} ", banner.headline),
            resolve(BannerColor::Accent, banner.theme),
        )),
        inner,
        inner.y + 4,
        buf,
    );
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let style: Style = span.style;
        let mut run = String::new();
        for ch in span.content.chars() {
            if cx >= limit {
                break;
            }
            run.push(ch);
            cx += 1;
        }
        let start = cx.saturating_sub(run.chars().count() as u16);
        if !run.is_empty() {
            buf.set_string(start, y, run, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(area: Rect, headline: &str) -> String {
        let mut buf = Buffer::empty(area);
        AnimatedBanner { frame: 0, tick: 0, theme: BannerTheme::Dark, headline }
            .render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn compact_banner_shows_headline() {
        let text = rendered(Rect::new(0, 0, 40, 6), "Ramen Worldcup");
        assert!(text.contains("WORLDCUP"));
        assert!(text.contains("Ramen Worldcup"));
    }

    #[test]
    fn full_banner_shows_headline_under_title() {
        let text = rendered(Rect::new(0, 0, 100, 8), "Champion: Neoguri");
        assert!(text.contains("Champion: Neoguri"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let text = rendered(Rect::new(0, 0, 12, 2), "x");
        assert!(text.contains("WORLDCUP"));
    }
}
