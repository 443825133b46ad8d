use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Dim,
    Winner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        BannerColor::Primary => Style::default().fg(Color::Rgb(212, 175, 55)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(230, 57, 70)),
        BannerColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        BannerColor::Shadow | BannerColor::Dim => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

/// Row of the sparkle bouncing down the trophy, as a triangle wave over `height`.
pub fn sparkle_row(tick: u64, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let period = 2 * h;
    let t = tick % period;
    (h.abs_diff(t)) as u16
}

pub fn trophy_frame(frame: usize) -> [&'static str; 5] {
    const FRAMES: [[&str; 5]; FRAME_COUNT] = [
        [" *     ", "\\=====/", " \\   / ", "  | |  ", " [___] "],
        ["   *   ", "\\=====/", " \\   / ", "  | |  ", " [___] "],
        ["     * ", "\\=====/", " \\   / ", "  | |  ", " [___] "],
        ["   +   ", "\\=====/", " \\   / ", "  | |  ", " [___] "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 4] {
    [
        "__      _____  ___ _    ___   ___ _   _ ___ ",
        "\\ \\    / / _ \\| _ \\ |  |   \\ / __| | | | _ \\",
        " \\ \\/\\/ / (_) |   / |__| |) | (__| |_| |  _/",
        "  \\_/\\_/ \\___/|_|_\\____|___/ \\___|\\___/|_|  ",
    ]
}

/// Display name of a round by how many contestants it started with.
pub fn round_label(round_size: usize) -> String {
    match round_size {
        0 => "WAITING".to_string(),
        1 => "CHAMPION".to_string(),
        2 => "FINAL".to_string(),
        3 | 4 => "SEMIFINAL".to_string(),
        n => format!("ROUND OF {n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_labels_name_the_last_rounds() {
        assert_eq!(round_label(2), "FINAL");
        assert_eq!(round_label(4), "SEMIFINAL");
        assert_eq!(round_label(3), "SEMIFINAL");
        assert_eq!(round_label(16), "ROUND OF 16");
    }

    #[test]
    fn sparkle_row_bounces_between_edges() {
        let rows: Vec<u16> = (0..9).map(|t| sparkle_row(t, 5)).collect();
        assert_eq!(rows, vec![4, 3, 2, 1, 0, 1, 2, 3, 4]);
        assert_eq!(sparkle_row(3, 1), 0);
    }

    #[test]
    fn trophy_frames_share_a_width() {
        for frame in 0..FRAME_COUNT {
            let widths: Vec<usize> =
                trophy_frame(frame).iter().map(|r| r.chars().count()).collect();
            assert!(widths.iter().all(|w| *w == widths[0]), "frame {frame}: {widths:?}");
        }
    }
}
