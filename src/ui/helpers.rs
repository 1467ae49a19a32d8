use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{Artwork, Playlist};

/// ASCII textures used as placeholder playlist covers. The placeholder seed
/// picks one, so a playlist keeps the same cover for its whole life.
pub(crate) const COVER_ART: &[&[&str]] = &[
    &["/\\/\\/", "\\/\\/\\"],
    &["*+*+", "+*+*"],
    &["=--=", "--=="],
    &["<>><", "><<>"],
    &["..--", "--.."],
    &["oOo ", " OoO"],
    &["##  ", "  ##"],
    &["||--", "--||"],
    &["[]__", "__[]"],
    &["~~  ", "  ~~"],
    &["^v^v", "v^v^"],
    &["&&..", "..&&"],
];

/// Texture for a placeholder seed.
pub(crate) fn cover_pattern(seed: u64) -> &'static [&'static str] {
    COVER_ART[(seed % COVER_ART.len() as u64) as usize]
}

/// Repeat a short ASCII motif until it fills the requested width.
pub(crate) fn repeat_pattern_row(row: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if row.is_empty() {
        return " ".repeat(width);
    }
    let repeat_count = width / row.len() + 2;
    let mut repeated = row.repeat(repeat_count);
    repeated.truncate(width);
    repeated
}

/// Center `text` inside square brackets, padded or cut to `width` columns.
pub(crate) fn centered_label(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return " ".repeat(width);
    }
    let decorated: String = format!("[ {trimmed} ]").chars().take(width).collect();
    let used = decorated.chars().count();
    let padding = width.saturating_sub(used);
    let left = padding / 2;
    let right = padding - left;
    format!("{}{}{}", " ".repeat(left), decorated, " ".repeat(right))
}

/// Build the lines of a playlist card: cover texture (or the artwork
/// reference), then the name and song count.
pub(crate) fn build_playlist_cover_lines(
    playlist: &Playlist,
    artwork: &Artwork,
    inner_width: u16,
    inner_height: u16,
    selected: bool,
) -> Vec<Line<'static>> {
    let width = inner_width as usize;
    let height = inner_height as usize;
    if width == 0 || height == 0 {
        return vec![Line::from("")];
    }

    let label_lines = height.min(2);
    let cover_height = height - label_lines;
    let cover_style = if selected {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = Vec::with_capacity(height);
    match artwork {
        Artwork::Placeholder { seed } => {
            let pattern = cover_pattern(*seed);
            for row_idx in 0..cover_height {
                let row = repeat_pattern_row(pattern[row_idx % pattern.len()], width);
                lines.push(Line::from(Span::styled(row, cover_style)));
            }
        }
        Artwork::Custom(reference) => {
            for row_idx in 0..cover_height {
                let text = if row_idx == cover_height / 2 {
                    centered_label(reference.as_str(), width)
                } else {
                    " ".repeat(width)
                };
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().fg(Color::Magenta),
                )));
            }
        }
    }

    let name = centered_label(&playlist.name, width);
    if selected {
        lines.push(Line::from(Span::styled(
            name,
            Style::default().add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(name));
    }
    if label_lines == 2 {
        let noun = if playlist.count == 1 { "song" } else { "songs" };
        lines.push(Line::from(Span::styled(
            format!("{:^width$}", format!("{} {noun}", playlist.count)),
            Style::default().fg(Color::Gray),
        )));
    }

    lines
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::models::{ArtworkRef, PlaylistId};

    fn playlist(name: &str, count: usize) -> Playlist {
        Playlist {
            id: PlaylistId::new(),
            name: name.to_string(),
            count,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn repeat_pattern_fills_width() {
        assert_eq!(repeat_pattern_row("ab", 5), "ababa");
        assert_eq!(repeat_pattern_row("", 3), "   ");
        assert_eq!(repeat_pattern_row("ab", 0), "");
    }

    #[test]
    fn centered_label_pads_and_truncates() {
        assert_eq!(centered_label("Gym", 11), "  [ Gym ]  ");
        assert_eq!(centered_label("Road Trip", 6), "[ Road");
        assert_eq!(centered_label("Road Trip", 6).chars().count(), 6);
        assert_eq!(centered_label("  ", 4), "    ");
    }

    #[test]
    fn cover_fills_requested_height() {
        let list = playlist("Chill", 2);
        let artwork = Artwork::Placeholder { seed: 3 };
        let lines = build_playlist_cover_lines(&list, &artwork, 12, 5, false);

        assert_eq!(lines.len(), 5);
        assert!(text(&lines[3]).contains("Chill"));
        assert!(text(&lines[4]).contains("2 songs"));
    }

    #[test]
    fn custom_artwork_shows_reference() {
        let list = playlist("Focus", 1);
        let artwork = Artwork::Custom(ArtworkRef::new("art.png"));
        let lines = build_playlist_cover_lines(&list, &artwork, 20, 5, true);

        assert!(lines.iter().any(|line| text(line).contains("art.png")));
        assert!(text(&lines[4]).contains("1 song"));
    }

    #[test]
    fn placeholder_pattern_is_deterministic() {
        assert_eq!(cover_pattern(42), cover_pattern(42));
        assert_eq!(cover_pattern(0), COVER_ART[0]);
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow!("disk full").context("failed to save");
        assert_eq!(surface_error(&err), "disk full");
    }
}
