use std::collections::HashSet;

use anyhow::{anyhow, Result};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{ArtworkRef, LevelField, LevelPreset, Levels, Playlist, PlaylistId, Song};

/// Internal representation of the "create playlist" form fields.
#[derive(Default, Clone)]
pub(crate) struct PlaylistForm {
    pub(crate) name: String,
    pub(crate) artwork: String,
    pub(crate) active: PlaylistField,
    pub(crate) error: Option<String>,
}

/// Fields available within the playlist form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum PlaylistField {
    #[default]
    Name,
    Artwork,
}

impl PlaylistForm {
    /// Swap focus between the name and artwork fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            PlaylistField::Name => PlaylistField::Artwork,
            PlaylistField::Artwork => PlaylistField::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            PlaylistField::Name => self.name.push(ch),
            PlaylistField::Artwork => self.artwork.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            PlaylistField::Name => {
                self.name.pop();
            }
            PlaylistField::Artwork => {
                self.artwork.pop();
            }
        }
    }

    /// Validate the inputs. The name is required; a blank artwork field
    /// means "no artwork".
    pub(crate) fn parse_inputs(&self) -> Result<(String, Option<ArtworkRef>)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Playlist name is required."));
        }
        Ok((name.to_string(), parse_artwork(&self.artwork)))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: PlaylistField) -> Line<'static> {
        let (label, value, placeholder) = match field {
            PlaylistField::Name => ("Name", &self.name, "<required>"),
            PlaylistField::Artwork => ("Artwork", &self.artwork, "<optional path or URI>"),
        };
        field_line(label, value, placeholder, self.active == field)
    }

    pub(crate) fn value_len(&self, field: PlaylistField) -> usize {
        match field {
            PlaylistField::Name => self.name.chars().count(),
            PlaylistField::Artwork => self.artwork.chars().count(),
        }
    }
}

/// Single-field form used to attach artwork to an existing playlist.
#[derive(Clone)]
pub(crate) struct ArtworkForm {
    pub(crate) playlist_id: PlaylistId,
    pub(crate) playlist_name: String,
    pub(crate) reference: String,
}

impl ArtworkForm {
    pub(crate) fn new(playlist: &Playlist, current: Option<&ArtworkRef>) -> Self {
        Self {
            playlist_id: playlist.id,
            playlist_name: playlist.name.clone(),
            reference: current.map(|r| r.as_str().to_string()).unwrap_or_default(),
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.reference.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.reference.pop();
    }

    /// `None` clears the artwork.
    pub(crate) fn parse(&self) -> Option<ArtworkRef> {
        parse_artwork(&self.reference)
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line("Artwork", &self.reference, "<blank to clear>", true)
    }
}

fn parse_artwork(raw: &str) -> Option<ArtworkRef> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(ArtworkRef::new(trimmed))
    }
}

fn field_line(label: &str, value: &str, placeholder: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Rows of the song editor, top to bottom.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum SongEditRow {
    Title,
    Artist,
    Preset,
    Level(LevelField),
}

const TEXT_ROWS: usize = 3;

/// Working copy of a song's name, artist and levels while the editor is open.
#[derive(Clone)]
pub(crate) struct SongEditForm {
    pub(crate) song: Song,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) levels: Levels,
    /// Index into `LevelPreset::ALL`; `None` when the levels match no preset.
    pub(crate) preset: Option<usize>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl SongEditForm {
    pub(crate) fn new(song: Song, levels: Levels) -> Self {
        Self {
            title: song.title.clone(),
            artist: song.artist.clone(),
            preset: matching_preset(&levels),
            levels,
            song,
            active: 0,
            error: None,
        }
    }

    pub(crate) fn active_row(&self) -> SongEditRow {
        match self.active {
            0 => SongEditRow::Title,
            1 => SongEditRow::Artist,
            2 => SongEditRow::Preset,
            index => SongEditRow::Level(LevelField::ALL[index - TEXT_ROWS]),
        }
    }

    pub(crate) fn move_row(&mut self, offset: isize) {
        let len = (TEXT_ROWS + LevelField::ALL.len()) as isize;
        self.active = (self.active as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active_row() {
            SongEditRow::Title => self.title.push(ch),
            SongEditRow::Artist => self.artist.push(ch),
            SongEditRow::Preset | SongEditRow::Level(_) => return false,
        }
        self.error = None;
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active_row() {
            SongEditRow::Title => {
                self.title.pop();
            }
            SongEditRow::Artist => {
                self.artist.pop();
            }
            SongEditRow::Preset | SongEditRow::Level(_) => {}
        }
    }

    /// Left/Right: cycle presets on the preset row, step a level on a level
    /// row.
    pub(crate) fn adjust(&mut self, steps: i32) {
        match self.active_row() {
            SongEditRow::Preset => self.cycle_preset(steps),
            SongEditRow::Level(field) => {
                self.levels.nudge(field, steps);
                self.preset = matching_preset(&self.levels);
            }
            SongEditRow::Title | SongEditRow::Artist => {}
        }
    }

    pub(crate) fn reset_field(&mut self) {
        if let SongEditRow::Level(field) = self.active_row() {
            self.levels.set(field, Levels::default().get(field));
            self.preset = matching_preset(&self.levels);
        }
    }

    fn cycle_preset(&mut self, steps: i32) {
        let len = LevelPreset::ALL.len() as i32;
        let next = match self.preset {
            Some(index) => (index as i32 + steps).rem_euclid(len),
            None if steps < 0 => len - 1,
            None => 0,
        } as usize;
        self.preset = Some(next);
        self.levels = LevelPreset::ALL[next].levels();
    }

    /// Validate the text rows. The title is required; the artist may be
    /// blank.
    pub(crate) fn parse(&self) -> Result<Song> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Song title is required."));
        }
        Ok(Song {
            id: self.song.id,
            title: title.to_string(),
            artist: self.artist.trim().to_string(),
        })
    }

    /// Character count of the text row under the cursor, if any.
    pub(crate) fn text_len(&self) -> Option<usize> {
        match self.active_row() {
            SongEditRow::Title => Some(self.title.chars().count()),
            SongEditRow::Artist => Some(self.artist.chars().count()),
            SongEditRow::Preset | SongEditRow::Level(_) => None,
        }
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            field_line(
                "Song Name",
                &self.title,
                "<required>",
                self.active_row() == SongEditRow::Title,
            ),
            field_line(
                "Artist",
                &self.artist,
                "<optional>",
                self.active_row() == SongEditRow::Artist,
            ),
        ];

        let preset = self
            .preset
            .map_or("Custom", |index| LevelPreset::ALL[index].label());
        lines.push(Line::from(vec![
            Span::raw("Preset: "),
            Span::styled(
                format!("< {preset} >"),
                self.row_style(self.active_row() == SongEditRow::Preset),
            ),
        ]));
        lines.push(Line::from(""));

        for field in LevelField::ALL {
            let range = field.range();
            let value = self.levels.get(field);
            let fraction = ((value - range.min) / (range.max - range.min)).clamp(0.0, 1.0);
            let filled = (fraction * 20.0).round() as usize;
            let bar = format!("{}{}", "#".repeat(filled), "-".repeat(20 - filled));
            let style = self.row_style(self.active_row() == SongEditRow::Level(field));
            lines.push(Line::from(vec![
                Span::styled(format!("{:<7}", field.label()), style),
                Span::styled(format!("[{bar}] "), Style::default().fg(Color::Cyan)),
                Span::styled(self.levels.format(field), style),
            ]));
        }
        lines
    }

    fn row_style(&self, is_active: bool) -> Style {
        if is_active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }
}

fn matching_preset(levels: &Levels) -> Option<usize> {
    LevelPreset::ALL
        .iter()
        .position(|preset| preset.levels() == *levels)
}

/// Entries of the per-song actions overlay, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum SongAction {
    Duplicate,
    AddToQueue,
    AddToPlaylist,
    Edit,
    Delete,
}

impl SongAction {
    pub(crate) const ALL: [SongAction; 5] = [
        SongAction::Duplicate,
        SongAction::AddToQueue,
        SongAction::AddToPlaylist,
        SongAction::Edit,
        SongAction::Delete,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            SongAction::Duplicate => "Duplicate",
            SongAction::AddToQueue => "Add to Queue",
            SongAction::AddToPlaylist => "Add to Playlist",
            SongAction::Edit => "Edit Song",
            SongAction::Delete => "Delete",
        }
    }
}

#[derive(Clone)]
pub(crate) struct SongActionsState {
    pub(crate) song: Song,
    pub(crate) selected: usize,
}

impl SongActionsState {
    pub(crate) fn new(song: Song) -> Self {
        Self { song, selected: 0 }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = SongAction::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn current(&self) -> SongAction {
        SongAction::ALL[self.selected]
    }
}

/// Playlist picker shown from the actions overlay. The final row creates a
/// new playlist.
#[derive(Clone)]
pub(crate) struct PlaylistPickerState {
    pub(crate) song: Song,
    pub(crate) playlists: Vec<Playlist>,
    pub(crate) selected: usize,
}

pub(crate) enum PickerChoice<'a> {
    Existing(&'a Playlist),
    CreateNew,
}

impl PlaylistPickerState {
    pub(crate) fn new(song: Song, playlists: Vec<Playlist>) -> Self {
        Self {
            song,
            playlists,
            selected: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.playlists.len() + 1
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn current(&self) -> PickerChoice<'_> {
        match self.playlists.get(self.selected) {
            Some(playlist) => PickerChoice::Existing(playlist),
            None => PickerChoice::CreateNew,
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmSongDelete {
    pub(crate) song: Song,
}

/// Pending bulk playlist deletion.
#[derive(Clone)]
pub(crate) struct ConfirmPlaylistsDelete {
    pub(crate) ids: HashSet<PlaylistId>,
    pub(crate) names: Vec<String>,
}

impl ConfirmPlaylistsDelete {
    pub(crate) fn from_playlists(playlists: &[Playlist]) -> Self {
        Self {
            ids: playlists.iter().map(|playlist| playlist.id).collect(),
            names: playlists.iter().map(|playlist| playlist.name.clone()).collect(),
        }
    }

    pub(crate) fn summary(&self) -> String {
        match self.names.as_slice() {
            [single] => format!("Delete playlist \"{single}\"?"),
            names => format!("Delete {} playlists?", names.len()),
        }
    }
}
