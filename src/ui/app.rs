use std::mem;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::{Artwork, LevelField, Playlist, Song};
use crate::player::MiniPlayer;
use crate::store::{LibraryStore, StoreEvent};

use super::forms::{
    ArtworkForm, ConfirmPlaylistsDelete, ConfirmSongDelete, PickerChoice, PlaylistField,
    PlaylistForm, PlaylistPickerState, SongAction, SongActionsState, SongEditForm,
};
use super::helpers::{build_playlist_cover_lines, centered_rect, surface_error};
use super::screens::{HomeScreen, PlaylistDetailScreen, PlaylistGridState, SongListScreen};

/// Number of playlist cards shown in each row of the grid.
const GRID_COLUMNS: usize = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown in song lists.
const PAGE_SIZE: isize = 5;
const TAB_TITLES: [&str; 3] = ["Home", "Songs", "Playlists"];

/// Top-level tabs plus the playlist detail page, which lives under
/// Playlists.
enum Screen {
    Home,
    Songs,
    Playlists,
    PlaylistDetail(PlaylistDetailScreen),
}

/// Overlays and input modes layered on top of the current screen.
enum Mode {
    Normal,
    Searching(SearchState),
    SongActions(SongActionsState),
    PickingPlaylist(PlaylistPickerState),
    CreatingPlaylist {
        song: Option<Song>,
        form: PlaylistForm,
    },
    EditingArtwork(ArtworkForm),
    EditingSong(SongEditForm),
    ConfirmSongDelete(ConfirmSongDelete),
    ConfirmPlaylistsDelete(ConfirmPlaylistsDelete),
}

/// State for the inline song search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: LibraryStore,
    player: MiniPlayer,
    recent_limit: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    /// Events published by the store since the last key press.
    pending_events: Arc<Mutex<Vec<StoreEvent>>>,
    playlists: Vec<Playlist>,
    home: HomeScreen,
    songs: SongListScreen,
    grid: PlaylistGridState,
}

impl App {
    pub fn new(mut store: LibraryStore, config: &AppConfig) -> Self {
        let pending_events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&pending_events);
        store.subscribe(move |event| {
            if let Ok(mut events) = sink.lock() {
                events.push(event.clone());
            }
        });

        let mut player = MiniPlayer::default();
        player.start(&store);

        Self {
            playlists: store.playlists(),
            songs: SongListScreen::new(&store),
            home: HomeScreen::default(),
            grid: PlaylistGridState::default(),
            recent_limit: config.recent_limit,
            screen: Screen::Home,
            mode: Mode::Normal,
            status: None,
            pending_events,
            player,
            store,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::SongActions(state) => self.handle_song_actions(code, state)?,
            Mode::PickingPlaylist(state) => self.handle_pick_playlist(code, state)?,
            Mode::CreatingPlaylist { song, form } => {
                self.handle_create_playlist(code, song, form)?
            }
            Mode::EditingArtwork(form) => self.handle_edit_artwork(code, form)?,
            Mode::EditingSong(form) => self.handle_edit_song(code, form)?,
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm)?,
            Mode::ConfirmPlaylistsDelete(confirm) => {
                self.handle_confirm_playlists_delete(code, confirm)?
            }
        };

        self.mode = mode;
        self.apply_store_events();
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        if self.handle_global_key(code, exit) {
            return Ok(Mode::Normal);
        }
        match self.screen {
            Screen::Home => self.handle_home_key(code),
            Screen::Songs => self.handle_songs_key(code),
            Screen::Playlists => self.handle_grid_key(code),
            Screen::PlaylistDetail(_) => self.handle_detail_key(code),
        }
    }

    /// Keys that behave the same on every screen. Returns `true` when the key
    /// was consumed.
    fn handle_global_key(&mut self, code: KeyCode, exit: &mut bool) -> bool {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Char('1') => self.switch_tab(0),
            KeyCode::Char('2') => self.switch_tab(1),
            KeyCode::Char('3') => self.switch_tab(2),
            KeyCode::Tab => self.switch_tab((self.tab_index() + 1) % TAB_TITLES.len()),
            KeyCode::BackTab => {
                self.switch_tab((self.tab_index() + TAB_TITLES.len() - 1) % TAB_TITLES.len())
            }
            KeyCode::Char('n') => {
                self.player.advance(&mut self.store);
                self.announce_now_playing();
            }
            KeyCode::Char('b') => {
                self.player.step_back(&self.store);
                self.announce_now_playing();
            }
            KeyCode::Char(' ') if !self.is_grid_selecting() => {
                let message = if self.player.toggle_playing() {
                    "Playing."
                } else {
                    "Paused."
                };
                self.set_status(message, StatusKind::Info);
            }
            _ => return false,
        }
        true
    }

    fn handle_home_key(&mut self, code: KeyCode) -> Result<Mode> {
        let recent = self.store.recently_added(self.recent_limit);
        match code {
            KeyCode::Up => self.home.move_selection(-1, recent.len()),
            KeyCode::Down => self.home.move_selection(1, recent.len()),
            KeyCode::Enter => match recent.get(self.home.selected) {
                Some(song) => self.play(song.clone()),
                None => self.set_status("No song selected.", StatusKind::Error),
            },
            KeyCode::Char('a') => {
                if let Some(song) = recent.get(self.home.selected) {
                    return Ok(Mode::SongActions(SongActionsState::new(song.clone())));
                }
                self.set_status("No song selected.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_songs_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Up => self.songs.move_selection(-1),
            KeyCode::Down => self.songs.move_selection(1),
            KeyCode::PageUp => self.songs.move_selection(-PAGE_SIZE),
            KeyCode::PageDown => self.songs.move_selection(PAGE_SIZE),
            KeyCode::Home => self.songs.select_first(),
            KeyCode::End => self.songs.select_last(),
            KeyCode::Enter => match self.songs.current_song().cloned() {
                Some(song) => self.play(song),
                None => self.set_status("No song selected.", StatusKind::Error),
            },
            KeyCode::Char('a') => match self.songs.current_song().cloned() {
                Some(song) => return Ok(Mode::SongActions(SongActionsState::new(song))),
                None => self.set_status("No song selected.", StatusKind::Error),
            },
            KeyCode::Char('f') => {
                let query = self.songs.filter.clone().unwrap_or_default();
                return Ok(Mode::Searching(SearchState { query }));
            }
            KeyCode::Esc => {
                if self.songs.has_filter() {
                    self.songs.set_filter(None, &self.store);
                    self.set_status("Search cleared.", StatusKind::Info);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_grid_key(&mut self, code: KeyCode) -> Result<Mode> {
        let len = self.playlists.len();
        match code {
            KeyCode::Left => self.grid.move_by(-1, len),
            KeyCode::Right => self.grid.move_by(1, len),
            KeyCode::Up => self.grid.move_by(-(GRID_COLUMNS as isize), len),
            KeyCode::Down => self.grid.move_by(GRID_COLUMNS as isize, len),
            KeyCode::Enter => match self.current_playlist().cloned() {
                Some(playlist) => {
                    let detail = PlaylistDetailScreen::new(playlist, &self.store);
                    self.screen = Screen::PlaylistDetail(detail);
                    self.clear_status();
                }
                None => self.set_status("No playlist selected.", StatusKind::Error),
            },
            KeyCode::Char('+') => {
                return Ok(Mode::CreatingPlaylist {
                    song: None,
                    form: PlaylistForm::default(),
                });
            }
            KeyCode::Char('v') => {
                let message = if self.grid.toggle_selecting() {
                    "Select mode on. Space marks playlists."
                } else {
                    "Select mode off."
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Esc if self.grid.selecting => {
                self.grid.toggle_selecting();
                self.set_status("Select mode off.", StatusKind::Info);
            }
            KeyCode::Char(' ') if self.grid.selecting => {
                if let Some(id) = self.current_playlist().map(|playlist| playlist.id) {
                    self.grid.toggle_mark(id);
                }
            }
            KeyCode::Char('-') => {
                let targets: Vec<Playlist> = if self.grid.selecting {
                    self.playlists
                        .iter()
                        .filter(|playlist| self.grid.marked.contains(&playlist.id))
                        .cloned()
                        .collect()
                } else {
                    self.current_playlist().cloned().into_iter().collect()
                };
                if targets.is_empty() {
                    self.set_status("No playlists selected.", StatusKind::Error);
                } else {
                    return Ok(Mode::ConfirmPlaylistsDelete(
                        ConfirmPlaylistsDelete::from_playlists(&targets),
                    ));
                }
            }
            KeyCode::Char('i') => match self.current_playlist().cloned() {
                Some(playlist) => return Ok(Mode::EditingArtwork(self.artwork_form(&playlist))),
                None => self.set_status("No playlist selected.", StatusKind::Error),
            },
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_detail_key(&mut self, code: KeyCode) -> Result<Mode> {
        let Screen::PlaylistDetail(detail) = &mut self.screen else {
            return Ok(Mode::Normal);
        };
        match code {
            KeyCode::Up => detail.move_selection(-1),
            KeyCode::Down => detail.move_selection(1),
            KeyCode::PageUp => detail.move_selection(-PAGE_SIZE),
            KeyCode::PageDown => detail.move_selection(PAGE_SIZE),
            KeyCode::Esc => {
                self.screen = Screen::Playlists;
                self.clear_status();
            }
            KeyCode::Enter => match detail.current_song().cloned() {
                Some(song) => self.play(song),
                None => self.set_status("This playlist is empty.", StatusKind::Error),
            },
            KeyCode::Char('a') => match detail.current_song().cloned() {
                Some(song) => return Ok(Mode::SongActions(SongActionsState::new(song))),
                None => self.set_status("No song selected.", StatusKind::Error),
            },
            KeyCode::Char('r') => {
                detail.shuffle(&self.store, &mut rand::rng());
                self.set_status("Shuffled.", StatusKind::Info);
            }
            KeyCode::Char('o') => {
                if detail.shuffled {
                    detail.refresh(&self.store);
                    self.set_status("Original order restored.", StatusKind::Info);
                }
            }
            KeyCode::Char('-') => {
                if detail.shuffled {
                    self.set_status(
                        "Restore the original order (o) before removing songs.",
                        StatusKind::Error,
                    );
                } else if let Some(position) = detail.current_position() {
                    let playlist_id = detail.playlist.id;
                    if let Some(song_id) = self.store.remove_from_playlist(playlist_id, position)
                    {
                        info!(playlist = %playlist_id, song = %song_id, "removed from playlist");
                        self.set_status("Removed from playlist.", StatusKind::Info);
                    }
                } else {
                    self.set_status("No song selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('i') => {
                let playlist = detail.playlist.clone();
                return Ok(Mode::EditingArtwork(self.artwork_form(&playlist)));
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.songs.set_filter(None, &self.store);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => return Ok(Mode::Normal),
            KeyCode::Up => {
                self.songs.move_selection(-1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                self.songs.move_selection(1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Ok(Mode::Searching(state)),
        }
        self.songs.set_filter(Some(state.query.clone()), &self.store);
        Ok(Mode::Searching(state))
    }

    fn handle_song_actions(&mut self, code: KeyCode, mut state: SongActionsState) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Up => {
                state.move_selection(-1);
                Ok(Mode::SongActions(state))
            }
            KeyCode::Down => {
                state.move_selection(1);
                Ok(Mode::SongActions(state))
            }
            KeyCode::Enter => Ok(self.run_song_action(state.current(), state.song)),
            _ => Ok(Mode::SongActions(state)),
        }
    }

    fn run_song_action(&mut self, action: SongAction, song: Song) -> Mode {
        match action {
            SongAction::Duplicate => {
                let copy = self.store.duplicate_song(&song);
                self.set_status(format!("Created \"{}\".", copy.title), StatusKind::Info);
                Mode::Normal
            }
            SongAction::AddToQueue => {
                self.store.add_to_queue(&song);
                self.set_status(
                    format!("Queued {}.", song.display_title()),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            SongAction::AddToPlaylist => {
                Mode::PickingPlaylist(PlaylistPickerState::new(song, self.store.playlists()))
            }
            SongAction::Edit => {
                let levels = self.store.levels(song.id);
                Mode::EditingSong(SongEditForm::new(song, levels))
            }
            SongAction::Delete => Mode::ConfirmSongDelete(ConfirmSongDelete { song }),
        }
    }

    fn handle_pick_playlist(
        &mut self,
        code: KeyCode,
        mut state: PlaylistPickerState,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Up => {
                state.move_selection(-1);
                Ok(Mode::PickingPlaylist(state))
            }
            KeyCode::Down => {
                state.move_selection(1);
                Ok(Mode::PickingPlaylist(state))
            }
            KeyCode::Enter => match state.current() {
                PickerChoice::Existing(playlist) => {
                    if self.store.add_song_to_playlist(&state.song, playlist.id) {
                        self.set_status(format!("Added to {}.", playlist.name), StatusKind::Info);
                    } else {
                        self.set_status("That playlist no longer exists.", StatusKind::Error);
                    }
                    Ok(Mode::Normal)
                }
                PickerChoice::CreateNew => Ok(Mode::CreatingPlaylist {
                    song: Some(state.song),
                    form: PlaylistForm::default(),
                }),
            },
            _ => Ok(Mode::PickingPlaylist(state)),
        }
    }

    fn handle_create_playlist(
        &mut self,
        code: KeyCode,
        song: Option<Song>,
        mut form: PlaylistForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Playlist creation cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_playlist(&form, song.as_ref()) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::CreatingPlaylist { song, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_artwork(&mut self, code: KeyCode, mut form: ArtworkForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Artwork unchanged.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::EditingArtwork(form))
            }
            KeyCode::Enter => {
                let artwork = form.parse();
                let cleared = artwork.is_none();
                if !self.store.set_playlist_artwork(form.playlist_id, artwork) {
                    warn!(playlist = %form.playlist_id, "artwork target disappeared");
                    self.set_status("That playlist no longer exists.", StatusKind::Error);
                } else if cleared {
                    self.set_status("Artwork cleared.", StatusKind::Info);
                } else {
                    self.set_status(
                        format!("Artwork updated for {}.", form.playlist_name),
                        StatusKind::Info,
                    );
                }
                Ok(Mode::Normal)
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Ok(Mode::EditingArtwork(form))
            }
            _ => Ok(Mode::EditingArtwork(form)),
        }
    }

    fn handle_edit_song(&mut self, code: KeyCode, mut form: SongEditForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Song unchanged.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => match self.save_song_edit(&form) {
                Ok(()) => return Ok(Mode::Normal),
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Up | KeyCode::BackTab => form.move_row(-1),
            KeyCode::Down | KeyCode::Tab => form.move_row(1),
            KeyCode::Left => form.adjust(-1),
            KeyCode::Right => form.adjust(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => {
                if !form.push_char(ch) && ch == '0' {
                    form.reset_field();
                }
            }
            _ => {}
        }
        Ok(Mode::EditingSong(form))
    }

    fn save_song_edit(&mut self, form: &SongEditForm) -> Result<()> {
        let song = form.parse()?;
        if !self.store.replace_song(song.clone()) {
            self.set_status("That song no longer exists.", StatusKind::Error);
            return Ok(());
        }
        self.store.set_levels(song.id, form.levels);
        info!(song = %song.id, "song edited");
        self.set_status(
            format!("Saved {}.", song.display_title()),
            StatusKind::Info,
        );
        Ok(())
    }

    fn handle_confirm_song_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmSongDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.delete_song(confirm.song.id);
                info!(song = %confirm.song.id, "song deleted");
                self.set_status(
                    format!("Deleted {}.", confirm.song.display_title()),
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmSongDelete(confirm)),
        }
    }

    fn handle_confirm_playlists_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmPlaylistsDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.delete_playlists(&confirm.ids);
                if self.grid.selecting {
                    self.grid.toggle_selecting();
                }
                info!(count = confirm.ids.len(), "playlists deleted");
                let noun = if confirm.ids.len() == 1 {
                    "playlist"
                } else {
                    "playlists"
                };
                self.set_status(
                    format!("Deleted {} {noun}.", confirm.ids.len()),
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmPlaylistsDelete(confirm)),
        }
    }

    fn save_new_playlist(&mut self, form: &PlaylistForm, song: Option<&Song>) -> Result<()> {
        let (name, artwork) = form.parse_inputs()?;
        let playlist = self.store.create_playlist(&name, artwork)?;
        info!(playlist = %playlist.id, name = %playlist.name, "playlist created");
        match song {
            Some(song) => {
                self.store.add_song_to_playlist(song, playlist.id);
                self.set_status(
                    format!("Created {} with {}.", playlist.name, song.title),
                    StatusKind::Info,
                );
            }
            None => self.set_status(format!("Created {}.", playlist.name), StatusKind::Info),
        }
        Ok(())
    }

    /// Drain store notifications and bring every cached view back in line.
    fn apply_store_events(&mut self) {
        let events = match self.pending_events.lock() {
            Ok(mut events) => mem::take(&mut *events),
            Err(poisoned) => mem::take(&mut *poisoned.into_inner()),
        };
        if events.is_empty() {
            return;
        }

        if events.iter().any(StoreEvent::touches_songs) {
            self.player.sync_with_library(&self.store);
            self.songs.refresh(&self.store);
            let recent = self.store.recently_added(self.recent_limit).len();
            self.home.clamp(recent);
        }
        self.playlists = self.store.playlists();
        self.grid.retain_existing(&self.playlists);

        if let Screen::PlaylistDetail(detail) = &mut self.screen {
            let id = detail.playlist.id;
            let affected = events.iter().any(|event| event.touches_playlist(id));
            if affected && !detail.refresh(&self.store) {
                self.screen = Screen::Playlists;
                self.set_status("That playlist was deleted.", StatusKind::Error);
            }
        }
    }

    fn play(&mut self, song: Song) {
        self.player.play(song);
        self.announce_now_playing();
    }

    fn announce_now_playing(&mut self) {
        if let Some(song) = self.player.now_playing() {
            let message = format!("Now playing {}.", song.display_title());
            self.set_status(message, StatusKind::Info);
        }
    }

    fn artwork_form(&self, playlist: &Playlist) -> ArtworkForm {
        match self.store.artwork(playlist.id) {
            Artwork::Custom(reference) => ArtworkForm::new(playlist, Some(&reference)),
            Artwork::Placeholder { .. } => ArtworkForm::new(playlist, None),
        }
    }

    fn switch_tab(&mut self, index: usize) {
        self.screen = match index {
            0 => Screen::Home,
            1 => Screen::Songs,
            _ => Screen::Playlists,
        };
        self.clear_status();
    }

    fn tab_index(&self) -> usize {
        match self.screen {
            Screen::Home => 0,
            Screen::Songs => 1,
            Screen::Playlists | Screen::PlaylistDetail(_) => 2,
        }
    }

    fn is_grid_selecting(&self) -> bool {
        matches!(self.screen, Screen::Playlists) && self.grid.selecting
    }

    fn current_playlist(&self) -> Option<&Playlist> {
        self.playlists.get(self.grid.selected)
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match &self.screen {
            Screen::Home => self.draw_home(frame, chunks[1]),
            Screen::Songs => self.draw_songs(frame, chunks[1]),
            Screen::Playlists => self.draw_playlist_grid(frame, chunks[1]),
            Screen::PlaylistDetail(detail) => self.draw_playlist_detail(frame, chunks[1], detail),
        }
        self.draw_player(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        match &self.mode {
            Mode::Normal => {}
            Mode::Searching(state) => self.draw_search_bar(frame, chunks[1], state),
            Mode::SongActions(state) => self.draw_song_actions(frame, area, state),
            Mode::PickingPlaylist(state) => self.draw_playlist_picker(frame, area, state),
            Mode::CreatingPlaylist { form, .. } => self.draw_playlist_form(frame, area, form),
            Mode::EditingArtwork(form) => self.draw_artwork_form(frame, area, form),
            Mode::EditingSong(form) => self.draw_song_form(frame, area, form),
            Mode::ConfirmSongDelete(confirm) => {
                let lines = vec![
                    Line::from(format!("Delete {}?", confirm.song.display_title())),
                    Line::from("It will also leave every playlist and the queue."),
                ];
                self.draw_confirm(frame, area, "Delete Song", lines);
            }
            Mode::ConfirmPlaylistsDelete(confirm) => {
                let mut lines = vec![Line::from(confirm.summary())];
                if confirm.names.len() > 1 {
                    lines.push(Line::from(confirm.names.join(", ")));
                }
                self.draw_confirm(frame, area, "Delete Playlists", lines);
            }
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(TAB_TITLES)
            .select(self.tab_index())
            .block(Block::default().borders(Borders::BOTTOM))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        let recent = self.store.recently_added(self.recent_limit);
        let recent_items: Vec<ListItem> = recent
            .iter()
            .map(|song| ListItem::new(song.display_title()))
            .collect();
        let selected = (!recent.is_empty()).then_some(self.home.selected);
        render_song_list(frame, columns[0], "Recently Added", recent_items, selected);

        let played: Vec<ListItem> = self
            .player
            .history()
            .filter_map(|id| self.store.song(*id))
            .map(|song| ListItem::new(song.display_title()))
            .collect();
        render_song_list(frame, columns[1], "Recently Played", played, None);

        let queued: Vec<ListItem> = self
            .store
            .queue()
            .enumerate()
            .map(|(index, song)| ListItem::new(format!("{}. {}", index + 1, song.display_title())))
            .collect();
        render_song_list(frame, columns[2], "Up Next", queued, None);
    }

    fn draw_songs(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.songs.filter {
            Some(query) => format!("Songs matching \"{query}\" ({})", self.songs.songs.len()),
            None => format!("Songs ({})", self.songs.songs.len()),
        };
        if self.songs.songs.is_empty() {
            let message = if self.songs.has_filter() {
                "No songs match this search."
            } else {
                "Your library is empty."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .songs
            .songs
            .iter()
            .map(|song| ListItem::new(song.display_title()))
            .collect();
        render_song_list(frame, area, &title, items, Some(self.songs.selected));
    }

    fn draw_playlist_grid(&self, frame: &mut Frame, area: Rect) {
        if self.playlists.is_empty() {
            let message = Paragraph::new("No playlists yet. Press '+' to create one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::NONE));
            frame.render_widget(message, area);
            return;
        }

        let rows = self.split_rows(area);
        for (row_idx, row_chunk) in rows.into_iter().enumerate() {
            let columns = split_columns(row_chunk);
            for (col_idx, column_chunk) in columns.into_iter().enumerate() {
                let index = row_idx * GRID_COLUMNS + col_idx;
                let Some(playlist) = self.playlists.get(index) else {
                    continue;
                };
                let is_selected = index == self.grid.selected;
                let title = if self.grid.selecting {
                    let mark = if self.grid.marked.contains(&playlist.id) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    format!("{mark} {}", playlist.name)
                } else {
                    playlist.name.clone()
                };
                let mut block = Block::default().borders(Borders::ALL).title(title);
                if is_selected {
                    block = block.style(Style::default().fg(Color::Yellow));
                }
                let artwork = self.store.artwork(playlist.id);
                let lines = build_playlist_cover_lines(
                    playlist,
                    &artwork,
                    column_chunk.width.saturating_sub(2),
                    column_chunk.height.saturating_sub(2),
                    is_selected,
                );
                let card = Paragraph::new(lines)
                    .alignment(Alignment::Left)
                    .block(block);
                frame.render_widget(card, column_chunk);
            }
        }
    }

    fn draw_playlist_detail(&self, frame: &mut Frame, area: Rect, detail: &PlaylistDetailScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let noun = if detail.playlist.count == 1 {
            "song"
        } else {
            "songs"
        };
        let mut header = vec![
            Span::styled(
                detail.playlist.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {} {noun}", detail.playlist.count)),
        ];
        if let Artwork::Custom(reference) = self.store.artwork(detail.playlist.id) {
            header.push(Span::styled(
                format!("  artwork: {reference}"),
                Style::default().fg(Color::Magenta),
            ));
        }
        if detail.shuffled {
            header.push(Span::styled("  (shuffled)", Style::default().fg(Color::Cyan)));
        }
        frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

        if detail.songs.is_empty() {
            let message = Paragraph::new("This playlist is empty. Add songs from the Songs tab.")
                .alignment(Alignment::Center);
            frame.render_widget(message, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = detail
            .songs
            .iter()
            .enumerate()
            .map(|(index, song)| ListItem::new(format!("{:>3}. {}", index + 1, song.display_title())))
            .collect();
        render_song_list(frame, chunks[1], "Songs", items, Some(detail.selected));
    }

    fn draw_player(&self, frame: &mut Frame, area: Rect) {
        let line = match self.player.now_playing() {
            Some(song) => {
                let icon = if self.player.is_playing() { "▶" } else { "⏸" };
                let speed = self.store.levels(song.id).format(LevelField::Speed);
                Line::from(vec![
                    Span::styled(format!(" {icon} "), Style::default().fg(Color::Green)),
                    Span::styled(
                        song.display_title(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("   {speed}   {} queued", self.store.queue_len()),
                        Style::default().fg(Color::Gray),
                    ),
                ])
            }
            None => Line::from(Span::styled(
                " Nothing playing",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Searching(_)) => &[("[↑↓]", "Select"), ("[Enter]", "Done"), ("[Esc]", "Clear")],
            (_, Mode::EditingSong(_)) => &[
                ("[↑↓]", "Field"),
                ("[←→]", "Preset/Adjust"),
                ("[0]", "Reset"),
                ("[Enter]", "Save"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::CreatingPlaylist { .. }) => {
                &[("[Tab]", "Next Field"), ("[Enter]", "Create"), ("[Esc]", "Cancel")]
            }
            (_, Mode::EditingArtwork(_)) => &[("[Enter]", "Save"), ("[Esc]", "Cancel")],
            (_, Mode::SongActions(_)) | (_, Mode::PickingPlaylist(_)) => {
                &[("[↑↓]", "Navigate"), ("[Enter]", "Choose"), ("[Esc]", "Cancel")]
            }
            (_, Mode::ConfirmSongDelete(_)) | (_, Mode::ConfirmPlaylistsDelete(_)) => {
                &[("[y]", "Confirm"), ("[n/Esc]", "Cancel")]
            }
            (Screen::Home, Mode::Normal) => &[
                ("[↑↓]", "Select"),
                ("[Enter]", "Play"),
                ("[a]", "Actions"),
                ("[n/b]", "Next/Prev"),
                ("[Space]", "Play/Pause"),
                ("[1-3]", "Tabs"),
                ("[q]", "Quit"),
            ],
            (Screen::Songs, Mode::Normal) => &[
                ("[↑↓]", "Select"),
                ("[Enter]", "Play"),
                ("[f]", "Search"),
                ("[a]", "Actions"),
                ("[n/b]", "Next/Prev"),
                ("[Space]", "Play/Pause"),
                ("[q]", "Quit"),
            ],
            (Screen::Playlists, Mode::Normal) if self.grid.selecting => &[
                ("[←↑↓→]", "Move"),
                ("[Space]", "Mark"),
                ("[-]", "Delete Marked"),
                ("[v/Esc]", "Done"),
            ],
            (Screen::Playlists, Mode::Normal) => &[
                ("[←↑↓→]", "Move"),
                ("[Enter]", "Open"),
                ("[+]", "New"),
                ("[-]", "Delete"),
                ("[v]", "Select"),
                ("[i]", "Artwork"),
                ("[q]", "Quit"),
            ],
            (Screen::PlaylistDetail(_), Mode::Normal) => &[
                ("[Enter]", "Play"),
                ("[a]", "Actions"),
                ("[r]", "Shuffle"),
                ("[o]", "Original Order"),
                ("[-]", "Remove"),
                ("[i]", "Artwork"),
                ("[Esc]", "Back"),
            ],
        };
        hint_line(hints)
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_song_actions(&self, frame: &mut Frame, area: Rect, state: &SongActionsState) {
        let items = SongAction::ALL
            .iter()
            .map(|action| ListItem::new(action.label()))
            .collect();
        let title = state.song.display_title();
        self.draw_menu(frame, area, &title, items, state.selected);
    }

    fn draw_playlist_picker(&self, frame: &mut Frame, area: Rect, state: &PlaylistPickerState) {
        let mut items: Vec<ListItem> = state
            .playlists
            .iter()
            .map(|playlist| ListItem::new(format!("{} ({})", playlist.name, playlist.count)))
            .collect();
        items.push(ListItem::new(Span::styled(
            "New playlist…",
            Style::default().fg(Color::Cyan),
        )));
        let title = format!("Add \"{}\" to", state.song.title);
        self.draw_menu(frame, area, &title, items, state.selected);
    }

    fn draw_menu(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: Vec<ListItem>,
        selected: usize,
    ) {
        let popup_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup_area);

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(selected));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_playlist_form(&self, frame: &mut Frame, area: Rect, form: &PlaylistForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("New Playlist").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(PlaylistField::Name),
            form.build_line(PlaylistField::Artwork),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        let (row, label) = match form.active {
            PlaylistField::Name => (0, "Name: "),
            PlaylistField::Artwork => (1, "Artwork: "),
        };
        let cursor_x = inner.x + (label.len() + form.value_len(form.active)) as u16;
        if inner.height > row {
            frame.set_cursor_position((cursor_x.min(inner.right()), inner.y + row));
        }
    }

    fn draw_artwork_form(&self, frame: &mut Frame, area: Rect, form: &ArtworkForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Artwork for {}", form.playlist_name))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line(),
            Line::from(""),
            Line::from(Span::styled(
                "Enter a file path or URI. Leave blank to use the placeholder.",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, form: &SongEditForm) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Edit: {}", form.song.display_title()))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = form.build_lines();
        if let Some(error) = &form.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(len) = form.text_len() {
            let (row, label) = if form.active == 0 {
                (0, "Song Name: ")
            } else {
                (1, "Artist: ")
            };
            let cursor_x = inner.x + (label.len() + len) as u16;
            if inner.height > row {
                frame.set_cursor_position((cursor_x.min(inner.right()), inner.y + row));
            }
        }
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, mut lines: Vec<Line>) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn split_rows(&self, area: Rect) -> Vec<Rect> {
        let row_count = self.playlists.len().div_ceil(GRID_COLUMNS).max(1) as u16;
        let percent = (100 / row_count).max(1);
        Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Percentage(percent); row_count as usize])
            .split(area)
            .to_vec()
    }
}

fn split_columns(area: Rect) -> Vec<Rect> {
    let percent = (100 / GRID_COLUMNS as u16).max(1);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(percent); GRID_COLUMNS])
        .split(area)
        .to_vec()
}

fn render_song_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    selected: Option<usize>,
) {
    let empty = items.is_empty();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string());
    if empty {
        let placeholder = Paragraph::new(Span::styled(
            "Nothing here yet.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    list_state.select(selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (index, (key, label)) in hints.iter().enumerate() {
        spans.push(Span::styled(key.to_string(), key_style));
        let separator = if index + 1 == hints.len() { "" } else { "   " };
        spans.push(Span::raw(format!(" {label}{separator}")));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use super::*;
    use crate::models::LevelPreset;
    use crate::seed::demo_catalog;

    fn app() -> App {
        let config = AppConfig {
            data_dir: PathBuf::from("unused"),
            catalog_path: None,
            log_level: None,
            recent_limit: 5,
        };
        App::new(LibraryStore::new(demo_catalog()), &config)
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn status_text(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    fn playlist_named<'a>(app: &'a App, name: &str) -> Option<&'a Playlist> {
        app.playlists.iter().find(|playlist| playlist.name == name)
    }

    #[test]
    fn starts_on_home_with_first_song_loaded() {
        let app = app();
        assert!(matches!(app.screen, Screen::Home));
        assert_eq!(
            app.player.now_playing().map(|song| song.title.as_str()),
            Some("Midnight Drive")
        );
    }

    #[test]
    fn q_quits_but_is_typed_while_searching() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('f')]);
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        assert_eq!(app.songs.filter.as_deref(), Some("q"));

        press(&mut app, &[KeyCode::Esc]);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn search_filters_and_escape_clears() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('f')]);
        type_text(&mut app, "night");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::Normal));
        let titles: Vec<&str> = app.songs.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Midnight Drive", "Night Market"]);

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.songs.songs.len(), 10);
    }

    #[test]
    fn create_playlist_rejects_blank_name_then_succeeds() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('+')]);
        type_text(&mut app, "   ");
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::CreatingPlaylist { .. }));
        assert_eq!(status_text(&app), "Playlist name is required.");

        type_text(&mut app, "Study");
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::Normal));
        let created = playlist_named(&app, "Study").unwrap();
        assert_eq!(created.count, 0);
    }

    #[test]
    fn picker_new_playlist_adds_song_immediately() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('a')]);
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::PickingPlaylist(_)));

        for _ in 0..10 {
            press(&mut app, &[KeyCode::Down]);
        }
        press(&mut app, &[KeyCode::Enter]);
        type_text(&mut app, "Fresh");
        press(&mut app, &[KeyCode::Enter]);

        let fresh = playlist_named(&app, "Fresh").unwrap().clone();
        assert_eq!(fresh.count, 1);
        assert_eq!(
            app.store.songs_in_playlist(fresh.id)[0].title,
            "Midnight Drive"
        );
    }

    #[test]
    fn deleting_playing_song_moves_player_on() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('a')]);
        for _ in 0..4 {
            press(&mut app, &[KeyCode::Down]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::ConfirmSongDelete(_)));
        press(&mut app, &[KeyCode::Char('y')]);

        assert_eq!(app.store.songs().len(), 9);
        assert_eq!(app.songs.songs.len(), 9);
        assert_eq!(
            app.player.now_playing().map(|song| song.title.as_str()),
            Some("Golden Hour")
        );
        let road_trip = playlist_named(&app, "Road Trip").unwrap();
        assert_eq!(road_trip.count, 4);
    }

    #[test]
    fn select_mode_deletes_marked_playlists() {
        let mut app = app();
        press(
            &mut app,
            &[
                KeyCode::Char('3'),
                KeyCode::Char('v'),
                KeyCode::Char(' '),
                KeyCode::Right,
                KeyCode::Char(' '),
                KeyCode::Char('-'),
            ],
        );
        let Mode::ConfirmPlaylistsDelete(confirm) = &app.mode else {
            panic!("expected delete confirmation");
        };
        assert_eq!(confirm.summary(), "Delete 2 playlists?");
        assert!(app.player.is_playing());

        press(&mut app, &[KeyCode::Char('y')]);
        assert_eq!(app.playlists.len(), 4);
        assert!(playlist_named(&app, "Gym Mix").is_none());
        assert!(playlist_named(&app, "Late Night").is_none());
        assert!(!app.grid.selecting);
    }

    #[test]
    fn space_toggles_playback_outside_select_mode() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(!app.player.is_playing());
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char(' ')]);
        assert!(app.player.is_playing());
    }

    #[test]
    fn shuffled_detail_refuses_removal_until_restored() {
        let mut app = app();
        press(
            &mut app,
            &[KeyCode::Char('3'), KeyCode::Right, KeyCode::Enter],
        );
        assert!(matches!(app.screen, Screen::PlaylistDetail(_)));

        press(&mut app, &[KeyCode::Char('r'), KeyCode::Char('-')]);
        assert!(status_text(&app).starts_with("Restore the original order"));
        assert_eq!(playlist_named(&app, "Late Night").unwrap().count, 4);

        press(&mut app, &[KeyCode::Char('o'), KeyCode::Char('-')]);
        assert_eq!(playlist_named(&app, "Late Night").unwrap().count, 3);
        let Screen::PlaylistDetail(detail) = &app.screen else {
            panic!("expected detail screen");
        };
        assert_eq!(detail.songs[0].title, "Night Market");
    }

    #[test]
    fn artwork_form_sets_and_clears() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Char('i')]);
        type_text(&mut app, "covers/gym.png");
        press(&mut app, &[KeyCode::Enter]);
        let gym = playlist_named(&app, "Gym Mix").unwrap().id;
        assert!(matches!(app.store.artwork(gym), Artwork::Custom(_)));

        press(&mut app, &[KeyCode::Char('i')]);
        for _ in 0.."covers/gym.png".len() {
            press(&mut app, &[KeyCode::Backspace]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.store.artwork(gym), Artwork::Placeholder { .. }));
        assert_eq!(status_text(&app), "Artwork cleared.");
    }

    #[test]
    fn queue_feeds_next() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('2'), KeyCode::End, KeyCode::Char('a')]);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.store.queue_len(), 1);

        press(&mut app, &[KeyCode::Char('n')]);
        assert_eq!(
            app.player.now_playing().map(|song| song.title.as_str()),
            Some("Rainy Streetlights")
        );
        assert_eq!(app.store.queue_len(), 0);
    }

    fn open_song_editor(app: &mut App) {
        press(app, &[KeyCode::Char('2'), KeyCode::Char('a')]);
        press(app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::EditingSong(_)));
    }

    #[test]
    fn song_editor_saves_level_adjustments() {
        let mut app = app();
        open_song_editor(&mut app);

        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        press(&mut app, &[KeyCode::Right, KeyCode::Right, KeyCode::Enter]);
        let first = app.store.songs()[0].id;
        assert!((app.store.levels(first).speed - 1.10).abs() < 1e-9);
    }

    #[test]
    fn song_editor_renames_without_touching_playlists_or_queue() {
        let mut app = app();
        let first = app.store.songs()[0].clone();
        app.store.add_to_queue(&first);
        let counts: Vec<usize> = app.playlists.iter().map(|playlist| playlist.count).collect();
        let song_count = app.store.songs().len();

        open_song_editor(&mut app);
        for _ in 0..first.title.len() {
            press(&mut app, &[KeyCode::Backspace]);
        }
        type_text(&mut app, "Renamed");
        press(&mut app, &[KeyCode::Down, KeyCode::Down, KeyCode::Right, KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::Normal));
        let edited = app.store.song(first.id).unwrap();
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.artist, first.artist);
        assert_eq!(app.store.levels(first.id), LevelPreset::Warm.levels());
        assert_eq!(app.songs.songs[0].title, "Renamed");
        assert_eq!(app.store.songs().len(), song_count);
        assert_eq!(
            app.playlists.iter().map(|playlist| playlist.count).collect::<Vec<_>>(),
            counts
        );
        assert_eq!(
            app.store.queue().next().map(|song| song.title.as_str()),
            Some(first.title.as_str())
        );
    }

    #[test]
    fn song_editor_rejects_blank_title() {
        let mut app = app();
        let first = app.store.songs()[0].clone();
        open_song_editor(&mut app);
        for _ in 0..first.title.len() {
            press(&mut app, &[KeyCode::Backspace]);
        }
        press(&mut app, &[KeyCode::Enter]);

        let Mode::EditingSong(form) = &app.mode else {
            panic!("expected the editor to stay open");
        };
        assert_eq!(form.error.as_deref(), Some("Song title is required."));
        assert_eq!(status_text(&app), "Song title is required.");
        assert_eq!(app.store.song(first.id).unwrap().title, first.title);
    }

    #[test]
    fn detail_returns_to_grid_when_its_playlist_is_deleted() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('3'), KeyCode::Enter]);
        let Screen::PlaylistDetail(detail) = &app.screen else {
            panic!("expected detail screen");
        };
        let id = detail.playlist.id;

        app.store.delete_playlists(&HashSet::from([id]));
        app.apply_store_events();
        assert!(matches!(app.screen, Screen::Playlists));
    }
}
