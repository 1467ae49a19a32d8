//! Domain models shared by the store, the seed loader, the player and the
//! TUI. These types stay light-weight data holders: all invariants around
//! membership and counts live in `store`, not here.

use std::fmt;

use uuid::Uuid;

/// Suffix appended to the title of a duplicated song.
pub const COPY_MARKER: &str = " Copy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifier of a library song. Freshly minted ids are random v4 UUIDs, so
/// they are never reused within a process.
pub struct SongId(Uuid);

impl SongId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifier of a playlist. Same minting rules as [`SongId`].
pub struct PlaylistId(Uuid);

impl PlaylistId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Deterministic seed used to pick placeholder artwork. Only derived from
    /// the id itself so the same playlist always renders the same cover.
    pub fn placeholder_seed(&self) -> u64 {
        let (high, low) = self.0.as_u64_pair();
        high ^ low
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A library song. Songs are replaced wholesale, never edited field by field.
pub struct Song {
    pub id: SongId,
    /// Title displayed in lists and in the mini-player.
    pub title: String,
    pub artist: String,
}

impl Song {
    /// Build a song with a freshly minted id.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: SongId::new(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Compose a `Title - Artist` string that omits the hyphen if the artist
    /// is blank.
    pub fn display_title(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }

    /// Case-insensitive match on title or artist. `needle` must already be
    /// lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.artist.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Read-only snapshot of a playlist. `count` is computed from the membership
/// list every time a snapshot is taken, so it can never drift from it.
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub count: usize,
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opaque reference to an image supplied by whatever picked it (a path, a
/// URI). No format validation happens anywhere in the crate.
pub struct ArtworkRef(String);

impl ArtworkRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtworkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Resolved artwork for a playlist.
pub enum Artwork {
    Custom(ArtworkRef),
    /// Stand-in derived from the playlist id; never stored.
    Placeholder { seed: u64 },
}

/// Inclusive bounds and step for one adjustable level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl LevelRange {
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

pub const SPEED_RANGE: LevelRange = LevelRange {
    min: 0.25,
    max: 4.0,
    step: 0.05,
};
pub const REVERB_RANGE: LevelRange = LevelRange {
    min: 0.0,
    max: 1.0,
    step: 0.05,
};
pub const EQ_RANGE: LevelRange = LevelRange {
    min: -12.0,
    max: 12.0,
    step: 1.0,
};

/// The adjustable parameters exposed by the levels editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelField {
    Speed,
    Reverb,
    Bass,
    Mid,
    Treble,
}

impl LevelField {
    pub const ALL: [LevelField; 5] = [
        LevelField::Speed,
        LevelField::Reverb,
        LevelField::Bass,
        LevelField::Mid,
        LevelField::Treble,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LevelField::Speed => "Speed",
            LevelField::Reverb => "Reverb",
            LevelField::Bass => "Bass",
            LevelField::Mid => "Mid",
            LevelField::Treble => "Treble",
        }
    }

    pub fn range(&self) -> LevelRange {
        match self {
            LevelField::Speed => SPEED_RANGE,
            LevelField::Reverb => REVERB_RANGE,
            LevelField::Bass | LevelField::Mid | LevelField::Treble => EQ_RANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Per-song playback levels. Values outside their range are clamped on every
/// write so a stored `Levels` is always valid.
pub struct Levels {
    pub speed: f64,
    pub reverb: f64,
    pub bass: f64,
    pub mid: f64,
    pub treble: f64,
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            speed: 1.0,
            reverb: 0.0,
            bass: 0.0,
            mid: 0.0,
            treble: 0.0,
        }
    }
}

impl Levels {
    pub fn get(&self, field: LevelField) -> f64 {
        match field {
            LevelField::Speed => self.speed,
            LevelField::Reverb => self.reverb,
            LevelField::Bass => self.bass,
            LevelField::Mid => self.mid,
            LevelField::Treble => self.treble,
        }
    }

    pub fn set(&mut self, field: LevelField, value: f64) {
        let value = field.range().clamp(value);
        match field {
            LevelField::Speed => self.speed = value,
            LevelField::Reverb => self.reverb = value,
            LevelField::Bass => self.bass = value,
            LevelField::Mid => self.mid = value,
            LevelField::Treble => self.treble = value,
        }
    }

    /// Move a field by `steps` increments of its range step.
    pub fn nudge(&mut self, field: LevelField, steps: i32) {
        let range = field.range();
        let raw = self.get(field) + range.step * f64::from(steps);
        // Snap to the step grid.
        let snapped = (raw / range.step).round() * range.step;
        self.set(field, snapped);
    }

    /// Copy with every field clamped into its range.
    pub fn clamped(mut self) -> Self {
        for field in LevelField::ALL {
            let value = self.get(field);
            self.set(field, value);
        }
        self
    }

    pub fn format(&self, field: LevelField) -> String {
        let value = self.get(field);
        match field {
            LevelField::Speed => format!("{value:.2}x"),
            LevelField::Reverb => format!("{:.0}%", value * 100.0),
            LevelField::Bass | LevelField::Mid | LevelField::Treble => format!("{value:+.0} dB"),
        }
    }
}

/// Named starting points for the levels editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPreset {
    Default,
    Warm,
    BassBoost,
    LoFi,
    VocalClarity,
}

impl LevelPreset {
    pub const ALL: [LevelPreset; 5] = [
        LevelPreset::Default,
        LevelPreset::Warm,
        LevelPreset::BassBoost,
        LevelPreset::LoFi,
        LevelPreset::VocalClarity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LevelPreset::Default => "Default",
            LevelPreset::Warm => "Warm",
            LevelPreset::BassBoost => "Bass Boost",
            LevelPreset::LoFi => "Lo-Fi",
            LevelPreset::VocalClarity => "Vocal Clarity",
        }
    }

    pub fn levels(&self) -> Levels {
        match self {
            LevelPreset::Default => Levels::default(),
            LevelPreset::Warm => Levels {
                reverb: 0.15,
                bass: 3.0,
                mid: 1.0,
                treble: -2.0,
                ..Levels::default()
            },
            LevelPreset::BassBoost => Levels {
                bass: 6.0,
                treble: -1.0,
                ..Levels::default()
            },
            LevelPreset::LoFi => Levels {
                speed: 0.9,
                reverb: 0.3,
                bass: 2.0,
                treble: -6.0,
                ..Levels::default()
            },
            LevelPreset::VocalClarity => Levels {
                bass: -2.0,
                mid: 4.0,
                treble: 2.0,
                ..Levels::default()
            },
        }
    }
}
