//! Selection and display state for the viewer.
//!
//! Everything here is a synchronous reaction to one event: a key press or a
//! store snapshot. Snapshots replace the catalog wholesale.

use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::project;
use crate::lyrics::section;
use crate::models::{LanguageFacet, LyricsBlock, Song};
use crate::search::{filter, LanguageAliases};
use crate::store::Snapshot;

/// Shown in place of the list when the catalog subscription fails.
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load songs. Please try again later.";

/// Lyrics size in points, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSize(u16);

impl FontSize {
    pub const MIN: u16 = 12;
    pub const MAX: u16 = 40;
    pub const DEFAULT: u16 = 18;
    pub const STEP: u16 = 2;

    pub fn new(points: u16) -> Self {
        Self(points.clamp(Self::MIN, Self::MAX))
    }

    pub fn points(&self) -> u16 {
        self.0
    }

    pub fn increase(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    pub fn decrease(self) -> Self {
        Self::new(self.0.saturating_sub(Self::STEP))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub facet: LanguageFacet,
    pub font_size: FontSize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Viewing(Song),
}

pub struct Viewer {
    catalog: Vec<Song>,
    aliases: LanguageAliases,
    filter: FilterState,
    selection: Selection,
    load_error: Option<String>,
    visitor_count: Option<u64>,
}

impl Viewer {
    pub fn new(aliases: LanguageAliases) -> Self {
        Self {
            catalog: Vec::new(),
            aliases,
            filter: FilterState::default(),
            selection: Selection::None,
            load_error: None,
            visitor_count: None,
        }
    }

    /// Replace the catalog with a fresh `songs` snapshot.
    ///
    /// The open song is swapped for its refreshed record when its id survives;
    /// otherwise the viewer falls back to the list.
    pub fn apply_catalog(&mut self, snapshot: Snapshot) {
        match snapshot {
            Ok(value) => {
                self.catalog = project(value.as_ref());
                self.load_error = None;
            }
            Err(err) => {
                warn!(error = %err, "song subscription failed");
                self.catalog.clear();
                self.load_error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        debug!(songs = self.catalog.len(), "catalog replaced");

        let open_id = self.current_song().map(|song| song.id.clone());
        if let Some(id) = open_id {
            self.selection = match self.catalog.iter().find(|song| song.id == id) {
                Some(song) => Selection::Viewing(song.clone()),
                None => Selection::None,
            };
        }
    }

    /// Record the latest `stats/visits` value. Anything but a non-negative
    /// integer is ignored.
    pub fn apply_visits(&mut self, snapshot: Snapshot) {
        match snapshot {
            Ok(Some(Value::Number(number))) => {
                if let Some(count) = number.as_u64() {
                    self.visitor_count = Some(count);
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "visit counter subscription failed"),
        }
    }

    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    pub fn aliases(&self) -> &LanguageAliases {
        &self.aliases
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn visitor_count(&self) -> Option<u64> {
        self.visitor_count
    }

    /// Songs passing the current search text and language facet.
    pub fn visible(&self) -> Vec<&Song> {
        filter(
            &self.catalog,
            &self.filter.search_text,
            &self.filter.facet,
            &self.aliases,
        )
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_song(&self) -> Option<&Song> {
        match &self.selection {
            Selection::Viewing(song) => Some(song),
            Selection::None => None,
        }
    }

    /// Open the song with `id`, replacing any song already open. Unknown ids
    /// leave the selection untouched.
    pub fn select(&mut self, id: &str) -> bool {
        match self.catalog.iter().find(|song| song.id == id) {
            Some(song) => {
                self.selection = Selection::Viewing(song.clone());
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) {
        self.selection = Selection::None;
    }

    /// Lyrics of the open song split into blocks, recomputed on every call.
    pub fn current_blocks(&self) -> Vec<LyricsBlock> {
        self.current_song()
            .map(|song| section(Some(song.lyrics.as_str())))
            .unwrap_or_default()
    }

    pub fn set_search<S: Into<String>>(&mut self, text: S) {
        self.filter.search_text = text.into();
    }

    pub fn clear_search(&mut self) {
        self.filter.search_text.clear();
    }

    pub fn set_facet(&mut self, facet: LanguageFacet) {
        self.filter.facet = facet;
    }

    pub fn cycle_facet(&mut self) -> &LanguageFacet {
        self.filter.facet = self.filter.facet.cycle(&self.aliases);
        &self.filter.facet
    }

    pub fn increase_font(&mut self) -> FontSize {
        self.filter.font_size = self.filter.font_size.increase();
        self.filter.font_size
    }

    pub fn decrease_font(&mut self) -> FontSize {
        self.filter.font_size = self.filter.font_size.decrease();
        self.filter.font_size
    }
}
