//! Domain models shared by the projector, the filter engine, and the TUI. The
//! intent is that these types stay light-weight data holders: they are rebuilt
//! wholesale from every store snapshot and never mutated in place afterwards.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// In-memory representation of a hymn after projection from a raw store record.
pub struct Song {
    /// Storage key the record was read from. Kept so duplicate-id resolution can
    /// be traced back to the offending records.
    pub key: String,
    /// Canonical display and sort key. Usually the hymn number, but nothing
    /// guarantees it is numeric.
    pub id: String,
    /// Plain-language title, empty when the record has none.
    pub title: String,
    /// Title actually rendered in lists and the detail header.
    pub display_title: String,
    /// Title in the hymn's own script, falling back to `display_title`.
    pub native_title: String,
    /// Free-form language tag. An empty string means "unfiltered".
    pub language: String,
    /// Raw lyric text including any inline section markers.
    pub lyrics: String,
}

impl Song {
    /// Compose the `id. Title` label used by the list and the detail header.
    pub fn heading(&self) -> String {
        if self.display_title.trim().is_empty() {
            self.id.clone()
        } else {
            format!("{}. {}", self.id, self.display_title)
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Section type a run of lyric lines belongs to.
pub enum SectionKind {
    Verse,
    Chorus,
    /// Unmarked text. The sectioner starts in `Verse`, so this only appears when
    /// blocks are built by hand.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A maximal run of lyric lines sharing one section type.
pub struct LyricsBlock {
    pub kind: SectionKind,
    /// Lines in original (untrimmed) form. Blank lines are kept as empty strings.
    pub lines: Vec<String>,
}

impl LyricsBlock {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Language facet selected in the filter bar.
pub enum LanguageFacet {
    /// Pass every song regardless of its language tag.
    #[default]
    All,
    /// A configured language name such as `English`.
    Named(String),
}

impl LanguageFacet {
    /// Parse a facet name typed on the command line. `All` (any case) and the
    /// empty string map to the unfiltered facet.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            LanguageFacet::All
        } else {
            LanguageFacet::Named(trimmed.to_string())
        }
    }
}

impl fmt::Display for LanguageFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageFacet::All => write!(f, "All"),
            LanguageFacet::Named(name) => write!(f, "{name}"),
        }
    }
}
