use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::models::{LanguageFacet, LyricsBlock, SectionKind};
use crate::offline::AssetResponse;
use crate::viewer::FontSize;

/// Chorus lines are pushed right so they stand apart from verses.
const CHORUS_INDENT: &str = "    ";
/// From this size on lyrics render bold.
const BOLD_FROM: u16 = 26;
/// From this size on every lyric line is followed by a blank line.
const DOUBLE_SPACED_FROM: u16 = 32;
/// At or below this size lyrics render dimmed.
const DIM_UP_TO: u16 = 14;

/// Style for one section type at the given size.
pub(crate) fn lyrics_style(kind: SectionKind, size: FontSize) -> Style {
    let mut style = match kind {
        SectionKind::Chorus => Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::ITALIC),
        SectionKind::Verse | SectionKind::Other => Style::default(),
    };
    if size.points() >= BOLD_FROM {
        style = style.add_modifier(Modifier::BOLD);
    } else if size.points() <= DIM_UP_TO {
        style = style.add_modifier(Modifier::DIM);
    }
    style
}

/// Paint lyric blocks as terminal lines. Blocks are separated by one blank
/// line and larger sizes double the line spacing.
pub(crate) fn build_lyrics_lines(blocks: &[LyricsBlock], size: FontSize) -> Vec<Line<'static>> {
    let double_spaced = size.points() >= DOUBLE_SPACED_FROM;
    let mut lines = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        let style = lyrics_style(block.kind, size);
        let indent = if block.kind == SectionKind::Chorus {
            CHORUS_INDENT
        } else {
            ""
        };
        for text in &block.lines {
            lines.push(Line::from(Span::styled(format!("{indent}{text}"), style)));
            if double_spaced {
                lines.push(Line::from(""));
            }
        }
    }

    lines
}

/// Render the language facets as a row of chips, highlighting the active one.
pub(crate) fn facet_chips(facets: &[LanguageFacet], active: &LanguageFacet) -> Line<'static> {
    let mut spans = vec![Span::raw("Language: ")];
    for facet in facets {
        let label = format!(" {facet} ");
        if facet == active {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::Gray)));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// One of the companion mobile apps listed in the About popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MobileApp {
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) link: &'static str,
}

/// Apps listed in the About popup, opened with the number keys `1` and `2`.
pub(crate) const MOBILE_APPS: &[MobileApp] = &[
    MobileApp {
        name: "HymnConnect",
        description: "The core HymnConnect experience with powerful search and offline access.",
        link: "https://apps.apple.com/in/app/hymnconnectapp/id6752904013",
    },
    MobileApp {
        name: "HymnConnect PRO",
        description: "Playlists, slideshow mode and priority updates for worship leaders and teams.",
        link: "https://apps.apple.com/in/app/hymnconnect-pro/id6754710563",
    },
];

/// App selected by a number key, counting from `1`.
pub(crate) fn mobile_app_for_key(ch: char) -> Option<&'static MobileApp> {
    ch.to_digit(10)
        .and_then(|digit| (digit as usize).checked_sub(1))
        .and_then(|index| MOBILE_APPS.get(index))
}

/// What the About popup shows, taken from the web app manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AboutInfo {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) offline: bool,
}

pub(crate) fn parse_manifest(response: &AssetResponse) -> AboutInfo {
    if response.is_offline_placeholder() {
        return AboutInfo {
            name: "Hymnal".to_string(),
            description: response.text(),
            offline: true,
        };
    }

    let manifest: Value = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
    let field = |name: &str| {
        manifest
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    AboutInfo {
        name: field("name")
            .or_else(|| field("short_name"))
            .unwrap_or_else(|| "Hymnal".to_string()),
        description: field("description").unwrap_or_default(),
        offline: false,
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::section;
    use crate::offline::ResponseKind;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn blocks_are_separated_and_chorus_is_indented() {
        let blocks = section(Some("[Verse]\nLine A\nLine B\n[Chorus]\nLine C"));
        let lines = build_lyrics_lines(&blocks, FontSize::default());
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["Line A", "Line B", "", "    Line C"]);
    }

    #[test]
    fn large_sizes_double_space_and_embolden() {
        let blocks = section(Some("One\nTwo"));
        let size = FontSize::new(FontSize::MAX);
        let lines = build_lyrics_lines(&blocks, size);
        assert_eq!(lines.len(), 4);
        assert!(lyrics_style(SectionKind::Verse, size)
            .add_modifier
            .contains(Modifier::BOLD));
        assert!(lyrics_style(SectionKind::Verse, FontSize::new(FontSize::MIN))
            .add_modifier
            .contains(Modifier::DIM));
    }

    #[test]
    fn manifest_fields_feed_the_about_popup() {
        let response = AssetResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: br#"{"short_name":"Hymns","description":"Songs of praise"}"#.to_vec(),
            kind: ResponseKind::Basic,
        };
        let info = parse_manifest(&response);
        assert_eq!(info.name, "Hymns");
        assert_eq!(info.description, "Songs of praise");
        assert!(!info.offline);
    }

    #[test]
    fn offline_placeholder_is_reported() {
        let info = parse_manifest(&AssetResponse::offline());
        assert!(info.offline);
        assert_eq!(info.description, crate::offline::OFFLINE_MESSAGE);
    }

    #[test]
    fn number_keys_pick_mobile_apps() {
        assert_eq!(mobile_app_for_key('1').unwrap().name, "HymnConnect");
        assert_eq!(mobile_app_for_key('2').unwrap().name, "HymnConnect PRO");
        assert!(mobile_app_for_key('0').is_none());
        assert!(mobile_app_for_key('3').is_none());
        assert!(mobile_app_for_key('x').is_none());
    }

    #[test]
    fn active_chip_is_highlighted() {
        let facets = vec![LanguageFacet::All, LanguageFacet::Named("English".into())];
        let line = facet_chips(&facets, &facets[1]);
        let english = line
            .spans
            .iter()
            .find(|span| span.content.as_ref() == " English ")
            .unwrap();
        assert_eq!(english.style.bg, Some(Color::Cyan));
    }
}
