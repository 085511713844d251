//! Split raw lyric text into verse and chorus blocks for styling.
//!
//! Lyrics arrive as plain multi-line text with optional marker lines such as
//! `[Chorus]` or `[Verse 2]`. Markers only switch the section type of the lines
//! that follow; they are never rendered.

use crate::models::{LyricsBlock, SectionKind};

/// Section type assumed before the first marker.
pub const DEFAULT_SECTION: SectionKind = SectionKind::Verse;

/// Turn raw lyric text into maximal, ordered blocks.
///
/// `None` or empty input yields no blocks. Consecutive lines of the same type
/// always land in one block, even when a redundant marker (a `[verse]` while
/// already in a verse) sits between them.
pub fn section(raw: Option<&str>) -> Vec<LyricsBlock> {
    let text = match raw {
        Some(text) if !text.is_empty() => text,
        _ => return Vec::new(),
    };

    let mut blocks: Vec<LyricsBlock> = Vec::new();
    let mut current = DEFAULT_SECTION;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(kind) = marker_kind(line) {
            current = kind;
            continue;
        }

        if blocks.last().map(|block| block.kind) != Some(current) {
            blocks.push(LyricsBlock::new(current));
        }
        if let Some(block) = blocks.last_mut() {
            block.lines.push(line.to_string());
        }
    }

    blocks
}

/// Recognize a marker line, returning the section type it switches to.
fn marker_kind(line: &str) -> Option<SectionKind> {
    let lower = line.trim().to_lowercase();
    if lower.starts_with("[chorus") {
        Some(SectionKind::Chorus)
    } else if lower.starts_with("[verse") {
        Some(SectionKind::Verse)
    } else {
        None
    }
}

/// Join the lines of every block back into marker-free text.
pub fn render_plain(blocks: &[LyricsBlock]) -> String {
    blocks
        .iter()
        .flat_map(|block| block.lines.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: SectionKind, lines: &[&str]) -> LyricsBlock {
        LyricsBlock {
            kind,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn empty_or_missing_text_has_no_blocks() {
        assert!(section(None).is_empty());
        assert!(section(Some("")).is_empty());
    }

    #[test]
    fn verse_chorus_verse_scenario() {
        let blocks = section(Some(
            "[Verse]\nLine A\nLine B\n[Chorus]\nLine C\n[Verse]\nLine D",
        ));
        assert_eq!(
            blocks,
            vec![
                block(SectionKind::Verse, &["Line A", "Line B"]),
                block(SectionKind::Chorus, &["Line C"]),
                block(SectionKind::Verse, &["Line D"]),
            ]
        );
    }

    #[test]
    fn unmarked_text_is_one_default_block() {
        let raw = "Amazing grace\n  how sweet the sound\n\nthat saved a wretch";
        let blocks = section(Some(raw));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, DEFAULT_SECTION);
        assert_eq!(
            blocks[0].lines,
            raw.split('\n').map(str::to_string).collect::<Vec<_>>()
        );
    }

    #[test]
    fn redundant_markers_do_not_split_blocks() {
        let blocks = section(Some("[verse 1]\nOne\n[Verse 2]\nTwo\n[CHORUS]\nC1\n[chorus]\nC2"));
        assert_eq!(
            blocks,
            vec![
                block(SectionKind::Verse, &["One", "Two"]),
                block(SectionKind::Chorus, &["C1", "C2"]),
            ]
        );
    }

    #[test]
    fn crlf_endings_and_blank_lines_are_preserved() {
        let blocks = section(Some("A\r\n\r\n  [Chorus]  \r\nB\r\n"));
        assert_eq!(
            blocks,
            vec![
                block(SectionKind::Verse, &["A", ""]),
                block(SectionKind::Chorus, &["B", ""]),
            ]
        );
    }

    #[test]
    fn leading_marker_produces_no_empty_block() {
        let blocks = section(Some("[Chorus]\nOnly chorus"));
        assert_eq!(blocks, vec![block(SectionKind::Chorus, &["Only chorus"])]);
    }

    #[test]
    fn lines_are_kept_untrimmed() {
        let blocks = section(Some("   indented\t"));
        assert_eq!(blocks[0].lines, vec!["   indented\t".to_string()]);
    }

    #[test]
    fn content_is_preserved_without_markers() {
        let raw = "[Verse]\nA\n\nB\n[Chorus]\nC\n[Verse 2]\nD\n[chorus]\nE";
        let expected: Vec<&str> = raw
            .split('\n')
            .filter(|line| marker_kind(line).is_none())
            .collect();
        let rendered = render_plain(&section(Some(raw)));
        assert_eq!(rendered.split('\n').collect::<Vec<_>>(), expected);
    }

    #[test]
    fn sectioning_marker_free_output_is_stable() {
        let raw = "first\nsecond\n\nthird";
        let once = section(Some(raw));
        let twice = section(Some(render_plain(&once).as_str()));
        assert_eq!(once, twice);
    }

    #[test]
    fn bracketed_text_that_is_not_a_marker_is_content() {
        let blocks = section(Some("[Bridge]\nHallelujah"));
        assert_eq!(
            blocks,
            vec![block(SectionKind::Verse, &["[Bridge]", "Hallelujah"])]
        );
    }
}
