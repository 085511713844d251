use std::mem;

use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::models::Song;
use crate::offline::{AssetRequest, Network, OfflineCache};
use crate::store::Subscription;
use crate::viewer::Viewer;

use super::helpers::{
    build_lyrics_lines, centered_rect, facet_chips, mobile_app_for_key, parse_manifest, AboutInfo,
    MOBILE_APPS,
};

/// Footer space reserved for status, instructions, and the visitor count.
const FOOTER_HEIGHT: u16 = 4;
/// Search box height: query line plus facet chips inside a border.
const SEARCH_HEIGHT: u16 = 4;
/// Rows skipped by PageUp/PageDown.
const PAGE: isize = 10;
/// Manifest asset read for the About popup.
const MANIFEST_ASSET: &str = "/manifest.json";

/// Fine-grained modes layered over the list or song view.
enum Mode {
    Normal,
    Searching(SearchState),
    About(AboutInfo),
}

/// State for an active inline search.
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
pub struct App<N: Network> {
    viewer: Viewer,
    songs: Subscription,
    visits: Subscription,
    assets: OfflineCache<N>,
    origin: String,
    cursor: usize,
    lyrics_scroll: u16,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<N: Network> App<N> {
    pub fn new(
        viewer: Viewer,
        songs: Subscription,
        visits: Subscription,
        assets: OfflineCache<N>,
        origin: String,
    ) -> Self {
        let mut app = Self {
            viewer,
            songs,
            visits,
            assets,
            origin,
            cursor: 0,
            lyrics_scroll: 0,
            mode: Mode::Normal,
            status: None,
        };
        app.poll_store();
        app
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Apply every snapshot the store pushed since the last tick.
    pub fn poll_store(&mut self) {
        for snapshot in self.songs.drain() {
            self.viewer.apply_catalog(snapshot);
        }
        for snapshot in self.visits.drain() {
            self.viewer.apply_visits(snapshot);
        }
        if self.viewer.current_song().is_none() {
            self.lyrics_scroll = 0;
        }
        self.clamp_cursor();
    }

    /// Stop listening to the store. Safe to call more than once.
    pub fn shutdown(&self) {
        self.songs.dispose();
        self.visits.dispose();
    }

    /// Process one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::About(about) => self.handle_about(code, about),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        if self.viewer.current_song().is_some() {
            return self.handle_song_key(code, exit);
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE),
            KeyCode::PageDown => self.move_cursor(PAGE),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.visible_len().saturating_sub(1),
            KeyCode::Enter => self.open_at_cursor(),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.clear_status();
                return Mode::Searching(SearchState {
                    query: self.viewer.filter_state().search_text.clone(),
                });
            }
            KeyCode::Tab | KeyCode::Char('l') => {
                let facet = self.viewer.cycle_facet().clone();
                self.cursor = 0;
                self.set_status(format!("Showing {facet} songs."), StatusKind::Info);
            }
            KeyCode::Char('x') => {
                self.viewer.clear_search();
                self.cursor = 0;
                self.clear_status();
            }
            KeyCode::Char('a') => return Mode::About(self.load_about()),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_song_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.viewer.back();
                self.lyrics_scroll = 0;
                self.clear_status();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let size = self.viewer.increase_font();
                self.set_status(format!("Lyrics size {}pt.", size.points()), StatusKind::Info);
            }
            KeyCode::Char('-') => {
                let size = self.viewer.decrease_font();
                self.set_status(format!("Lyrics size {}pt.", size.points()), StatusKind::Info);
            }
            KeyCode::Up => self.lyrics_scroll = self.lyrics_scroll.saturating_sub(1),
            KeyCode::Down => self.lyrics_scroll = self.lyrics_scroll.saturating_add(1),
            KeyCode::PageUp => self.lyrics_scroll = self.lyrics_scroll.saturating_sub(PAGE as u16),
            KeyCode::PageDown => self.lyrics_scroll = self.lyrics_scroll.saturating_add(PAGE as u16),
            KeyCode::Home => self.lyrics_scroll = 0,
            KeyCode::Left => self.open_relative(-1),
            KeyCode::Right => self.open_relative(1),
            KeyCode::Char('a') => return Mode::About(self.load_about()),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.viewer.clear_search();
                self.cursor = 0;
                return Mode::Normal;
            }
            KeyCode::Enter => {
                self.open_at_cursor();
                return Mode::Normal;
            }
            KeyCode::Up => {
                self.move_cursor(-1);
                return Mode::Searching(state);
            }
            KeyCode::Down => {
                self.move_cursor(1);
                return Mode::Searching(state);
            }
            KeyCode::PageUp => {
                self.move_cursor(-PAGE);
                return Mode::Searching(state);
            }
            KeyCode::PageDown => {
                self.move_cursor(PAGE);
                return Mode::Searching(state);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Searching(state),
        }

        self.viewer.set_search(state.query.clone());
        self.cursor = 0;
        Mode::Searching(state)
    }

    fn handle_about(&mut self, code: KeyCode, about: AboutInfo) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('a') | KeyCode::Char('q') => Mode::Normal,
            KeyCode::Enter | KeyCode::Char('o') => {
                let link = self.mobile_apps_link();
                self.open_external(&link);
                Mode::Normal
            }
            KeyCode::Char(ch) => match mobile_app_for_key(ch) {
                Some(app) => {
                    self.open_external(app.link);
                    Mode::Normal
                }
                None => Mode::About(about),
            },
            _ => Mode::About(about),
        }
    }

    fn open_external(&mut self, link: &str) {
        match open_link(link) {
            Ok(()) => self.set_status(format!("Opened {link}."), StatusKind::Info),
            Err(err) => self.set_status(format!("Failed to open link: {err}"), StatusKind::Error),
        }
    }

    fn load_about(&self) -> AboutInfo {
        let response = self.assets.fetch(&AssetRequest::get(MANIFEST_ASSET));
        parse_manifest(&response)
    }

    fn mobile_apps_link(&self) -> String {
        format!("{}/mobile-apps", self.origin.trim_end_matches('/'))
    }

    fn visible_len(&self) -> usize {
        self.viewer.visible().len()
    }

    fn move_cursor(&mut self, offset: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as isize + offset).clamp(0, len as isize - 1);
        self.cursor = next as usize;
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn open_at_cursor(&mut self) {
        let id = self
            .viewer
            .visible()
            .get(self.cursor)
            .map(|song| song.id.clone());
        match id {
            Some(id) => {
                self.viewer.select(&id);
                self.lyrics_scroll = 0;
                self.clear_status();
                info!(id = %id, "song opened");
            }
            None => self.set_status("No song selected.", StatusKind::Error),
        }
    }

    /// Jump to the previous or next song in the visible list without going
    /// back to it first.
    fn open_relative(&mut self, offset: isize) {
        let target = {
            let visible = self.viewer.visible();
            let current = self.viewer.current_song().map(|song| song.id.as_str());
            let position = visible.iter().position(|song| Some(song.id.as_str()) == current);
            match position {
                Some(index) => {
                    let next = index as isize + offset;
                    if next < 0 || next >= visible.len() as isize {
                        None
                    } else {
                        Some((next as usize, visible[next as usize].id.clone()))
                    }
                }
                None => None,
            }
        };

        match target {
            Some((index, id)) => {
                self.viewer.select(&id);
                self.cursor = index;
                self.lyrics_scroll = 0;
                self.clear_status();
            }
            None => self.set_status("No more songs in this direction.", StatusKind::Error),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let (content_area, footer_area) = split_footer(area);

        match self.viewer.current_song() {
            Some(song) => self.draw_song(frame, content_area, song),
            None => self.draw_list(frame, content_area),
        }

        if let Some(footer_area) = footer_area {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::About(about) = &self.mode {
            self.draw_about(frame, area, about);
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SEARCH_HEIGHT), Constraint::Min(0)])
            .split(area);

        let filter = self.viewer.filter_state();
        let block = Block::default().borders(Borders::ALL).title("Hymnal");
        let search_line = Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(filter.search_text.clone()),
        ]);
        let chips = facet_chips(&self.viewer.aliases().facets(), &filter.facet);
        frame.render_widget(
            Paragraph::new(vec![search_line, chips]).block(block.clone()),
            chunks[0],
        );

        if let Mode::Searching(state) = &self.mode {
            let inner = block.inner(chunks[0]);
            let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
            frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
        }

        if let Some(message) = self.viewer.load_error() {
            let paragraph = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, chunks[1]);
            return;
        }

        let visible = self.viewer.visible();
        if visible.is_empty() {
            let message = if self.viewer.catalog().is_empty() {
                "No songs yet. Run `hymnal-viewer import <file>` to load a catalog."
            } else {
                "No songs found. Try a different search."
            };
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = visible
            .iter()
            .map(|song| ListItem::new(song.heading()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Songs ({})", visible.len())),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_song(&self, frame: &mut Frame, area: Rect, song: &Song) {
        let size = self.viewer.filter_state().font_size;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(song.heading())
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if song.native_title != song.display_title {
            lines.push(Line::from(Span::styled(
                song.native_title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }

        let blocks = self.viewer.current_blocks();
        if blocks.is_empty() {
            lines.push(Line::from(Span::styled(
                "No lyrics available.",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(build_lyrics_lines(&blocks, size));
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.lyrics_scroll, 0));
        frame.render_widget(paragraph, inner);
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

        let visitors = match self.viewer.visitor_count() {
            Some(count) => format!("Visitors: {count}"),
            None => "Visitors: -".to_string(),
        };
        let visitors_line = Line::from(Span::styled(visitors, Style::default().fg(Color::DarkGray)));

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions(), visitors_line])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let pairs: &[(&str, &str)] = match (&self.mode, self.viewer.current_song()) {
            (Mode::About(_), _) => &[
                ("[1/2]", " App Store   "),
                ("[Enter]", " Mobile apps page   "),
                ("[Esc]", " Close"),
            ],
            (Mode::Searching(_), _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[Esc]", " Clear search"),
            ],
            (Mode::Normal, Some(_)) => &[
                ("[+/-]", " Size   "),
                ("[←→]", " Prev/Next   "),
                ("[↑↓]", " Scroll   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, None) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[/]", " Search   "),
                ("[Tab]", " Language   "),
                ("[a]", " About   "),
                ("[q]", " Quit"),
            ],
        };

        let mut spans = Vec::with_capacity(pairs.len() * 2);
        for (key, label) in pairs {
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(label.to_string()));
        }
        Line::from(spans)
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect, about: &AboutInfo) {
        let popup = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            Line::from(Span::styled(
                about.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        let description_style = if about.offline {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(about.description.clone(), description_style)));
        lines.push(Line::from(""));

        for (index, app) in MOBILE_APPS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", index + 1),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(app.name, Style::default().add_modifier(Modifier::BOLD)),
            ]));
            lines.push(Line::from(app.description));
            lines.push(Line::from(Span::styled(app.link, Style::default().fg(Color::DarkGray))));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(format!("Compare the apps: {}", self.mobile_apps_link())));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("About"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
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
}

/// Carve the footer off the bottom of `area`. Screens too short to hold both
/// get no footer.
fn split_footer(area: Rect) -> (Rect, Option<Rect>) {
    if area.height <= FOOTER_HEIGHT {
        return (area, None);
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use rusqlite::Connection;
    use serde_json::json;

    use super::*;
    use crate::offline::{AssetResponse, CacheError};
    use crate::search::LanguageAliases;
    use crate::store::{create_tables, RealtimeStore, SqliteStore, SONGS_PATH, VISITS_PATH};
    use crate::viewer::FontSize;

    struct NoNetwork;

    impl Network for NoNetwork {
        fn fetch(&self, _request: &AssetRequest) -> Result<AssetResponse, CacheError> {
            Err(CacheError::Unreachable)
        }
    }

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn setup() -> (SqliteStore, App<NoNetwork>) {
        let store = SqliteStore::new(memory());
        store
            .set(
                SONGS_PATH,
                &json!({
                    "a": { "id": 1, "dtitle": "Amazing Grace", "language": "English",
                           "lyrics": "[Verse]\nAmazing grace\n[Chorus]\nMy chains are gone" },
                    "b": { "id": 2, "dtitle": "Yeshu Masih", "language": "Hindi" },
                    "c": { "id": 10, "dtitle": "Holy Holy Holy", "language": "English" },
                }),
            )
            .unwrap();
        store.set(VISITS_PATH, &json!(5)).unwrap();

        let app = App::new(
            Viewer::new(LanguageAliases::default()),
            store.subscribe(SONGS_PATH),
            store.subscribe(VISITS_PATH),
            OfflineCache::new(memory(), NoNetwork),
            "https://example.org/".to_string(),
        );
        (store, app)
    }

    fn type_text<N: Network>(app: &mut App<N>, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    #[test]
    fn initial_snapshots_are_applied() {
        let (_store, app) = setup();
        assert_eq!(app.viewer().catalog().len(), 3);
        assert_eq!(app.viewer().visitor_count(), Some(5));
    }

    #[test]
    fn open_resize_and_go_back() {
        let (_store, mut app) = setup();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.viewer().current_song().unwrap().id, "2");

        app.handle_key(KeyCode::Char('+'));
        assert_eq!(
            app.viewer().filter_state().font_size.points(),
            FontSize::DEFAULT + FontSize::STEP
        );

        app.handle_key(KeyCode::Right);
        assert_eq!(app.viewer().current_song().unwrap().id, "10");

        assert!(!app.handle_key(KeyCode::Esc));
        assert!(app.viewer().current_song().is_none());
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn search_mode_filters_as_you_type() {
        let (_store, mut app) = setup();
        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "holy");
        let ids: Vec<&str> = app.viewer().visible().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["10"]);

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.viewer().current_song().unwrap().id, "10");
        assert_eq!(app.viewer().filter_state().search_text, "holy");
    }

    #[test]
    fn escape_in_search_clears_the_query() {
        let (_store, mut app) = setup();
        app.handle_key(KeyCode::Char('f'));
        type_text(&mut app, "zzz");
        assert!(app.viewer().visible().is_empty());
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.viewer().visible().len(), 3);
    }

    #[test]
    fn tab_cycles_language_facet() {
        let (_store, mut app) = setup();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.viewer().visible().len(), 2);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.viewer().visible().len(), 1);
    }

    #[test]
    fn store_updates_replace_the_catalog() {
        let (store, mut app) = setup();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.viewer().current_song().unwrap().id, "1");

        store.set(SONGS_PATH, &json!({ "b": { "id": 2 } })).unwrap();
        store.transactional_increment(VISITS_PATH).unwrap();
        app.poll_store();

        assert!(app.viewer().current_song().is_none());
        assert_eq!(app.viewer().catalog().len(), 1);
        assert_eq!(app.viewer().visitor_count(), Some(6));
    }

    #[test]
    fn about_popup_falls_back_to_offline_notice() {
        let (_store, mut app) = setup();
        app.handle_key(KeyCode::Char('a'));
        match &app.mode {
            Mode::About(about) => assert!(about.offline),
            _ => panic!("expected the about popup"),
        }
        app.handle_key(KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (store, app) = setup();
        app.shutdown();
        app.shutdown();
        assert_eq!(store.subscriber_count(), 0);
    }

    fn render(app: &App<NoNetwork>, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn footer_is_dropped_when_the_screen_is_too_short() {
        let area = Rect::new(0, 0, 40, FOOTER_HEIGHT);
        assert_eq!(split_footer(area), (area, None));

        let (content, footer) = split_footer(Rect::new(0, 0, 40, 20));
        let footer = footer.unwrap();
        assert_eq!(footer.height, FOOTER_HEIGHT);
        assert_eq!(content.height + footer.height, 20);
        assert!(content.bottom() <= footer.top());

        let (_store, app) = setup();
        let rows = render(&app, 40, FOOTER_HEIGHT);
        assert!(rows[0].contains("Hymnal"));
        assert!(rows.iter().all(|row| !row.contains("Visitors")));
    }

    #[test]
    fn about_popup_lists_both_mobile_apps() {
        let (_store, mut app) = setup();
        app.handle_key(KeyCode::Char('a'));
        let screen = render(&app, 100, 40).join("\n");
        assert!(screen.contains("HymnConnect PRO"));
        assert!(screen.contains("[1]"));
        assert!(screen.contains("[2]"));

        app.handle_key(KeyCode::Char('9'));
        assert!(matches!(app.mode, Mode::About(_)));
    }
}
