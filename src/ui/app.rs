use std::mem;

use anyhow::{Error, Result};
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::TuneRecord;
use crate::query::{books, parse_book, tune_types};

use super::helpers::{centered_rect, surface_error, tune_count};
use super::screens::{Filter, TuneListScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows moved by PageUp / PageDown.
const PAGE_STEP: isize = 10;
/// Share of the width given to the tune list; the rest shows details.
const LIST_PERCENT: u16 = 40;

/// Fine-grained input modes layered over the tune list.
enum Mode {
    Normal,
    Searching(SearchState),
    EnteringBook(BookPrompt),
}

/// State for an active inline title search.
struct SearchState {
    query: String,
}

/// Text typed into the book filter prompt. Validated only on Enter.
struct BookPrompt {
    input: String,
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

/// Central application state for the browser. It owns the snapshot loaded at
/// start-up and never writes back to the store.
pub struct App {
    screen: TuneListScreen,
    books: Vec<i64>,
    tune_types: Vec<String>,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(tunes: Vec<TuneRecord>) -> Self {
        let books = books(&tunes);
        let tune_types = tune_types(&tunes);
        let status = if tunes.is_empty() {
            Some(StatusMessage {
                text: "The store is empty. Run `tunebook build` first.".to_string(),
                kind: StatusKind::Info,
            })
        } else {
            None
        };

        Self {
            screen: TuneListScreen::new(tunes),
            books,
            tune_types,
            mode: Mode::Normal,
            status,
        }
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::EnteringBook(prompt) => self.handle_book_prompt(code, prompt),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char('/') => {
                self.clear_status();
                let query = match &self.screen.filter {
                    Filter::Title(term) => term.clone(),
                    _ => String::new(),
                };
                return Mode::Searching(SearchState { query });
            }
            KeyCode::Char('b') => {
                self.clear_status();
                return Mode::EnteringBook(BookPrompt {
                    input: String::new(),
                });
            }
            KeyCode::Char('t') => self.cycle_type(),
            KeyCode::Char('a') => {
                self.screen.set_filter(Filter::All);
                self.set_status(
                    format!("Showing {}.", tune_count(self.screen.filtered.len())),
                    StatusKind::Info,
                );
            }
            KeyCode::Char('o') => self.open_current_source(),
            KeyCode::Char('j') => self.screen.scroll_details(1),
            KeyCode::Char('k') => self.screen.scroll_details(-1),
            code => self.navigate(code),
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.screen.set_filter(Filter::All);
                return Mode::Normal;
            }
            KeyCode::Enter => {
                if self.screen.filtered.is_empty() {
                    self.set_status("No results.", StatusKind::Info);
                }
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            code => {
                self.navigate(code);
                return Mode::Searching(state);
            }
        }

        self.screen.set_filter(Filter::Title(state.query.clone()));
        Mode::Searching(state)
    }

    fn handle_book_prompt(&mut self, code: KeyCode, mut prompt: BookPrompt) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Enter => {
                match parse_book(&prompt.input) {
                    Ok(book) => {
                        self.screen.set_filter(Filter::Book(book));
                        if self.screen.filtered.is_empty() {
                            self.set_status("No tunes for that book.", StatusKind::Info);
                        } else {
                            self.set_status(
                                format!(
                                    "Book {book}: {}.",
                                    tune_count(self.screen.filtered.len())
                                ),
                                StatusKind::Info,
                            );
                        }
                    }
                    Err(err) => self.report_error(&Error::new(err)),
                }
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => prompt.input.push(ch),
            _ => {}
        }
        Mode::EnteringBook(prompt)
    }

    fn navigate(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen.move_selection(PAGE_STEP),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            _ => {}
        }
    }

    /// Step to the next known tune type, wrapping back to all tunes after the
    /// last one.
    fn cycle_type(&mut self) {
        if self.tune_types.is_empty() {
            self.set_status("No tune types recorded.", StatusKind::Info);
            return;
        }

        let next = match &self.screen.filter {
            Filter::Type(current) => self
                .tune_types
                .iter()
                .position(|t| t == current)
                .and_then(|i| self.tune_types.get(i + 1)),
            _ => self.tune_types.first(),
        };

        match next.cloned() {
            Some(tune_type) => {
                self.screen.set_filter(Filter::Type(tune_type.clone()));
                if self.screen.filtered.is_empty() {
                    self.set_status("No tunes of that type.", StatusKind::Info);
                } else {
                    self.set_status(
                        format!("{tune_type}: {}.", tune_count(self.screen.filtered.len())),
                        StatusKind::Info,
                    );
                }
            }
            None => {
                self.screen.set_filter(Filter::All);
                self.set_status("Showing all types.", StatusKind::Info);
            }
        }
    }

    fn open_current_source(&mut self) {
        let Some(path) = self
            .screen
            .current_tune()
            .map(|tune| tune.tune.source_path.clone())
        else {
            self.set_status("No tune selected.", StatusKind::Error);
            return;
        };

        if let Err(err) = open_path(&path) {
            self.set_status(format!("Failed to open {path}: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened {path}."), StatusKind::Info);
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(LIST_PERCENT),
                Constraint::Percentage(100 - LIST_PERCENT),
            ])
            .split(content_area);

        self.draw_tune_list(frame, panes[0]);
        self.draw_details(frame, panes[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_input(frame, area, "Search title", &state.query),
            Mode::EnteringBook(prompt) => {
                self.draw_input(frame, area, &self.book_prompt_label(), &prompt.input)
            }
            Mode::Normal => {}
        }
    }

    fn draw_tune_list(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            "{} ({})",
            self.screen.filter.describe(),
            tune_count(self.screen.filtered.len())
        );
        let items: Vec<ListItem> = self
            .screen
            .filtered
            .iter()
            .map(|tune| ListItem::new(tune.display_line()))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        if !self.screen.filtered.is_empty() {
            state.select(Some(self.screen.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Details");
        let text = self
            .screen
            .current_tune()
            .map(TuneRecord::details)
            .unwrap_or_default();
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.screen.detail_scroll, 0));
        frame.render_widget(paragraph, area);
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

    fn draw_input(&self, frame: &mut Frame, area: Rect, label: &str, value: &str) {
        let popup_area = centered_rect(60, 3, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title(label.to_string());
        let prompt = format!("{label}: ");
        let paragraph = Paragraph::new(Span::raw(format!("{prompt}{value}")))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + prompt.chars().count() as u16 + value.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    /// "Book (1, 2, 5)" so the user can see which numbers exist.
    fn book_prompt_label(&self) -> String {
        if self.books.is_empty() {
            return "Book".to_string();
        }
        let known: Vec<String> = self.books.iter().map(i64::to_string).collect();
        format!("Book ({})", known.join(", "))
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Searching(_) => Line::from(vec![
                Span::styled("[Type]", key_style),
                Span::raw(" Filter titles   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Keep   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear"),
            ]),
            Mode::EnteringBook(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Apply   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[/]", key_style),
                Span::raw(" Search   "),
                Span::styled("[b]", key_style),
                Span::raw(" Book   "),
                Span::styled("[t]", key_style),
                Span::raw(" Type   "),
                Span::styled("[a]", key_style),
                Span::raw(" All   "),
                Span::styled("[j/k]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[o]", key_style),
                Span::raw(" Open file   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn report_error(&mut self, err: &Error) {
        self.set_status(surface_error(err), StatusKind::Error);
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tune;

    fn record(id: i64, book: i64, title: &str, tune_type: &str) -> TuneRecord {
        TuneRecord {
            id,
            tune: Tune {
                book,
                source_path: format!("abc_books/{book}/tunes.abc"),
                index: Some(id.to_string()),
                title: Some(title.to_string()),
                meter: None,
                key: None,
                tune_type: Some(tune_type.to_string()),
                body: String::new(),
            },
        }
    }

    fn app() -> App {
        App::new(vec![
            record(1, 1, "Cooley's", "reel"),
            record(2, 2, "The Musical Reel", "reel"),
            record(3, 2, "The Kesh", "jig"),
        ])
    }

    fn press(app: &mut App, keys: &str) {
        for ch in keys.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn shown(app: &App) -> Vec<i64> {
        app.screen.filtered.iter().map(|r| r.id).collect()
    }

    fn status(app: &App) -> Option<&str> {
        app.status.as_ref().map(|s| s.text.as_str())
    }

    #[test]
    fn quit_keys_exit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Esc).unwrap());
    }

    #[test]
    fn live_title_search_then_clear() {
        let mut app = app();
        press(&mut app, "/reel");
        assert!(matches!(app.mode, Mode::Searching(_)));
        assert_eq!(shown(&app), vec![2]);

        app.handle_key(KeyCode::Backspace).unwrap();
        assert_eq!(shown(&app), vec![2]);

        assert!(!app.handle_key(KeyCode::Esc).unwrap());
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(shown(&app), vec![1, 2, 3]);
    }

    #[test]
    fn search_without_results_reports_it() {
        let mut app = app();
        press(&mut app, "/zzz");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(shown(&app).is_empty());
        assert_eq!(status(&app), Some("No results."));
    }

    #[test]
    fn book_prompt_filters_and_validates() {
        let mut app = app();
        press(&mut app, "b2");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(shown(&app), vec![2, 3]);

        press(&mut app, "bx");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(status(&app), Some("Book must be a number, got \"x\"."));
        assert_eq!(shown(&app), vec![2, 3]);

        press(&mut app, "b7");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(shown(&app).is_empty());
        assert_eq!(status(&app), Some("No tunes for that book."));
    }

    #[test]
    fn book_prompt_lists_known_books() {
        assert_eq!(app().book_prompt_label(), "Book (1, 2)");
        assert_eq!(App::new(Vec::new()).book_prompt_label(), "Book");
    }

    #[test]
    fn type_key_cycles_through_types_then_all() {
        let mut app = app();
        press(&mut app, "t");
        assert_eq!(app.screen.filter, Filter::Type("jig".to_string()));
        assert_eq!(shown(&app), vec![3]);
        press(&mut app, "t");
        assert_eq!(shown(&app), vec![1, 2]);
        press(&mut app, "t");
        assert_eq!(app.screen.filter, Filter::All);
    }

    #[test]
    fn empty_snapshot_explains_itself() {
        let mut app = App::new(Vec::new());
        assert!(status(&app).is_some_and(|s| s.contains("tunebook build")));
        press(&mut app, "t");
        assert_eq!(status(&app), Some("No tune types recorded."));
    }
}
