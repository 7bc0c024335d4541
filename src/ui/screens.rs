use crate::models::TuneRecord;
use crate::query::{by_book, by_type, search_title};

/// Which subset of the snapshot the list is showing. Only one filter is active
/// at a time; each one runs against the full snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Filter {
    All,
    Book(i64),
    Type(String),
    Title(String),
}

impl Filter {
    pub(crate) fn describe(&self) -> String {
        match self {
            Filter::All => "All tunes".to_string(),
            Filter::Book(book) => format!("Book {book}"),
            Filter::Type(tune_type) => format!("Type: {tune_type}"),
            Filter::Title(term) => format!("Title: {term}"),
        }
    }
}

/// Snapshot plus the filtered view the browser renders.
pub(crate) struct TuneListScreen {
    pub(crate) tunes: Vec<TuneRecord>,
    pub(crate) filtered: Vec<TuneRecord>,
    pub(crate) filter: Filter,
    pub(crate) selected: usize,
    pub(crate) detail_scroll: u16,
}

impl TuneListScreen {
    pub(crate) fn new(tunes: Vec<TuneRecord>) -> Self {
        let mut screen = Self {
            filtered: Vec::new(),
            tunes,
            filter: Filter::All,
            selected: 0,
            detail_scroll: 0,
        };
        screen.apply_filter();
        screen
    }

    pub(crate) fn apply_filter(&mut self) {
        let matches: Vec<&TuneRecord> = match &self.filter {
            Filter::All => self.tunes.iter().collect(),
            Filter::Book(book) => by_book(&self.tunes, *book),
            Filter::Type(tune_type) => by_type(&self.tunes, tune_type),
            Filter::Title(term) if term.trim().is_empty() => self.tunes.iter().collect(),
            Filter::Title(term) => search_title(&self.tunes, term.trim()),
        };
        self.filtered = matches.into_iter().cloned().collect();
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.selected = 0;
        self.apply_filter();
    }

    pub(crate) fn current_tune(&self) -> Option<&TuneRecord> {
        self.filtered.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
        self.detail_scroll = 0;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
        self.detail_scroll = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
        self.detail_scroll = 0;
    }

    pub(crate) fn scroll_details(&mut self, delta: i32) {
        let lines = self
            .current_tune()
            .map(|tune| tune.details().lines().count())
            .unwrap_or(0);
        let max = u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX);
        let next = (i32::from(self.detail_scroll) + delta).clamp(0, i32::from(max));
        self.detail_scroll = next as u16;
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len() - 1;
        }
        self.detail_scroll = 0;
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
                body: "abc\ndef\n".to_string(),
            },
        }
    }

    fn screen() -> TuneListScreen {
        TuneListScreen::new(vec![
            record(1, 1, "Cooley's", "reel"),
            record(2, 1, "Drowsy Maggie", "reel"),
            record(3, 2, "The Kesh", "jig"),
        ])
    }

    fn shown(screen: &TuneListScreen) -> Vec<i64> {
        screen.filtered.iter().map(|r| r.id).collect()
    }

    #[test]
    fn filters_replace_each_other() {
        let mut screen = screen();
        assert_eq!(shown(&screen), vec![1, 2, 3]);

        screen.set_filter(Filter::Book(1));
        assert_eq!(shown(&screen), vec![1, 2]);

        screen.set_filter(Filter::Type("JIG".to_string()));
        assert_eq!(shown(&screen), vec![3]);

        screen.set_filter(Filter::Title("maggie".to_string()));
        assert_eq!(shown(&screen), vec![2]);

        screen.set_filter(Filter::Title("  ".to_string()));
        assert_eq!(shown(&screen), vec![1, 2, 3]);
    }

    #[test]
    fn selection_is_clamped() {
        let mut screen = screen();
        screen.move_selection(10);
        assert_eq!(screen.current_tune().map(|r| r.id), Some(3));
        screen.move_selection(-10);
        assert_eq!(screen.current_tune().map(|r| r.id), Some(1));
        screen.select_last();
        screen.set_filter(Filter::Book(9));
        assert!(screen.current_tune().is_none());
        screen.move_selection(1);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn detail_scroll_stays_within_text() {
        let mut screen = screen();
        screen.scroll_details(-3);
        assert_eq!(screen.detail_scroll, 0);
        screen.scroll_details(1000);
        let lines = screen.current_tune().unwrap().details().lines().count() as u16;
        assert_eq!(screen.detail_scroll, lines - 1);
        screen.move_selection(1);
        assert_eq!(screen.detail_scroll, 0);
    }

    #[test]
    fn describe_names_the_active_filter() {
        assert_eq!(Filter::Book(4).describe(), "Book 4");
        assert_eq!(Filter::Type("reel".into()).describe(), "Type: reel");
    }
}
