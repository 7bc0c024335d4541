//! Domain models that mirror the `tunes` table and get passed between the
//! parser, the store, the query helpers and the browser. These stay plain
//! data holders; parsing and persistence live in their own modules.

use std::fmt;
use std::path::PathBuf;

/// One tune as read from a source file, before the store assigns it an id.
///
/// Values are built once by the parser after every line of the tune has been
/// seen and are never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tune {
    /// Numeric book folder the source file lived under.
    pub book: i64,
    /// Path of the originating file. Several tunes usually share one file.
    pub source_path: String,
    /// `X:` reference number, identifying the tune within its file.
    pub index: Option<String>,
    /// `T:` title.
    pub title: Option<String>,
    /// `M:` meter.
    pub meter: Option<String>,
    /// `K:` key.
    pub key: Option<String>,
    /// `R:` rhythm, e.g. "reel" or "jig".
    pub tune_type: Option<String>,
    /// Every non-header line of the tune, each followed by `\n`.
    pub body: String,
}

/// A tune row loaded back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneRecord {
    /// Surrogate key from SQLite. Never reused, even after a rebuild.
    pub id: i64,
    pub tune: Tune,
}

impl TuneRecord {
    /// Compose the `X - Title` line used in result lists, falling back to a
    /// placeholder when the tune has no title.
    pub fn display_line(&self) -> String {
        format!(
            "{} - {}",
            self.tune.index.as_deref().unwrap_or(""),
            self.tune.title.as_deref().unwrap_or("(no title)")
        )
    }

    /// Multi-line detail block shown by `tunebook show` and the browser.
    pub fn details(&self) -> String {
        let tune = &self.tune;
        format!(
            "Book: {}\nFile: {}\nX: {}\nTitle: {}\nMeter: {}\nKey: {}\nType: {}\n\nBody:\n{}",
            tune.book,
            tune.source_path,
            field(&tune.index),
            field(&tune.title),
            field(&tune.meter),
            field(&tune.key),
            field(&tune.tune_type),
            tune.body
        )
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

impl fmt::Display for TuneRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_line())
    }
}

/// A discovered `.abc` file tagged with the book it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub path: PathBuf,
    pub book: i64,
}

/// Parser output for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    /// Tunes in file order.
    pub tunes: Vec<Tune>,
    /// Non-blank lines seen before the first `X:` line. They belong to no
    /// tune and are not stored.
    pub preamble_lines: usize,
}

/// Counts reported by a corpus rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub records: usize,
}
