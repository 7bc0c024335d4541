//! Line-oriented splitter that turns the text of one ABC file into tunes.
//!
//! A tune starts at every `X:` line and runs until the next `X:` line or the
//! end of the file. Within a tune, `T:`, `M:`, `K:` and `R:` lines fill the
//! matching header field (a repeated field keeps the last value) and every
//! other line, blank ones included, is appended to the body. Lines before the
//! first `X:` belong to no tune and are only counted.

use std::fs;

use tracing::{debug, warn};

use crate::error::{Result, TuneError};
use crate::models::{ParsedFile, SourceFile, Tune};

/// Header fields a tune record keeps, besides the `X:` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Meter,
    Key,
    TuneType,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Title => "T",
            Field::Meter => "M",
            Field::Key => "K",
            Field::TuneType => "R",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Index(&'a str),
    Header(Field, &'a str),
    Body,
}

/// Classify a line by its two-character prefix. The letter is case-sensitive
/// and the value is trimmed.
fn classify(line: &str) -> LineKind<'_> {
    let Some(prefix) = line.get(..2) else {
        return LineKind::Body;
    };
    let value = line[2..].trim();
    match prefix {
        "X:" => LineKind::Index(value),
        "T:" => LineKind::Header(Field::Title, value),
        "M:" => LineKind::Header(Field::Meter, value),
        "K:" => LineKind::Header(Field::Key, value),
        "R:" => LineKind::Header(Field::TuneType, value),
        _ => LineKind::Body,
    }
}

/// Staging area for the tune currently being read.
struct TuneBuilder {
    book: i64,
    source_path: String,
    index: String,
    title: Option<String>,
    meter: Option<String>,
    key: Option<String>,
    tune_type: Option<String>,
    body: String,
}

impl TuneBuilder {
    fn new(index: &str, book: i64, source_path: &str) -> Self {
        Self {
            book,
            source_path: source_path.to_string(),
            index: index.to_string(),
            title: None,
            meter: None,
            key: None,
            tune_type: None,
            body: String::new(),
        }
    }

    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Meter => &mut self.meter,
            Field::Key => &mut self.key,
            Field::TuneType => &mut self.tune_type,
        };
        if let Some(previous) = slot.replace(value.to_string()) {
            debug!(
                file = %self.source_path,
                index = %self.index,
                field = field.label(),
                previous = %previous,
                "header field repeated, keeping last value"
            );
        }
    }

    fn push_body(&mut self, line: &str) {
        self.body.push_str(line);
        self.body.push('\n');
    }

    fn finish(self) -> Tune {
        Tune {
            book: self.book,
            source_path: self.source_path,
            index: Some(self.index),
            title: self.title,
            meter: self.meter,
            key: self.key,
            tune_type: self.tune_type,
            body: self.body,
        }
    }
}

/// Single-pass state machine. `current` is `None` until the first `X:` line.
struct TuneSplitter<'a> {
    book: i64,
    source_path: &'a str,
    current: Option<TuneBuilder>,
    parsed: ParsedFile,
}

impl<'a> TuneSplitter<'a> {
    fn new(book: i64, source_path: &'a str) -> Self {
        Self {
            book,
            source_path,
            current: None,
            parsed: ParsedFile::default(),
        }
    }

    fn feed(&mut self, line: &str) {
        let kind = classify(line);
        if let LineKind::Index(index) = kind {
            self.flush();
            self.current = Some(TuneBuilder::new(index, self.book, self.source_path));
            return;
        }

        match (kind, self.current.as_mut()) {
            (LineKind::Header(field, value), Some(tune)) => tune.set(field, value),
            (_, Some(tune)) => tune.push_body(line),
            (_, None) => {
                if !line.trim().is_empty() {
                    self.parsed.preamble_lines += 1;
                }
            }
        }
    }

    fn flush(&mut self) {
        if let Some(tune) = self.current.take() {
            self.parsed.tunes.push(tune.finish());
        }
    }

    fn finish(mut self) -> ParsedFile {
        self.flush();
        self.parsed
    }
}

/// Split `text` into tunes tagged with `book` and `source_path`.
pub fn parse_tunes(text: &str, book: i64, source_path: &str) -> ParsedFile {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    // CRLF and bare CR (classic Mac) both end a line.
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut splitter = TuneSplitter::new(book, source_path);
    for line in text.lines() {
        splitter.feed(line);
    }
    splitter.finish()
}

/// Read and parse one discovered file.
///
/// Invalid UTF-8 is replaced rather than rejected; any I/O failure is
/// returned as [`TuneError::Read`].
pub fn parse_abc_file(file: &SourceFile) -> Result<ParsedFile> {
    let bytes = fs::read(&file.path).map_err(|source| TuneError::Read {
        path: file.path.clone(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let source_path = file.path.to_string_lossy();

    let parsed = parse_tunes(&text, file.book, &source_path);
    if parsed.preamble_lines > 0 {
        warn!(
            file = %source_path,
            lines = parsed.preamble_lines,
            "dropping text before the first X: line"
        );
    }
    debug!(file = %source_path, tunes = parsed.tunes.len(), "parsed file");
    Ok(parsed)
}
