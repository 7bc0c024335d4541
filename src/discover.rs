//! Locate ABC source files under a corpus root laid out as
//! `root/<book number>/**/*.abc`.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, TuneError};
use crate::models::SourceFile;

/// File extension recognised as ABC notation.
pub const ABC_EXTENSION: &str = "abc";

/// Collect every `.abc` file below the digit-named child directories of
/// `root`, tagged with the book number taken from that directory's name.
///
/// Files directly under `root` and directories with any non-digit character
/// in their name are ignored. The result is sorted by path.
pub fn find_abc_files(root: &Path) -> Result<Vec<SourceFile>> {
    if !root.exists() {
        return Err(TuneError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let entries = fs::read_dir(root).map_err(|source| TuneError::Read {
        path: root.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TuneError::Read {
            path: root.to_path_buf(),
            source,
        })?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let Some(book) = book_number(&entry.file_name().to_string_lossy()) else {
            continue;
        };

        let before = files.len();
        collect_book(&dir, book, &mut files)?;
        debug!(book, path = %dir.display(), files = files.len() - before, "scanned book directory");
    }

    files.sort();
    Ok(files)
}

fn collect_book(dir: &Path, book: i64, files: &mut Vec<SourceFile>) -> Result<()> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            let source = err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            TuneError::Read { path, source }
        })?;

        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == ABC_EXTENSION) {
            files.push(SourceFile {
                path: entry.into_path(),
                book,
            });
        }
    }
    Ok(())
}

/// Book number for a directory name made only of ASCII digits.
fn book_number(name: &str) -> Option<i64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match name.parse() {
        Ok(book) => Some(book),
        Err(_) => {
            warn!(name, "book directory number out of range, skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_number_accepts_digits_only() {
        assert_eq!(book_number("3"), Some(3));
        assert_eq!(book_number("007"), Some(7));
        assert_eq!(book_number(""), None);
        assert_eq!(book_number("3a"), None);
        assert_eq!(book_number("-3"), None);
        assert_eq!(book_number("book1"), None);
        assert_eq!(book_number("99999999999999999999999"), None);
    }
}
