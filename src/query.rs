//! Read-only filters over a snapshot returned by
//! [`load_all_tunes`](crate::db::load_all_tunes).
//!
//! None of these touch the store or the snapshot; an empty result is a normal
//! outcome, not an error.

use crate::error::{Result, TuneError};
use crate::models::TuneRecord;

/// Tunes from one book, in snapshot order.
pub fn by_book(snapshot: &[TuneRecord], book: i64) -> Vec<&TuneRecord> {
    snapshot.iter().filter(|r| r.tune.book == book).collect()
}

/// Tunes whose `R:` field contains `tune_type`, ignoring case. Tunes without
/// an `R:` field never match.
pub fn by_type<'a>(snapshot: &'a [TuneRecord], tune_type: &str) -> Vec<&'a TuneRecord> {
    let needle = tune_type.to_lowercase();
    snapshot
        .iter()
        .filter(|r| contains_folded(r.tune.tune_type.as_deref(), &needle))
        .collect()
}

/// Tunes whose title contains `term`, ignoring case. Untitled tunes never
/// match.
pub fn search_title<'a>(snapshot: &'a [TuneRecord], term: &str) -> Vec<&'a TuneRecord> {
    let needle = term.to_lowercase();
    snapshot
        .iter()
        .filter(|r| contains_folded(r.tune.title.as_deref(), &needle))
        .collect()
}

fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}

/// Validate user input for a book filter.
pub fn parse_book(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    trimmed.parse().map_err(|_| TuneError::InvalidInput {
        reason: format!("Book must be a number, got {trimmed:?}."),
    })
}

/// Distinct book numbers, ascending.
pub fn books(snapshot: &[TuneRecord]) -> Vec<i64> {
    let mut books: Vec<i64> = snapshot.iter().map(|r| r.tune.book).collect();
    books.sort_unstable();
    books.dedup();
    books
}

/// Distinct non-empty tune types, sorted.
pub fn tune_types(snapshot: &[TuneRecord]) -> Vec<String> {
    let mut types: Vec<String> = snapshot
        .iter()
        .filter_map(|r| r.tune.tune_type.as_deref())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    types.sort();
    types.dedup();
    types
}
