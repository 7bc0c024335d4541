//! Core library for the ABC tune collection: find source files, split them
//! into tunes, keep the tunes in SQLite and filter them back out.
//!
//! The binary and the terminal browser sit on top of the same pieces, so the
//! re-exports below are the whole surface they rely on.
pub mod config;
pub mod db;
pub mod discover;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod parser;
pub mod query;
pub mod ui;

pub use db::{
    clear_tunes, count_tunes, ensure_schema, fetch_tune, insert_tune, insert_tunes,
    load_all_tunes, open_in_memory, open_store,
};
pub use discover::find_abc_files;
pub use error::TuneError;
pub use ingest::build_db;
pub use models::{IngestSummary, ParsedFile, SourceFile, Tune, TuneRecord};
pub use parser::{parse_abc_file, parse_tunes};
pub use query::{by_book, by_type, search_title};

/// The interactive browser entry point and state container.
pub use ui::{run_app, App};
