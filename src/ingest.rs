//! Full corpus rebuild: discover files, parse each one and store its tunes.

use std::path::Path;

use rusqlite::Connection;
use tracing::{info, info_span};

use crate::db::{clear_tunes, ensure_schema, insert_tunes};
use crate::discover::find_abc_files;
use crate::error::{Result, TuneError};
use crate::models::IngestSummary;
use crate::parser::parse_abc_file;

/// Rebuild the store from every `.abc` file under `root`.
///
/// With `wipe` set the table is emptied first. Each file's tunes go in as one
/// batch, so a failure never leaves half a file behind, but files stored
/// before the failure stay. Any read or store failure stops the rebuild and
/// comes back as [`TuneError::Rebuild`] with the counts reached so far.
pub fn build_db(conn: &Connection, root: &Path, wipe: bool) -> Result<IngestSummary> {
    let span = info_span!("build_db", root = %root.display(), wipe);
    let _guard = span.enter();

    let mut summary = IngestSummary::default();
    run(conn, root, wipe, &mut summary).map_err(|source| TuneError::Rebuild {
        files: summary.files,
        records: summary.records,
        source: Box::new(source),
    })?;

    info!(
        files = summary.files,
        tunes = summary.records,
        "rebuild finished"
    );
    Ok(summary)
}

fn run(conn: &Connection, root: &Path, wipe: bool, summary: &mut IngestSummary) -> Result<()> {
    ensure_schema(conn)?;
    if wipe {
        clear_tunes(conn)?;
    }

    let files = find_abc_files(root)?;
    info!(files = files.len(), "discovered source files");

    for file in &files {
        let parsed = parse_abc_file(file)?;
        let ids = insert_tunes(conn, &parsed.tunes)?;
        summary.files += 1;
        summary.records += ids.len();
    }
    Ok(())
}
