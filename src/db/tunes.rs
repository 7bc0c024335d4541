use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::error::{Result, TuneError};
use crate::models::{Tune, TuneRecord};

const SELECT_TUNES: &str = "SELECT id, book, filename, X, T, M, K, R, body FROM tunes";

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TuneRecord> {
    Ok(TuneRecord {
        id: row.get(0)?,
        tune: Tune {
            book: row.get(1)?,
            source_path: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            index: row.get(3)?,
            title: row.get(4)?,
            meter: row.get(5)?,
            key: row.get(6)?,
            tune_type: row.get(7)?,
            body: row.get(8)?,
        },
    })
}

/// Read the whole table in ascending id order. This is the snapshot every
/// query helper works on.
pub fn load_all_tunes(conn: &Connection) -> Result<Vec<TuneRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_TUNES} ORDER BY id"))?;
    let tunes = stmt
        .query_map([], record_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tunes)
}

/// Look up a single tune by id.
pub fn fetch_tune(conn: &Connection, id: i64) -> Result<Option<TuneRecord>> {
    let tune = conn
        .query_row(&format!("{SELECT_TUNES} WHERE id = ?1"), [id], record_from_row)
        .optional()?;
    Ok(tune)
}

/// Number of stored tunes. The CLI reports it after a rebuild.
pub fn count_tunes(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tunes", [], |row| row.get(0))?;
    usize::try_from(count).map_err(|_| TuneError::Validation {
        reason: format!("tune count out of range: {count}"),
    })
}

/// Delete every row ahead of a full rebuild.
pub fn clear_tunes(conn: &Connection) -> Result<()> {
    let removed = conn.execute("DELETE FROM tunes", [])?;
    info!(removed, "cleared tune store");
    Ok(())
}

/// Append one tune and return the id SQLite assigned to it.
///
/// Only tunes that carry an `X:` index are accepted; the parser never emits
/// anything else, so a rejection here points at a bug upstream.
pub fn insert_tune(conn: &Connection, tune: &Tune) -> Result<i64> {
    if tune.index.is_none() {
        return Err(TuneError::Validation {
            reason: format!("tune from {} has no X: field", tune.source_path),
        });
    }

    conn.execute(
        "INSERT INTO tunes (book, filename, X, T, M, K, R, body)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tune.book,
            tune.source_path,
            tune.index,
            tune.title,
            tune.meter,
            tune.key,
            tune.tune_type,
            tune.body,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a batch inside one transaction and return the new ids in order.
///
/// The batch is all-or-nothing: if any tune fails, none of this batch is
/// kept. Batches committed by earlier calls are unaffected.
pub fn insert_tunes(conn: &Connection, tunes: &[Tune]) -> Result<Vec<i64>> {
    let tx = conn.unchecked_transaction()?;
    let ids = tunes
        .iter()
        .map(|tune| insert_tune(&tx, tune))
        .collect::<Result<Vec<_>>>()?;
    tx.commit()?;
    Ok(ids)
}
