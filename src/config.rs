//! Default locations for the corpus and the database. The library core never
//! reads these; only the binary resolves them and passes paths down.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Corpus root used when neither `--root` nor `TUNEBOOK_ROOT` is given.
pub const DEFAULT_ROOT: &str = "abc_books";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".tunebook";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "tunes.sqlite";

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

/// Pick the explicit database path if one was given, otherwise the default.
/// [`open_store`](crate::db::open_store) creates any missing directories.
pub fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_db_path(),
    }
}
