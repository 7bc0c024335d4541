//! Persistence module split across logical submodules.

mod connection;
mod tunes;

pub use connection::{ensure_schema, open_in_memory, open_store};
pub use tunes::{
    clear_tunes, count_tunes, fetch_tune, insert_tune, insert_tunes, load_all_tunes,
};
