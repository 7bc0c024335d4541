//! Terminal browser over a snapshot of stored tunes.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
