use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use tunebook::config::{resolve_db_path, DEFAULT_ROOT};
use tunebook::query::parse_book;
use tunebook::{
    build_db, by_book, by_type, count_tunes, fetch_tune, load_all_tunes, open_store, run_app,
    search_title, App, TuneRecord,
};

/// Build and browse a collection of ABC tunes
#[derive(Parser, Debug)]
#[command(name = "tunebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (defaults to ~/.tunebook/tunes.sqlite)
    #[arg(long, global = true, env = "TUNEBOOK_DB")]
    pub db: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log filter, e.g. "info" or "tunebook=trace"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the database from a directory of numbered book folders
    Build {
        /// Corpus root holding one folder per book number
        #[arg(long, env = "TUNEBOOK_ROOT", default_value = DEFAULT_ROOT)]
        root: PathBuf,

        /// Delete existing tunes before loading
        #[arg(long)]
        wipe: bool,
    },

    /// Print stored tunes, optionally filtered
    List {
        /// Only tunes from this book
        #[arg(long)]
        book: Option<String>,

        /// Only tunes whose type contains this text
        #[arg(long = "type")]
        tune_type: Option<String>,

        /// Only tunes whose title contains this text
        #[arg(long)]
        title: Option<String>,
    },

    /// Print every field of one stored tune
    Show {
        /// Tune id as shown by `list`
        id: i64,
    },

    /// Open the interactive browser
    Browse,
}

pub fn run(cli: Cli) -> Result<()> {
    let db_path = resolve_db_path(cli.db.as_deref())?;
    let conn = open_store(&db_path)
        .with_context(|| format!("failed to open tune store at {}", db_path.display()))?;

    match cli.command {
        Commands::Build { root, wipe } => build(&conn, root, wipe),
        Commands::List {
            book,
            tune_type,
            title,
        } => list(&conn, book.as_deref(), tune_type.as_deref(), title.as_deref()),
        Commands::Show { id } => show(&conn, id),
        Commands::Browse => {
            let tunes = load_all_tunes(&conn).context("failed to load tunes")?;
            let mut app = App::new(tunes);
            run_app(&mut app)
        }
    }
}

fn build(conn: &Connection, root: PathBuf, wipe: bool) -> Result<()> {
    let summary = build_db(conn, &root, wipe).context("failed to build tune database")?;
    let stored = count_tunes(conn).context("failed to count tunes")?;
    println!(
        "Inserted {} tunes from {} files. The store now holds {stored}.",
        summary.records, summary.files
    );
    Ok(())
}

fn list(
    conn: &Connection,
    book: Option<&str>,
    tune_type: Option<&str>,
    title: Option<&str>,
) -> Result<()> {
    let book = book.map(parse_book).transpose()?;
    let mut tunes = load_all_tunes(conn).context("failed to load tunes")?;

    if let Some(book) = book {
        tunes = owned(by_book(&tunes, book));
    }
    if let Some(tune_type) = tune_type {
        tunes = owned(by_type(&tunes, tune_type));
    }
    if let Some(title) = title {
        tunes = owned(search_title(&tunes, title));
    }

    if tunes.is_empty() {
        println!("No tunes matched.");
    }
    for tune in &tunes {
        println!("{:>6}  book {:<3} {tune}", tune.id, tune.tune.book);
    }
    Ok(())
}

fn owned(records: Vec<&TuneRecord>) -> Vec<TuneRecord> {
    records.into_iter().cloned().collect()
}

fn show(conn: &Connection, id: i64) -> Result<()> {
    let tune = fetch_tune(conn, id)
        .context("failed to load tune")?
        .ok_or_else(|| anyhow!("Tune {id} not found"))?;
    print!("{}", tune.details());
    Ok(())
}
