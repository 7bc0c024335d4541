//! Binary entry point: parse the command line, set up logging, open the
//! store and dispatch to the rebuild, listing or browsing commands.
mod cli;

use clap::Parser;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(err) = tunebook::logging::init_tracing(cli.verbose, cli.log_level.as_deref()) {
        eprintln!("Warning: failed to initialize logging: {err}");
    }

    cli::run(cli)
}
