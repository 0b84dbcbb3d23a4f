//! `tally` binary entry point.

use clap::Parser;
use tracing::error;

use tally_cli::{init_tracing, run, Cli};

fn main() {
    let cli = Cli::parse();

    init_tracing();

    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(err.exit_code());
    }
}
