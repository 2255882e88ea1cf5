use std::process::ExitCode;

use clap::Parser;

use win_tools::error::EXIT_CANCELLED;
use win_tools::{cli, commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, args.log_name());

    // Child processes receive Ctrl+C too; once they exit, so do we.
    if let Err(e) = ctrlc::set_handler(|| std::process::exit(i32::from(EXIT_CANCELLED))) {
        tracing::debug!("cannot install Ctrl+C handler: {e}");
    }

    commands::run(args)
}
