use anyhow::Result;
use clap::Parser;

use flow::cli;
use flow::core::logging::init_cli_logger;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_cli_logger(cli.verbose, cli.quiet);
    cli::run(cli)
}
