use anyhow::Result;
use clap::Parser;
use linehist::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    linehist::logging::init(cli.common.verbose);
    cli.execute()
}
