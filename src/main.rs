use clap::Parser;
use sweepdir::cli::{self, Cli};
use sweepdir::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::run(cli) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
