use clap::Parser;
use marketsim::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
