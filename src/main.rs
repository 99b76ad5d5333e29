use clap::Parser;
use rsioma::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
