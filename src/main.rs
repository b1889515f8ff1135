use clap::Parser;
use decastat::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
