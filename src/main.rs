use std::process;

use clap::Parser;
use colored::Colorize;
use gitprof::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = gitprof::run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}
