mod cli;
mod loader;
mod metrics;
mod model;
mod plots;
mod report;
mod storage;
mod summary;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage problems exit with code 1; --help/--version exit clean
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    cli::run(args)
}
