use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use wordbeam::cli::{Cli, init_logging, run};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(_) => {
            info!("job succeeded");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("job failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
