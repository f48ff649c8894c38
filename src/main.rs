// src/main.rs

use std::process::ExitCode;

use pollrun::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("pollrun: could not set up logging: {err:?}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pollrun error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
