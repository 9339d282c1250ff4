mod args;
mod snapshot;

use std::process::ExitCode;

use args::Args;

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::default();

    match snapshot::take(&args.into_config()) {
        Ok(()) => ExitCode::SUCCESS,

        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
