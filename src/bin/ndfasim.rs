use std::io;
use std::process::ExitCode;

use ndfasim::driver::build_command;
use ndfasim::{run_and_report, DriverConfig};

fn main() -> ExitCode {
    env_logger::init();

    let args = build_command().get_matches();
    let config = DriverConfig::from_matches(&args);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let success = run_and_report(&config, &mut input, &mut output);

    ExitCode::from(config.exit_status(success))
}
