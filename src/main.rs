//! Command-line entry point for `mgmt`.

use std::process::ExitCode;

use colored::Colorize;

fn main() -> ExitCode {
    env_logger::init();

    match superlu_mgmt::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", format!("Error: {error}").red());
            ExitCode::FAILURE
        }
    }
}
