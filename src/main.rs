//! ARK Settings - line-preserving editor for ARK server configuration

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = ark_settings::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
