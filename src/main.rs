use std::process::ExitCode;

use batchmv::RenameError;
use batchmv::output as out;

mod app;
mod logging;

/// Exit status for a rollback that could not restore the directory.
const EXIT_INCONSISTENT: u8 = 3;

fn main() -> ExitCode {
    let args = batchmv::cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            match e.downcast_ref::<RenameError>() {
                Some(re) if re.is_fatal() => ExitCode::from(EXIT_INCONSISTENT),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
