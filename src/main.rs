use std::process::ExitCode;

use refscope::ui::output;

fn main() -> ExitCode {
    match refscope::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
