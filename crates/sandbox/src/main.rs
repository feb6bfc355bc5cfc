use std::process::ExitCode;

fn main() -> ExitCode {
    match sandbox::board_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("board init failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
