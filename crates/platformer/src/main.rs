mod app;

use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    let wiring = match app::bootstrap::build_app() {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "tuning_load_failed");
            return ExitCode::FAILURE;
        }
    };
    app::loop_runner::run(wiring)
}
