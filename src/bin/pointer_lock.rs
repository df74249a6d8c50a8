use std::process::ExitCode;

use clap::Parser;
use window_utils::{app, logger, options::PointerLockOptions, AppError};

fn main() -> ExitCode {
    let opts = PointerLockOptions::parse();
    if let Err(e) = logger::init(&opts.log) {
        return app::finish(Err(e));
    }
    app::finish(run(&opts))
}

#[cfg(windows)]
fn run(opts: &PointerLockOptions) -> Result<(), AppError> {
    window_utils::window::run_pointer_lock(opts)
}

#[cfg(not(windows))]
fn run(_opts: &PointerLockOptions) -> Result<(), AppError> {
    Err(AppError::Unsupported { tool: "pointer-lock" })
}
