use std::process::ExitCode;

use clap::Parser;
use window_utils::{app, logger, options::GetWindowOptions, AppError};

fn main() -> ExitCode {
    let opts = GetWindowOptions::parse();
    if let Err(e) = logger::init(&opts.log) {
        return app::finish(Err(e));
    }
    app::finish(run())
}

#[cfg(windows)]
fn run() -> Result<(), AppError> {
    use window_utils::{app::App, platform::win32::Win32Desktop};

    let app = App::new(Win32Desktop);
    app.print_window_list(&Win32Desktop, &mut std::io::stdout().lock())
}

#[cfg(not(windows))]
fn run() -> Result<(), AppError> {
    Err(AppError::Unsupported { tool: "get-window" })
}
