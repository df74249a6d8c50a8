use std::process::ExitCode;

use clap::Parser;
use window_utils::{app, logger, options::SetParentOptions, AppError};

fn main() -> ExitCode {
    let opts = SetParentOptions::parse();
    if let Err(e) = logger::init(&opts.log) {
        return app::finish(Err(e));
    }
    app::finish(run(&opts))
}

#[cfg(windows)]
fn run(opts: &SetParentOptions) -> Result<(), AppError> {
    use window_utils::{app::App, platform::win32::Win32Desktop};

    let app = App::new(Win32Desktop);
    let stdin = std::io::stdin();
    app.set_parent(opts, &mut stdin.lock(), &mut std::io::stdout().lock())?;
    Ok(())
}

#[cfg(not(windows))]
fn run(_opts: &SetParentOptions) -> Result<(), AppError> {
    Err(AppError::Unsupported { tool: "set-parent" })
}
