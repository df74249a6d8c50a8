use std::io::{BufRead, Write};
use std::process::ExitCode;

use tracing::{debug, error};

use crate::enumerate::enumerate;
use crate::error::{AppError, HandleRole};
use crate::handle::{self, ParsedHandle};
use crate::options::SetParentOptions;
use crate::parent::{self, PreviousParent};
use crate::platform::{ProcessTable, WindowTable};
use crate::window_info::WindowRecord;

const SEPARATOR_WIDTH: usize = 100;

pub struct App<W> {
    windows: W,
    version: String,
}

impl<W: WindowTable> App<W> {
    pub fn new(windows: W) -> Self {
        let version = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        Self { windows, version }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Prints the header, a separator and one line per eligible window.
    pub fn print_window_list<P, O>(&self, processes: &P, out: &mut O) -> Result<(), AppError>
    where
        P: ProcessTable + ?Sized,
        O: Write,
    {
        writeln!(
            out,
            "{:<24}{:<24}{:<16}{:<32}{}",
            "Window Handle(DEC)",
            "Window Handle(HEX)",
            "Process ID",
            "Process Name",
            "Window Title"
        )?;
        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        for record in enumerate(&self.windows, processes) {
            writeln!(out, "{}", Self::format_record(&record))?;
        }
        out.flush()?;
        Ok(())
    }

    fn format_record(record: &WindowRecord) -> String {
        let handle = record.handle.value();
        format!(
            "{:<24}{:<24}{:<16}{:<32}{}",
            handle,
            format!("{handle:#x}"),
            record.process_id,
            record.process_name,
            record.title
        )
    }

    /// Runs the reparent dialog: parent then child, each parsed and checked
    /// for liveness as soon as it is read, then a single reparent call.
    pub fn set_parent<I, O>(
        &self,
        opts: &SetParentOptions,
        input: &mut I,
        out: &mut O,
    ) -> Result<PreviousParent, AppError>
    where
        I: BufRead,
        O: Write,
    {
        let prompts_parent = !opts.detach && opts.parent.is_none();
        if prompts_parent || opts.child.is_none() {
            writeln!(out, "Window Parent Setting Tool")?;
            writeln!(out, "=========================\n")?;
            writeln!(out, "Supports decimal and hexadecimal input")?;
            writeln!(out, "Hexadecimal format: 0x1234 or 1234h")?;
            writeln!(out, "Decimal format: 123456\n")?;
        }

        let new_parent = match opts.detach {
            true => None,
            false => Some(self.read_handle(HandleRole::Parent, opts.parent.as_deref(), input, out)?),
        };
        let child = self.read_handle(HandleRole::Child, opts.child.as_deref(), input, out)?;

        let previous = parent::set_parent(&self.windows, child, new_parent)?;

        writeln!(out, "\nParent set successfully!")?;
        writeln!(out, "Previous parent: {} (decimal)", previous.0)?;
        writeln!(out, "Previous parent: {:#x} (hexadecimal)", previous.0)?;
        out.flush()?;
        Ok(previous)
    }

    fn read_handle<I, O>(
        &self,
        role: HandleRole,
        given: Option<&str>,
        input: &mut I,
        out: &mut O,
    ) -> Result<ParsedHandle, AppError>
    where
        I: BufRead,
        O: Write,
    {
        let token = match given {
            Some(token) => token.to_owned(),
            None => {
                write!(out, "Enter {role} window handle: ")?;
                out.flush()?;
                let mut line = String::new();
                input.read_line(&mut line)?;
                line
            }
        };

        let parsed = handle::parse(&token).map_err(|source| AppError::Parse {
            role,
            input: token.trim().to_owned(),
            source,
        })?;
        debug!(event = "app.handle_parsed", role = %role, value = parsed.value());
        parent::require_live(&self.windows, parsed, role)?;
        Ok(parsed)
    }
}

/// Operator-facing text for a failed run.
pub fn failure_report(err: &AppError) -> String {
    match err.reason() {
        Some(reason) => format!("{err}\nReason: {reason}"),
        None => err.to_string(),
    }
}

/// Writes the failure report to the stream that carried the prompts.
pub fn write_failure<O: Write>(err: &AppError, out: &mut O) -> std::io::Result<()> {
    writeln!(out, "\n{}", failure_report(err))?;
    out.flush()
}

/// Turns a tool's result into its exit status, reporting failures on stdout.
pub fn finish(result: Result<(), AppError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "app.failed", code = e.code(), error = %e);
            if let Err(io) = write_failure(&e, &mut std::io::stdout().lock()) {
                debug!(event = "app.report_failed", error = %io);
            }
            ExitCode::from(e.code())
        }
    }
}
