use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};

use crate::handle;
use crate::pointer_lock::{DEFAULT_POLL_INTERVAL, DEFAULT_TOGGLE_KEY};

#[derive(Debug, Clone, Default, Args)]
pub struct LogOptions {
    /// Emit debug-level log events
    #[arg(short, long)]
    pub verbose: bool,

    /// Append log events to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// List visible top-level windows with their owning process
#[derive(Debug, Clone, Parser)]
#[command(name = "get-window", version)]
pub struct GetWindowOptions {
    #[command(flatten)]
    pub log: LogOptions,
}

/// Make one window the child of another
///
/// Handles may be decimal (123456) or hexadecimal (0x1234, 1234h, 1a2b).
/// Any handle not given on the command line is prompted for.
#[derive(Debug, Clone, Parser)]
#[command(name = "set-parent", version)]
pub struct SetParentOptions {
    /// Handle of the new parent window
    #[arg(long, value_name = "HANDLE", conflicts_with = "detach")]
    pub parent: Option<String>,

    /// Handle of the window to reparent
    #[arg(long, value_name = "HANDLE")]
    pub child: Option<String>,

    /// Detach the child to the desktop instead of giving it a parent
    #[arg(long)]
    pub detach: bool,

    #[command(flatten)]
    pub log: LogOptions,
}

/// Confine the cursor to a demo window, toggled by a key
#[derive(Debug, Clone, Parser)]
#[command(name = "pointer-lock", version)]
pub struct PointerLockOptions {
    /// Virtual-key code that toggles the lock (decimal or hex)
    #[arg(long, value_name = "VK", default_value_t = DEFAULT_TOGGLE_KEY, value_parser = parse_virtual_key)]
    pub toggle_key: u16,

    /// Poll interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,

    #[command(flatten)]
    pub log: LogOptions,
}

impl PointerLockOptions {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

fn parse_virtual_key(text: &str) -> Result<u16, String> {
    let parsed = handle::parse(text).map_err(|e| e.to_string())?;
    match u16::try_from(parsed.value()) {
        Ok(vk) if (1..=0xFE).contains(&vk) => Ok(vk),
        _ => Err(format!("{} is not a virtual-key code", parsed.value())),
    }
}
