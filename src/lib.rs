//! Window handle parsing, window enumeration, reparenting and cursor
//! clipping for the `get-window`, `set-parent` and `pointer-lock` tools.

pub mod app;
pub mod enumerate;
pub mod error;
pub mod handle;
pub mod logger;
pub mod options;
pub mod parent;
pub mod platform;
pub mod pointer_lock;
pub mod window_info;
#[cfg(windows)]
pub mod window;

#[cfg(test)]
mod testing;

pub use error::AppError;
pub use window_info::{ProcessName, WindowHandle, WindowRecord};
