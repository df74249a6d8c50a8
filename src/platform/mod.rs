//! OS primitives consumed by the tools.
//!
//! The enumerator, the parent binder and the pointer-lock loop only talk to
//! the desktop through these traits. [`win32`] implements them on Windows.

#[cfg(windows)]
pub mod win32;

use thiserror::Error;

use crate::handle::ParsedHandle;
use crate::window_info::WindowHandle;

/// Raw outcome of the reparent primitive, before success is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReparentCall {
    /// Previous parent, 0 when the primitive returned null.
    pub previous: usize,
    /// Thread last-error value read right after the call.
    pub last_error: u32,
}

pub trait WindowTable {
    /// Top-level windows in OS enumeration order.
    fn top_level_windows(&self) -> Vec<WindowHandle>;
    fn is_visible(&self, window: WindowHandle) -> bool;
    fn title_len(&self, window: WindowHandle) -> usize;
    fn title(&self, window: WindowHandle) -> String;
    fn process_id(&self, window: WindowHandle) -> u32;
    /// Liveness query. `None` when the value names no window right now.
    fn resolve(&self, handle: ParsedHandle) -> Option<WindowHandle>;
    /// Reparents `child`; `None` detaches it to the desktop.
    fn set_parent(&self, child: WindowHandle, parent: Option<WindowHandle>) -> ReparentCall;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub exe_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("process snapshot could not be taken")]
    SnapshotFailed,
    #[error("first process entry could not be read")]
    EnumerationFailed,
}

pub trait ProcessTable {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, SnapshotError>;
}

/// Screen rectangle in pixels, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// What the pointer-lock loop needs from the desktop on each tick.
pub trait LockHost {
    fn toggle_key_down(&self) -> bool;
    /// Current screen rectangle of the window the cursor is bound to.
    fn bound_rect(&self) -> Option<Rect>;
    fn clip_to(&self, rect: &Rect);
    /// Lifts any clip. Safe to call when nothing is clipped.
    fn release(&self);
}
