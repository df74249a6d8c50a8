use tracing::{debug, info, warn};

use crate::error::{AppError, HandleRole, OsErrorCode};
use crate::handle::ParsedHandle;
use crate::platform::WindowTable;
use crate::window_info::WindowHandle;

/// Previous parent reported by a successful reparent. 0 means the child had
/// none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousParent(pub usize);

/// Liveness query that maps a dead handle to [`AppError::InvalidHandle`].
pub fn require_live<W: WindowTable + ?Sized>(
    windows: &W,
    handle: ParsedHandle,
    role: HandleRole,
) -> Result<WindowHandle, AppError> {
    windows.resolve(handle).ok_or_else(|| {
        debug!(event = "parent.handle_not_live", role = %role, value = handle.value());
        AppError::InvalidHandle {
            role,
            value: handle.value(),
        }
    })
}

/// Makes `child` a child window of `parent`, or detaches it when `parent` is
/// `None`.
///
/// The child is checked before the parent, and the reparent primitive runs
/// only when both are live. It is attempted exactly once.
pub fn set_parent<W: WindowTable + ?Sized>(
    windows: &W,
    child: ParsedHandle,
    parent: Option<ParsedHandle>,
) -> Result<PreviousParent, AppError> {
    let child = require_live(windows, child, HandleRole::Child)?;
    let parent = parent
        .map(|p| require_live(windows, p, HandleRole::Parent))
        .transpose()?;

    info!(
        event = "parent.set_started",
        child = child.value(),
        parent = parent.map_or(0, WindowHandle::value)
    );

    let call = windows.set_parent(child, parent);

    // A window without a prior parent yields null on success, so the
    // last-error value has to be consulted as well. A failure that leaves the
    // last error at zero would still read as success here.
    if call.previous != 0 || call.last_error == OsErrorCode::SUCCESS {
        info!(event = "parent.set_completed", previous = call.previous);
        Ok(PreviousParent(call.previous))
    } else {
        let code = OsErrorCode::from_raw(call.last_error);
        warn!(event = "parent.set_failed", code = code.raw());
        Err(AppError::SetParentFailed { code })
    }
}
