use std::time::Duration;

use tracing::{debug, info};

use crate::platform::LockHost;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Virtual-key code of ESC.
pub const DEFAULT_TOGGLE_KEY: u16 = 0x1B;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipState {
    pub active: bool,
    pub last_key_pressed: bool,
}

impl Default for ClipState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipState {
    /// Locking starts active.
    pub const fn new() -> Self {
        Self {
            active: true,
            last_key_pressed: false,
        }
    }

    /// Flips `active` on a rising edge of the toggle key only.
    #[must_use]
    pub const fn step(self, key_pressed: bool) -> Self {
        let rising = key_pressed && !self.last_key_pressed;
        Self {
            active: self.active != rising,
            last_key_pressed: key_pressed,
        }
    }
}

/// One poll of the lock loop: read the key, update the state, then clip the
/// cursor to the window's current rectangle or lift the clip.
pub fn tick<H: LockHost + ?Sized>(state: ClipState, host: &H) -> ClipState {
    let next = state.step(host.toggle_key_down());
    if next.active != state.active {
        info!(event = "pointer_lock.toggled", active = next.active);
    }

    if next.active {
        match host.bound_rect() {
            Some(rect) => host.clip_to(&rect),
            None => debug!(event = "pointer_lock.rect_unavailable"),
        }
    } else {
        host.release();
    }
    next
}

/// Window caption for the current lock state.
pub fn caption(base: &str, locked: bool) -> String {
    let state = if locked { "Locked" } else { "Unlocked" };
    format!("{base} - {state}")
}

pub fn toggle_key_label(vk: u16) -> String {
    match vk {
        DEFAULT_TOGGLE_KEY => "ESC".to_owned(),
        other => format!("key 0x{other:02X}"),
    }
}

/// Lifts the cursor clip when dropped, whichever way the loop ends.
pub struct ClipGuard<'a, H: LockHost + ?Sized> {
    host: &'a H,
}

impl<'a, H: LockHost + ?Sized> ClipGuard<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }
}

impl<H: LockHost + ?Sized> Drop for ClipGuard<'_, H> {
    fn drop(&mut self) {
        self.host.release();
        debug!(event = "pointer_lock.clip_released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Rect;
    use crate::testing::{ClipCall, FakeLockHost};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    const RECT: Rect = Rect {
        left: 10,
        top: 20,
        right: 650,
        bottom: 500,
    };

    #[test]
    fn starts_active() {
        assert!(ClipState::new().active);
        assert!(!ClipState::default().last_key_pressed);
    }

    #[test]
    fn rising_edge_flips() {
        let state = ClipState::new().step(true);
        assert!(!state.active);
        assert!(state.last_key_pressed);
    }

    #[test]
    fn holding_the_key_flips_once() {
        let state = ClipState::new().step(true).step(true).step(true);
        assert!(!state.active);
    }

    #[test]
    fn release_then_press_flips_back() {
        let state = ClipState::new().step(true).step(false).step(true);
        assert!(state.active);
        assert_eq!(ClipState::new().step(false), ClipState::new());
    }

    #[test]
    fn caption_tracks_state() {
        assert_eq!(caption("Pointer Lock (ESC to toggle)", true), "Pointer Lock (ESC to toggle) - Locked");
        assert_eq!(caption("x", false), "x - Unlocked");
        assert_eq!(toggle_key_label(0x1B), "ESC");
        assert_eq!(toggle_key_label(0x7B), "key 0x7B");
    }

    #[test]
    fn active_tick_reclips_to_current_rect() {
        let host = FakeLockHost::new(RECT);
        let state = tick(ClipState::new(), &host);
        let moved = Rect {
            left: 110,
            right: 750,
            ..RECT
        };
        host.move_to(moved);
        tick(state, &host);
        assert_eq!(host.calls(), vec![ClipCall::Clip(RECT), ClipCall::Clip(moved)]);
    }

    #[test]
    fn inactive_tick_releases() {
        let host = FakeLockHost::new(RECT);
        host.press(true);
        let state = tick(ClipState::new(), &host);
        assert!(!state.active);
        assert_eq!(host.calls(), vec![ClipCall::Release]);
    }

    #[test]
    fn missing_rect_skips_clip() {
        let host = FakeLockHost::new(RECT);
        host.vanish();
        let state = tick(ClipState::new(), &host);
        assert!(state.active);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn guard_releases_once_on_normal_exit() {
        let host = FakeLockHost::new(RECT);
        {
            let _guard = ClipGuard::new(&host);
            let mut state = ClipState::new();
            for _ in 0..3 {
                state = tick(state, &host);
            }
        }
        assert_eq!(host.release_count(), 1);
    }

    #[test]
    fn guard_releases_once_on_panic() {
        let host = FakeLockHost::new(RECT);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = ClipGuard::new(&host);
            tick(ClipState::new(), &host);
            panic!("loop aborted");
        }));
        assert!(result.is_err());
        assert_eq!(host.release_count(), 1);
        assert_eq!(host.calls().last(), Some(&ClipCall::Release));
    }

    #[test]
    fn guard_without_prior_clip_still_releases() {
        let host = FakeLockHost::new(RECT);
        drop(ClipGuard::new(&host));
        assert_eq!(host.calls(), vec![ClipCall::Release]);
    }
}
