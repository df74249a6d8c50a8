//! In-memory desktop used by the unit tests.

#![cfg(test)]

use std::cell::{Cell, RefCell};

use crate::handle::ParsedHandle;
use crate::platform::{
    LockHost, ProcessEntry, ProcessTable, Rect, ReparentCall, SnapshotError, WindowTable,
};
use crate::window_info::WindowHandle;

pub struct FakeWindow {
    handle: usize,
    title: String,
    visible: bool,
    pid: u32,
}

impl FakeWindow {
    pub fn new(handle: usize, title: &str) -> Self {
        Self {
            handle,
            title: title.to_owned(),
            visible: true,
            pid: 1,
        }
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

pub struct FakeDesktop {
    windows: Vec<FakeWindow>,
    outcome: ReparentCall,
    reparented: RefCell<Vec<(usize, Option<usize>)>>,
}

impl FakeDesktop {
    pub fn new(windows: Vec<FakeWindow>) -> Self {
        Self {
            windows,
            outcome: ReparentCall {
                previous: 0,
                last_error: 0,
            },
            reparented: RefCell::new(Vec::new()),
        }
    }

    pub fn reparent_outcome(mut self, outcome: ReparentCall) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn reparent_calls(&self) -> Vec<(usize, Option<usize>)> {
        self.reparented.borrow().clone()
    }

    fn window(&self, handle: WindowHandle) -> Option<&FakeWindow> {
        self.windows.iter().find(|w| w.handle == handle.value())
    }
}

impl WindowTable for FakeDesktop {
    fn top_level_windows(&self) -> Vec<WindowHandle> {
        self.windows
            .iter()
            .map(|w| WindowHandle::from_raw(w.handle))
            .collect()
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        self.window(window).is_some_and(|w| w.visible)
    }

    fn title_len(&self, window: WindowHandle) -> usize {
        self.window(window).map_or(0, |w| w.title.encode_utf16().count())
    }

    fn title(&self, window: WindowHandle) -> String {
        self.window(window).map(|w| w.title.clone()).unwrap_or_default()
    }

    fn process_id(&self, window: WindowHandle) -> u32 {
        self.window(window).map_or(0, |w| w.pid)
    }

    fn resolve(&self, handle: ParsedHandle) -> Option<WindowHandle> {
        self.windows
            .iter()
            .find(|w| w.handle == handle.value())
            .map(|w| WindowHandle::from_raw(w.handle))
    }

    fn set_parent(&self, child: WindowHandle, parent: Option<WindowHandle>) -> ReparentCall {
        self.reparented
            .borrow_mut()
            .push((child.value(), parent.map(WindowHandle::value)));
        self.outcome
    }
}

pub struct FakeProcesses {
    result: Result<Vec<ProcessEntry>, SnapshotError>,
    calls: Cell<usize>,
}

impl FakeProcesses {
    pub fn with(entries: &[(u32, &str)]) -> Self {
        Self {
            result: Ok(entries
                .iter()
                .map(|&(pid, name)| ProcessEntry {
                    pid,
                    exe_name: name.to_owned(),
                })
                .collect()),
            calls: Cell::new(0),
        }
    }

    pub fn failing(error: SnapshotError) -> Self {
        Self {
            result: Err(error),
            calls: Cell::new(0),
        }
    }

    pub fn snapshot_calls(&self) -> usize {
        self.calls.get()
    }
}

impl ProcessTable for FakeProcesses {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, SnapshotError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipCall {
    Clip(Rect),
    Release,
}

pub struct FakeLockHost {
    rect: Cell<Option<Rect>>,
    key_down: Cell<bool>,
    calls: RefCell<Vec<ClipCall>>,
}

impl FakeLockHost {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(Some(rect)),
            key_down: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn press(&self, down: bool) {
        self.key_down.set(down);
    }

    pub fn move_to(&self, rect: Rect) {
        self.rect.set(Some(rect));
    }

    pub fn vanish(&self) {
        self.rect.set(None);
    }

    pub fn calls(&self) -> Vec<ClipCall> {
        self.calls.borrow().clone()
    }

    pub fn release_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| **c == ClipCall::Release)
            .count()
    }
}

impl LockHost for FakeLockHost {
    fn toggle_key_down(&self) -> bool {
        self.key_down.get()
    }

    fn bound_rect(&self) -> Option<Rect> {
        self.rect.get()
    }

    fn clip_to(&self, rect: &Rect) {
        self.calls.borrow_mut().push(ClipCall::Clip(*rect));
    }

    fn release(&self) {
        self.calls.borrow_mut().push(ClipCall::Release);
    }
}
