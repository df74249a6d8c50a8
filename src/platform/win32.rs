use std::ffi::c_void;
use std::mem::size_of;

use tracing::{debug, warn};
use windows::Win32::{
    Foundation::{CloseHandle, GetLastError, SetLastError, BOOL, HANDLE, HWND, LPARAM, RECT, WIN32_ERROR},
    System::Console::SetConsoleCtrlHandler,
    System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
        TH32CS_SNAPPROCESS,
    },
    UI::{
        Input::KeyboardAndMouse::GetAsyncKeyState,
        WindowsAndMessaging::{
            ClipCursor, EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW,
            GetWindowThreadProcessId, IsWindow, IsWindowVisible, SetParent,
        },
    },
};

use super::{
    LockHost, ProcessEntry, ProcessTable, Rect, ReparentCall, SnapshotError, WindowTable,
};
use crate::handle::ParsedHandle;
use crate::window_info::WindowHandle;

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.value() as *mut c_void)
}

/// Win32 error code carried by a `windows` error, or the raw HRESULT when it
/// does not wrap one.
fn win32_code(error: &windows::core::Error) -> u32 {
    let hr = error.code().0 as u32;
    match hr & 0xFFFF_0000 {
        0x8007_0000 => hr & 0xFFFF,
        _ => hr,
    }
}

fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

unsafe extern "system" fn collect_window(window: HWND, lparam: LPARAM) -> BOOL {
    let handles = &mut *(lparam.0 as *mut Vec<WindowHandle>);
    handles.push(WindowHandle::from_raw(window.0 as usize));
    BOOL(1)
}

/// The live desktop of the current session.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Desktop;

impl WindowTable for Win32Desktop {
    fn top_level_windows(&self) -> Vec<WindowHandle> {
        let mut handles: Vec<WindowHandle> = Vec::new();
        unsafe {
            if let Err(e) = EnumWindows(
                Some(collect_window),
                LPARAM(&mut handles as *mut Vec<WindowHandle> as isize),
            ) {
                warn!(
                    event = "win32.enum_windows_failed",
                    error = %e,
                    collected = handles.len()
                );
            }
        }
        handles
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        unsafe { IsWindowVisible(hwnd(window)).as_bool() }
    }

    fn title_len(&self, window: WindowHandle) -> usize {
        let len = unsafe { GetWindowTextLengthW(hwnd(window)) };
        usize::try_from(len).unwrap_or(0)
    }

    fn title(&self, window: WindowHandle) -> String {
        let mut buffer = vec![0u16; self.title_len(window) + 1];
        let copied = unsafe { GetWindowTextW(hwnd(window), &mut buffer) };
        let copied = usize::try_from(copied).unwrap_or(0).min(buffer.len());
        String::from_utf16_lossy(&buffer[..copied])
    }

    fn process_id(&self, window: WindowHandle) -> u32 {
        let mut pid = 0u32;
        unsafe {
            GetWindowThreadProcessId(hwnd(window), Some(&mut pid));
        }
        pid
    }

    fn resolve(&self, handle: ParsedHandle) -> Option<WindowHandle> {
        let candidate = WindowHandle::from_raw(handle.value());
        unsafe { IsWindow(hwnd(candidate)) }
            .as_bool()
            .then_some(candidate)
    }

    fn set_parent(&self, child: WindowHandle, parent: Option<WindowHandle>) -> ReparentCall {
        let new_parent = parent.map(hwnd).unwrap_or_default();
        unsafe {
            // a stale code would otherwise read as a failure
            SetLastError(WIN32_ERROR(0));
            match SetParent(hwnd(child), new_parent) {
                Ok(previous) => ReparentCall {
                    previous: previous.0 as usize,
                    last_error: GetLastError().0,
                },
                Err(e) => ReparentCall {
                    previous: 0,
                    last_error: win32_code(&e),
                },
            }
        }
    }
}

struct Snapshot(HANDLE);

impl Drop for Snapshot {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

impl ProcessTable for Win32Desktop {
    fn snapshot(&self) -> Result<Vec<ProcessEntry>, SnapshotError> {
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map(Snapshot)
            .map_err(|e| {
                debug!(event = "win32.toolhelp_snapshot_failed", error = %e);
                SnapshotError::SnapshotFailed
            })?;

        let mut entry = PROCESSENTRY32W {
            dwSize: size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };
        unsafe { Process32FirstW(snapshot.0, &mut entry) }.map_err(|e| {
            debug!(event = "win32.process_first_failed", error = %e);
            SnapshotError::EnumerationFailed
        })?;

        let mut entries = Vec::new();
        loop {
            entries.push(ProcessEntry {
                pid: entry.th32ProcessID,
                exe_name: wide_to_string(&entry.szExeFile),
            });
            if unsafe { Process32NextW(snapshot.0, &mut entry) }.is_err() {
                break;
            }
        }
        debug!(event = "win32.process_snapshot_taken", count = entries.len());
        Ok(entries)
    }
}

/// Binds the cursor to one window and watches one virtual key.
#[derive(Debug)]
pub struct Win32LockHost {
    window: HWND,
    toggle_key: u16,
}

impl Win32LockHost {
    pub fn new(window: HWND, toggle_key: u16) -> Self {
        Self { window, toggle_key }
    }
}

impl LockHost for Win32LockHost {
    fn toggle_key_down(&self) -> bool {
        // high bit set while the key is physically down
        unsafe { GetAsyncKeyState(i32::from(self.toggle_key)) < 0 }
    }

    fn bound_rect(&self) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(self.window, &mut rect) }.ok()?;
        Some(Rect {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
    }

    fn clip_to(&self, rect: &Rect) {
        let rect = RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        };
        unsafe {
            let _ = ClipCursor(Some(&rect));
        }
    }

    fn release(&self) {
        unsafe {
            let _ = ClipCursor(None);
        }
    }
}

/// Runs on Ctrl+C, console close, logoff and shutdown. The default handler
/// that follows ends the process without unwinding, so `ClipGuard` never gets
/// to drop.
unsafe extern "system" fn release_clip_on_console_event(_ctrl_type: u32) -> BOOL {
    let _ = ClipCursor(None);
    // not handled: let the default routine terminate the process
    BOOL(0)
}

/// Lifts any cursor clip when the console ends the process.
pub fn release_clip_on_console_exit() -> windows::core::Result<()> {
    unsafe { SetConsoleCtrlHandler(Some(release_clip_on_console_event), true) }
}
