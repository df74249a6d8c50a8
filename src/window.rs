use std::cell::Cell;
use std::thread;

use tracing::{debug, info, warn};
use windows::core::*;
use windows::Win32::{
    Foundation::*,
    Graphics::Gdi::*,
    System::LibraryLoader::GetModuleHandleW,
    UI::{HiDpi::*, WindowsAndMessaging::*},
};

use crate::error::AppError;
use crate::options::PointerLockOptions;
use crate::platform::win32::{release_clip_on_console_exit, Win32LockHost};
use crate::pointer_lock::{caption, tick, toggle_key_label, ClipGuard, ClipState};

/// Demo window the cursor is confined to.
pub struct Overlay {
    main: Cell<HWND>,
    locked: Cell<bool>,
}

impl Overlay {
    const WIDTH: i32 = 640;
    const HEIGHT: i32 = 480;
    const BANNER: &'static str = "Cursor locked";
    const BANNER_HEIGHT: i32 = 48;

    pub fn new(title: &str) -> Result<Box<Self>> {
        unsafe {
            let instance = GetModuleHandleW(None)?;

            let window_class = w!("window_utils.pointer_lock");
            let wc = WNDCLASSW {
                hCursor: LoadCursorW(None, IDC_ARROW)?,
                hInstance: instance.into(),
                lpszClassName: window_class,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(Self::wndproc),
                ..Default::default()
            };

            let atom = RegisterClassW(&wc);
            debug_assert!(atom != 0);

            let mut result = Box::new(Self {
                main: Cell::new(HWND::default()),
                locked: Cell::new(true),
            });

            CreateWindowExW(
                WS_EX_CLIENTEDGE,
                window_class,
                &HSTRING::from(title),
                WS_OVERLAPPEDWINDOW | WS_VISIBLE,
                0,
                0,
                Self::WIDTH,
                Self::HEIGHT,
                None,
                None,
                instance,
                Some(result.as_mut() as *mut _ as _),
            )?;

            Ok(result)
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.main.get()
    }

    /// Drains queued messages without blocking. `false` once WM_QUIT arrives.
    pub fn pump_messages() -> bool {
        unsafe {
            let mut message = MSG::default();
            while PeekMessageW(&mut message, None, 0, 0, PM_REMOVE).as_bool() {
                if message.message == WM_QUIT {
                    return false;
                }
                let _ = TranslateMessage(&message);
                DispatchMessageW(&message);
            }
        }
        true
    }

    /// Updates the caption and repaints the banner for the new lock state.
    pub fn show_state(&self, title: &str, locked: bool) {
        self.locked.set(locked);
        let main = self.main.get();
        unsafe {
            let _ = SetWindowTextW(main, &HSTRING::from(title));
            let _ = InvalidateRect(main, None, true);
        }
    }

    extern "system" fn wndproc(
        window: HWND,
        message: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        unsafe {
            if message == WM_NCCREATE {
                let cs = lparam.0 as *const CREATESTRUCTW;
                let this = (*cs).lpCreateParams as *const Self;
                (*this).main.set(window);

                SetWindowLongPtrW(window, GWLP_USERDATA, this as _);
            } else {
                let this = GetWindowLongPtrW(window, GWLP_USERDATA) as *const Self;

                if !this.is_null() {
                    return (*this).message_handler(message, wparam, lparam);
                }
            }

            DefWindowProcW(window, message, wparam, lparam)
        }
    }

    fn message_handler(&self, message: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        unsafe {
            match message {
                WM_DESTROY => {
                    PostQuitMessage(0);
                    LRESULT(0)
                }
                WM_PAINT => {
                    self.on_paint();
                    LRESULT(0)
                }
                _ => DefWindowProcW(self.main.get(), message, wparam, lparam),
            }
        }
    }

    fn on_paint(&self) {
        let main = self.main.get();
        unsafe {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(main, &mut ps);
            let mut rect = RECT::default();
            if GetClientRect(main, &mut rect).is_ok() {
                FillRect(hdc, &rect, GetSysColorBrush(COLOR_WINDOW));
                if self.locked.get() {
                    let font = Self::banner_font();
                    let previous = SelectObject(hdc, font);
                    SetTextColor(hdc, COLORREF(0x0000_00FF));
                    SetBkMode(hdc, TRANSPARENT);
                    let mut text: Vec<u16> = Self::BANNER.encode_utf16().collect();
                    DrawTextW(
                        hdc,
                        &mut text,
                        &mut rect,
                        DT_CENTER | DT_VCENTER | DT_SINGLELINE,
                    );
                    SelectObject(hdc, previous);
                    let _ = DeleteObject(font);
                }
            }
            let _ = EndPaint(main, &ps);
        }
    }

    /// 48 px bold Arial. The caller deletes it after use.
    unsafe fn banner_font() -> HFONT {
        CreateFontW(
            Self::BANNER_HEIGHT,
            0,
            0,
            0,
            FW_BOLD.0 as i32,
            0,
            0,
            0,
            u32::from(DEFAULT_CHARSET.0),
            u32::from(OUT_DEFAULT_PRECIS.0),
            u32::from(CLIP_DEFAULT_PRECIS.0),
            u32::from(DEFAULT_QUALITY.0),
            u32::from(DEFAULT_PITCH.0 | FF_SWISS.0),
            w!("Arial"),
        )
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        let main = self.main.get();
        unsafe {
            if IsWindow(main).as_bool() {
                // the window procedure must not see this struct again
                SetWindowLongPtrW(main, GWLP_USERDATA, 0);
                let _ = DestroyWindow(main);
            }
        }
    }
}

pub fn set_dpiawareness_v2() {
    unsafe {
        if let Err(e) = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) {
            // already set by the embedded manifest
            debug!(event = "window.dpi_awareness_unchanged", error = %e);
        }
    }
}

/// Shows the overlay and keeps the cursor inside it until the window closes.
pub fn run_pointer_lock(opts: &PointerLockOptions) -> std::result::Result<(), AppError> {
    set_dpiawareness_v2();
    if let Err(e) = release_clip_on_console_exit() {
        warn!(event = "pointer_lock.console_handler_failed", error = %e);
    }

    let base = format!("Pointer Lock ({} to toggle)", toggle_key_label(opts.toggle_key));
    let mut state = ClipState::new();
    let overlay = Overlay::new(&caption(&base, state.active))?;
    let host = Win32LockHost::new(overlay.hwnd(), opts.toggle_key);
    let _guard = ClipGuard::new(&host);

    info!(
        event = "pointer_lock.started",
        toggle_key = opts.toggle_key,
        interval_ms = opts.interval_ms
    );

    while Overlay::pump_messages() {
        let next = tick(state, &host);
        if next.active != state.active {
            overlay.show_state(&caption(&base, next.active), next.active);
        }
        state = next;
        thread::sleep(opts.interval());
    }

    info!(event = "pointer_lock.stopped");
    Ok(())
}
