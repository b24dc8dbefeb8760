/// Let mouse input fall through `window` to whatever is underneath.
/// Only Windows is supported; elsewhere the window keeps catching input.
pub fn make_click_through(window: &slint::Window) -> anyhow::Result<()> {
    #[cfg(windows)]
    {
        platform::apply(platform::hwnd_of(window)?)
    }

    #[cfg(not(windows))]
    {
        let _ = window;
        tracing::debug!("[SLINT] Click-through overlays are only supported on Windows");
        Ok(())
    }
}

#[cfg(windows)]
mod platform {
    use anyhow::{Context, Result, bail};
    use raw_window_handle::{HasWindowHandle, RawWindowHandle};
    use windows::Win32::Foundation::{COLORREF, HWND};
    use windows::Win32::UI::WindowsAndMessaging::{
        GWL_EXSTYLE, GetWindowLongPtrW, LWA_ALPHA, SetLayeredWindowAttributes, SetWindowLongPtrW,
        WINDOW_EX_STYLE, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TRANSPARENT,
    };

    /// Transparent to hit-testing, never focused, kept out of Alt+Tab
    pub fn click_through_ex_style(current: WINDOW_EX_STYLE) -> WINDOW_EX_STYLE {
        current | WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE
    }

    pub fn hwnd_of(window: &slint::Window) -> Result<HWND> {
        let handle = window.window_handle();
        let raw = handle
            .window_handle()
            .context("Overlay has no native window yet")?
            .as_raw();
        match raw {
            RawWindowHandle::Win32(win32) => Ok(HWND(win32.hwnd.get() as *mut _)),
            other => bail!("Unexpected window handle {other:?}"),
        }
    }

    pub fn apply(hwnd: HWND) -> Result<()> {
        unsafe {
            let current = WINDOW_EX_STYLE(GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32);
            SetWindowLongPtrW(hwnd, GWL_EXSTYLE, click_through_ex_style(current).0 as isize);
            // Layered windows are not drawn until their attributes are set
            SetLayeredWindowAttributes(hwnd, COLORREF(0), 255, LWA_ALPHA)
                .context("SetLayeredWindowAttributes failed")
        }
    }

}
