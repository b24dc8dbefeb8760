use screenlate_config::overlay::OverlayConfig;
use screenlate_core::OverlaySurface;
use screenlate_types::Rect;
use slint::{ComponentHandle, PhysicalPosition, PhysicalSize};

use crate::OverlayWindow;
use crate::clickthrough::make_click_through;

/// Overlay windows backed by slint
pub struct SlintOverlay {
    font_family: String,
    font_size: f32,
    wrap_width: f32,
}

impl SlintOverlay {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            font_size: config.font_size as f32,
            wrap_width: config.wrap_width as f32,
        }
    }
}

fn place(window: &OverlayWindow, region: Rect) {
    let handle = window.window();
    handle.set_position(PhysicalPosition::new(region.left(), region.top()));
    handle.set_size(PhysicalSize::new(region.width(), region.height()));
}

impl OverlaySurface for SlintOverlay {
    type Window = OverlayWindow;

    fn open(&mut self, region: Rect, text: &str) -> anyhow::Result<OverlayWindow> {
        let window = OverlayWindow::new()?;
        window.set_font_family(self.font_family.as_str().into());
        window.set_font_size(self.font_size);
        window.set_wrap_width(self.wrap_width);
        window.set_text(text.into());

        place(&window, region);
        window.show()?;
        // Some platforms only honor the position once the window is mapped
        place(&window, region);
        if let Err(e) = make_click_through(window.window()) {
            tracing::warn!("[SLINT] Overlay at {region} will catch mouse input: {e:#}");
        }

        tracing::debug!("[SLINT] Overlay shown at {region}");
        Ok(window)
    }

    fn set_text(&mut self, window: &mut OverlayWindow, text: &str) {
        window.set_text(text.into());
    }

    fn close(&mut self, window: OverlayWindow) {
        if let Err(e) = window.hide() {
            tracing::warn!("[SLINT] Failed to hide overlay: {e}");
        }
    }
}
