use std::collections::HashMap;

use screenlate_types::Rect;

/// Window backend used by [`OverlayRegistry`]. Implementations live on the GUI
/// thread and are never shared with workers.
pub trait OverlaySurface {
    type Window;

    fn open(&mut self, region: Rect, text: &str) -> anyhow::Result<Self::Window>;

    fn set_text(&mut self, window: &mut Self::Window, text: &str);

    fn close(&mut self, window: Self::Window);
}

struct Entry<W> {
    window: W,
    text: String,
}

/// One overlay window per active rectangle
pub struct OverlayRegistry<S: OverlaySurface> {
    surface: S,
    windows: HashMap<Rect, Entry<S::Window>>,
}

impl<S: OverlaySurface> OverlayRegistry<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            windows: HashMap::new(),
        }
    }

    /// Show `text` at `region`. Empty text closes the window for `region`,
    /// which is a no-op if none is open.
    pub fn update(&mut self, region: Rect, text: &str) {
        if region.is_empty() {
            tracing::debug!("Ignoring overlay update for empty region {region}");
            return;
        }

        if text.is_empty() {
            self.remove(region);
            return;
        }

        if let Some(entry) = self.windows.get_mut(&region) {
            if entry.text != text {
                self.surface.set_text(&mut entry.window, text);
                entry.text = text.to_string();
            }
            return;
        }

        match self.surface.open(region, text) {
            Ok(window) => {
                tracing::debug!("Opened overlay at {region}");
                self.windows.insert(
                    region,
                    Entry {
                        window,
                        text: text.to_string(),
                    },
                );
            }
            Err(e) => tracing::warn!("Failed to open overlay at {region}: {e:#}"),
        }
    }

    pub fn remove(&mut self, region: Rect) {
        if let Some(entry) = self.windows.remove(&region) {
            tracing::debug!("Closing overlay at {region}");
            self.surface.close(entry.window);
        }
    }

    pub fn clear_all(&mut self) {
        for (_, entry) in self.windows.drain() {
            self.surface.close(entry.window);
        }
    }

    pub fn text(&self, region: Rect) -> Option<&str> {
        self.windows.get(&region).map(|entry| entry.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
