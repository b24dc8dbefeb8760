use std::fmt;
use std::time::Duration;

use screenlate_types::Rect;

use crate::adapters::RegionSelector;

/// Requests for the GUI thread. Only the GUI thread touches windows; every
/// other thread goes through this queue.
pub enum UiCommand {
    /// Show `text` at `region`; empty text closes the overlay there
    UpdateOverlay { region: Rect, text: String },
    /// Run the interactive selector and answer on `reply`
    SelectRegion { reply: kanal::Sender<Option<Rect>> },
    Quit,
}

impl fmt::Debug for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiCommand::UpdateOverlay { region, text } => f
                .debug_struct("UpdateOverlay")
                .field("region", region)
                .field("text", text)
                .finish(),
            UiCommand::SelectRegion { .. } => f.write_str("SelectRegion"),
            UiCommand::Quit => f.write_str("Quit"),
        }
    }
}

/// Thread-safe handle for queueing work onto the GUI thread
#[derive(Clone)]
pub struct UiDispatcher {
    tx: kanal::Sender<UiCommand>,
}

pub fn ui_channel() -> (UiDispatcher, kanal::Receiver<UiCommand>) {
    let (tx, rx) = kanal::unbounded();
    (UiDispatcher { tx }, rx)
}

impl UiDispatcher {
    pub fn update(&self, region: Rect, text: impl Into<String>) {
        self.send(UiCommand::UpdateOverlay {
            region,
            text: text.into(),
        });
    }

    pub fn clear(&self, region: Rect) {
        self.update(region, String::new());
    }

    pub fn quit(&self) {
        self.send(UiCommand::Quit);
    }

    /// Ask the GUI thread for a selection and block until it answers
    pub fn request_selection(&self) -> Option<Rect> {
        let (reply, answer) = kanal::bounded(1);
        if !self.send(UiCommand::SelectRegion { reply }) {
            return None;
        }
        answer.recv().ok().flatten()
    }

    fn send(&self, command: UiCommand) -> bool {
        match self.tx.send(command) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("UI thread is gone, dropping command");
                false
            }
        }
    }
}

/// Selector whose interaction runs on the GUI thread
pub struct QueuedRegionSelector {
    ui: UiDispatcher,
}

impl QueuedRegionSelector {
    pub fn new(ui: UiDispatcher) -> Self {
        Self { ui }
    }
}

impl RegionSelector for QueuedRegionSelector {
    fn select(&self) -> Option<Rect> {
        self.ui.request_selection()
    }
}

/// Periodic drain of a cross-thread queue, independent of any toolkit timer.
/// The owner calls `poll_once` every `interval` from the consuming thread.
pub struct QueuePoller<T> {
    rx: kanal::Receiver<T>,
    interval: Duration,
}

impl<T> QueuePoller<T> {
    pub fn new(rx: kanal::Receiver<T>, interval: Duration) -> Self {
        Self { rx, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Apply every queued item in arrival order; returns how many were applied
    pub fn poll_once(&self, mut apply: impl FnMut(T)) -> usize {
        let mut applied = 0;
        while let Ok(Some(item)) = self.rx.try_recv() {
            apply(item);
            applied += 1;
        }
        applied
    }

    /// True once every sender is gone and nothing more can arrive
    pub fn is_closed(&self) -> bool {
        self.rx.is_disconnected() && self.rx.is_empty()
    }
}
