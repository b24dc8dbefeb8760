use screenlate_core::{OverlayRegistry, UiCommand};
use slint::ComponentHandle;

use crate::SelectionWindow;
use crate::overlay::SlintOverlay;
use crate::selection::begin_selection;

/// Everything owned by the GUI thread
pub struct UiState {
    overlays: OverlayRegistry<SlintOverlay>,
    selection: Option<SelectionWindow>,
}

impl UiState {
    pub fn new(surface: SlintOverlay) -> Self {
        Self {
            overlays: OverlayRegistry::new(surface),
            selection: None,
        }
    }

    pub fn close_all(&mut self) {
        self.overlays.clear_all();
        if let Some(selection) = self.selection.take() {
            selection.hide().ok();
        }
    }
}

pub fn handle_command(state: &mut UiState, command: UiCommand) {
    match command {
        UiCommand::UpdateOverlay { region, text } => {
            state.overlays.update(region, &text);
        }
        UiCommand::SelectRegion { reply } => {
            // A stale selector drops its reply, which its requester reads as cancel
            if let Some(previous) = state.selection.take() {
                previous.hide().ok();
            }
            state.selection = begin_selection(reply);
        }
        UiCommand::Quit => {
            tracing::debug!("[SLINT] Quit requested");
            state.close_all();
            slint::quit_event_loop().ok();
        }
    }
}
