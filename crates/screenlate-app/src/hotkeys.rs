use std::collections::HashMap;

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use screenlate_types::Action;

/// Forwards global hotkey presses to the event loop as actions
pub struct HotkeyRouter {
    actions: HashMap<u32, Action>,
    tx: kanal::Sender<Action>,
}

impl HotkeyRouter {
    pub fn new(actions: HashMap<u32, Action>, tx: kanal::Sender<Action>) -> Self {
        Self { actions, tx }
    }

    /// Returns the action a key press was routed to. Releases and unknown
    /// hotkeys are ignored.
    pub fn route(&self, event: GlobalHotKeyEvent) -> Option<Action> {
        if event.state != HotKeyState::Pressed {
            return None;
        }
        let action = *self.actions.get(&event.id)?;

        match self.tx.try_send(action) {
            Ok(true) => tracing::debug!("Hotkey pressed: {action}"),
            Ok(false) => tracing::warn!("Action queue full, dropping {action}"),
            Err(_) => tracing::debug!("Event loop gone, dropping {action}"),
        }
        Some(action)
    }

    /// Route events straight from the platform hotkey callback
    pub fn install(self) {
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            self.route(event);
        }));
    }

    pub fn uninstall() {
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
    }
}
