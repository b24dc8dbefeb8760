use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use screenlate_config::overlay::OverlayConfig;
use screenlate_core::{QueuePoller, UiCommand};

mod clickthrough;
mod events;
mod overlay;
mod selection;

pub use events::{UiState, handle_command};
pub use overlay::SlintOverlay;
pub use selection::drag_to_rect;

slint::include_modules!();

/// Run the GUI event loop on the calling thread until a quit command arrives
/// or every dispatcher is dropped. Overlay commands are drained by a slint
/// timer every `poll_interval_ms`.
pub fn ui_loop(commands: kanal::Receiver<UiCommand>, config: &OverlayConfig) -> anyhow::Result<()> {
    let poller = QueuePoller::new(commands, Duration::from_millis(config.poll_interval_ms));
    let state = Rc::new(RefCell::new(UiState::new(SlintOverlay::new(config))));

    let timer = slint::Timer::default();
    {
        let state = state.clone();
        let interval = poller.interval();
        timer.start(slint::TimerMode::Repeated, interval, move || {
            let mut state = state.borrow_mut();
            poller.poll_once(|command| handle_command(&mut state, command));
            if poller.is_closed() {
                tracing::debug!("[SLINT] Command queue closed");
                slint::quit_event_loop().ok();
            }
        });
    }

    slint::run_event_loop_until_quit()?;
    timer.stop();
    state.borrow_mut().close_all();
    Ok(())
}
