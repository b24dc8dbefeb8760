use std::cell::RefCell;
use std::rc::Rc;

use screenlate_types::Rect;
use slint::{CloseRequestResponse, ComponentHandle};

use crate::SelectionWindow;

type Reply = Rc<RefCell<Option<kanal::Sender<Option<Rect>>>>>;

/// Convert a drag in window-local logical pixels to absolute screen pixels
pub fn drag_to_rect(
    origin: (i32, i32),
    scale: f32,
    start: (f32, f32),
    end: (f32, f32),
) -> Option<Rect> {
    let to_screen = |(x, y): (f32, f32)| {
        (
            origin.0 + (x * scale).round() as i32,
            origin.1 + (y * scale).round() as i32,
        )
    };
    Rect::from_drag(to_screen(start), to_screen(end))
}

/// Answer the pending request once; later calls are no-ops
fn answer(reply: &Reply, region: Option<Rect>) {
    if let Some(tx) = reply.borrow_mut().take() {
        tx.send(region).ok();
    }
}

/// Open the selector and answer `reply` when the user finishes. The window is
/// hidden on every exit path. Returns the window so the caller keeps it alive.
pub fn begin_selection(reply: kanal::Sender<Option<Rect>>) -> Option<SelectionWindow> {
    let reply: Reply = Rc::new(RefCell::new(Some(reply)));

    let window = match SelectionWindow::new() {
        Ok(window) => window,
        Err(e) => {
            tracing::error!("[SLINT] Failed to create selection window: {e}");
            answer(&reply, None);
            return None;
        }
    };

    {
        let reply = reply.clone();
        let weak = window.as_weak();
        window.on_selected(move |x1, y1, x2, y2| {
            let Some(window) = weak.upgrade() else {
                answer(&reply, None);
                return;
            };
            let handle = window.window();
            let position = handle.position();
            let region = drag_to_rect(
                (position.x, position.y),
                handle.scale_factor(),
                (x1, y1),
                (x2, y2),
            );
            window.hide().ok();
            answer(&reply, region);
        });
    }

    {
        let reply = reply.clone();
        let weak = window.as_weak();
        window.on_cancelled(move || {
            if let Some(window) = weak.upgrade() {
                window.hide().ok();
            }
            answer(&reply, None);
        });
    }

    {
        let reply = reply.clone();
        window.window().on_close_requested(move || {
            answer(&reply, None);
            CloseRequestResponse::HideWindow
        });
    }

    window.window().set_fullscreen(true);
    if let Err(e) = window.show() {
        tracing::error!("[SLINT] Failed to show selection window: {e}");
        answer(&reply, None);
        return None;
    }

    Some(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_scaled_and_offset() {
        let rect = drag_to_rect((1920, 0), 1.5, (100.0, 40.0), (20.0, 10.0)).unwrap();
        assert_eq!(rect, Rect::new(1950, 15, 2070, 60));
    }

    #[test]
    fn test_click_without_drag_is_none() {
        assert_eq!(drag_to_rect((0, 0), 1.0, (5.0, 5.0), (5.0, 5.0)), None);
    }
}
