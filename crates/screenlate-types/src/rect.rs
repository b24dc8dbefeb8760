use std::fmt;

use serde::{Deserialize, Serialize};

/// Screen rectangle in absolute coordinates, stored as a corner pair.
///
/// Corners are always normalized so `left <= right` and `top <= bottom`.
/// A rectangle with zero area means "no region".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

/// Origin + size form used by capture backends and config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Bounding rectangle of a drag gesture, `None` when nothing was dragged
    pub fn from_drag(start: (i32, i32), end: (i32, i32)) -> Option<Self> {
        Rect::new(start.0, start.1, end.0, end.1).non_empty()
    }

    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect::new(
            x,
            y,
            x.saturating_add_unsigned(width),
            y.saturating_add_unsigned(height),
        )
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    pub fn to_capture_region(&self) -> CaptureRegion {
        CaptureRegion {
            x: self.left,
            y: self.top,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Output rectangle for a source region: same size, stacked above it with
    /// `margin` pixels in between, or below it when that would cross
    /// `screen_top`.
    pub fn derive_output(&self, screen_top: i32, margin: i32) -> Rect {
        let height = self.height();
        let above_bottom = self.top.saturating_sub(margin);
        let above_top = above_bottom.saturating_sub_unsigned(height);

        if above_top >= screen_top {
            Rect::new(self.left, above_top, self.right, above_bottom)
        } else {
            let below_top = self.bottom.saturating_add(margin);
            Rect::new(
                self.left,
                below_top,
                self.right,
                below_top.saturating_add_unsigned(height),
            )
        }
    }
}

impl From<CaptureRegion> for Rect {
    fn from(region: CaptureRegion) -> Self {
        Rect::from_origin_size(region.x, region.y, region.width, region.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
