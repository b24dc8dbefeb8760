use screenlate_core::{CaptureError, FrameSource};
use screenlate_types::{Frame, Rect};
use xcap::Monitor;
use xcap::image::RgbaImage;

/// Screen capture through xcap. Regions must lie on a single monitor.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapFrameSource;

impl XcapFrameSource {
    pub fn new() -> Self {
        Self
    }
}

fn monitor_bounds(monitor: &Monitor) -> Rect {
    Rect::from_origin_size(monitor.x(), monitor.y(), monitor.width(), monitor.height())
}

fn find_monitor(region: Rect) -> Result<(Monitor, Rect), CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
    monitors
        .into_iter()
        .map(|monitor| {
            let bounds = monitor_bounds(&monitor);
            (monitor, bounds)
        })
        .find(|(_, bounds)| bounds.contains(&region))
        .ok_or(CaptureError::OffScreen(region))
}

/// Cut `region` out of a full-monitor capture whose top-left is at
/// `bounds`. `region` must lie within `bounds`.
pub fn crop_frame(image: &RgbaImage, bounds: Rect, region: Rect) -> Frame {
    let cropped = xcap::image::imageops::crop_imm(
        image,
        region.left().abs_diff(bounds.left()),
        region.top().abs_diff(bounds.top()),
        region.width(),
        region.height(),
    )
    .to_image();

    Frame::new(cropped.width(), cropped.height(), cropped.into_raw())
}

impl FrameSource for XcapFrameSource {
    fn capture(&self, region: Rect) -> Result<Frame, CaptureError> {
        let (monitor, bounds) = find_monitor(region)?;
        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        Ok(crop_frame(&image, bounds, region))
    }

    fn display_bounds(&self, region: Rect) -> Option<Rect> {
        find_monitor(region).ok().map(|(_, bounds)| bounds)
    }
}
