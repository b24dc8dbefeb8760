pub mod adapters;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod overlay;
pub mod pool;
pub mod state;
pub mod stats;

#[cfg(test)]
mod tests;

pub use adapters::{FrameSource, RegionSelector, TextExtractor};
pub use controller::{PipelineController, PipelineDeps, PipelineSettings};
pub use dispatch::{QueuePoller, QueuedRegionSelector, UiCommand, UiDispatcher, ui_channel};
pub use error::{CaptureError, RecognitionError};
pub use overlay::{OverlayRegistry, OverlaySurface};
pub use pool::WorkerPool;
pub use state::{OneShotKind, OneShotSlot, Phase, PipelineState, Regions};
pub use stats::{PipelineStats, StatsSnapshot};
