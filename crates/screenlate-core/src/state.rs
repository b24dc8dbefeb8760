use std::fmt;

use screenlate_types::Rect;

/// OCR region together with the output region it feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub ocr: Rect,
    pub output: Rect,
}

/// Pipeline controller state. Auto-translation without regions cannot be
/// expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    RegionReady(Regions),
    /// `epoch` changes whenever the target regions change or auto mode is
    /// restarted, so results of older cycles can be recognized as stale.
    AutoTranslating { regions: Regions, epoch: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RegionReady,
    AutoTranslating,
}

impl PipelineState {
    pub fn phase(&self) -> Phase {
        match self {
            PipelineState::Idle => Phase::Idle,
            PipelineState::RegionReady(_) => Phase::RegionReady,
            PipelineState::AutoTranslating { .. } => Phase::AutoTranslating,
        }
    }

    pub fn regions(&self) -> Option<Regions> {
        match self {
            PipelineState::Idle => None,
            PipelineState::RegionReady(regions) => Some(*regions),
            PipelineState::AutoTranslating { regions, .. } => Some(*regions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneShotKind {
    Ocr,
    Translate,
}

impl fmt::Display for OneShotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneShotKind::Ocr => f.write_str("one-shot OCR"),
            OneShotKind::Translate => f.write_str("one-shot translation"),
        }
    }
}

/// Toggle state of a one-shot hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OneShotSlot {
    #[default]
    Neutral,
    /// Selection or cycle under way
    Pending,
    /// Result on screen; the next press clears it
    Showing(Rect),
}
