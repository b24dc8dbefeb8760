use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use screenlate_translator::Translator;
use screenlate_types::{Action, Rect};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::adapters::{FrameSource, RegionSelector, TextExtractor};
use crate::dispatch::UiDispatcher;
use crate::error::CaptureError;
use crate::pool::WorkerPool;
use crate::state::{OneShotKind, OneShotSlot, Phase, PipelineState, Regions};
use crate::stats::{PipelineStats, StatsSnapshot};

/// External collaborators of the pipeline
pub struct PipelineDeps {
    pub selector: Arc<dyn RegionSelector>,
    pub frames: Arc<dyn FrameSource>,
    pub extractor: Arc<dyn TextExtractor>,
    pub translator: Arc<dyn Translator>,
    pub ui: UiDispatcher,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub capture_interval: Duration,
    /// Gap between the OCR region and a derived output region
    pub output_margin: i32,
    pub workers: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            capture_interval: Duration::from_millis(1500),
            output_margin: 0,
            workers: 2,
        }
    }
}

struct Inner {
    state: PipelineState,
    ocr_slot: OneShotSlot,
    translate_slot: OneShotSlot,
    /// A region selector is on screen
    selecting: bool,
    /// An auto cycle is queued or running
    cycle_in_flight: bool,
    ticker: Option<CancellationToken>,
    next_epoch: u64,
}

impl Inner {
    fn bump_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }

    fn slot_mut(&mut self, kind: OneShotKind) -> &mut OneShotSlot {
        match kind {
            OneShotKind::Ocr => &mut self.ocr_slot,
            OneShotKind::Translate => &mut self.translate_slot,
        }
    }
}

/// Hotkey-driven state machine that owns the OCR and output regions and
/// schedules capture, recognition and translation on a bounded worker pool.
///
/// All region and mode state sits behind one mutex. Results reach the
/// overlays only through the [`UiDispatcher`], and auto-mode results are
/// dropped if the state changed while the cycle ran.
pub struct PipelineController {
    deps: PipelineDeps,
    settings: PipelineSettings,
    inner: Mutex<Inner>,
    pool: WorkerPool,
    stats: PipelineStats,
    shutdown: CancellationToken,
}

impl PipelineController {
    pub fn new(
        deps: PipelineDeps,
        settings: PipelineSettings,
        shutdown: CancellationToken,
    ) -> Arc<Self> {
        let pool = WorkerPool::new(settings.workers);
        Arc::new(Self {
            deps,
            settings,
            inner: Mutex::new(Inner {
                state: PipelineState::Idle,
                ocr_slot: OneShotSlot::Neutral,
                translate_slot: OneShotSlot::Neutral,
                selecting: false,
                cycle_in_flight: false,
                ticker: None,
                next_epoch: 0,
            }),
            pool,
            stats: PipelineStats::default(),
            shutdown,
        })
    }

    pub async fn handle(self: &Arc<Self>, action: Action) {
        if self.shutdown.is_cancelled() {
            tracing::debug!("Shutting down, ignoring {action}");
            return;
        }

        tracing::debug!("Handling {action}");
        match action {
            Action::SelectOcrRegion => self.select_ocr_region().await,
            Action::SelectOutputRegion => self.select_output_region().await,
            Action::ToggleAutoTranslation => self.toggle_auto_translation(),
            Action::OneShotOcr => self.one_shot(OneShotKind::Ocr).await,
            Action::OneShotTranslate => self.one_shot(OneShotKind::Translate).await,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.lock().state
    }

    pub fn phase(&self) -> Phase {
        self.lock().state.phase()
    }

    pub fn one_shot_slot(&self, kind: OneShotKind) -> OneShotSlot {
        let mut inner = self.lock();
        *inner.slot_mut(kind)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn select_ocr_region(self: &Arc<Self>) {
        match self.pick_region().await {
            Some(region) => self.set_ocr_region(region),
            None => tracing::debug!("OCR region selection cancelled"),
        }
    }

    /// Replace the OCR region and derive a fresh output region for it.
    /// Auto mode stays engaged and follows the new region.
    pub fn set_ocr_region(&self, region: Rect) {
        let Some(region) = region.non_empty() else {
            tracing::debug!("Ignoring empty OCR region");
            return;
        };

        let screen_top = self
            .deps
            .frames
            .display_bounds(region)
            .map(|bounds| bounds.top())
            .unwrap_or(0);
        let regions = Regions {
            ocr: region,
            output: region.derive_output(screen_top, self.settings.output_margin),
        };

        let mut inner = self.lock();
        let state = inner.state;
        if let Some(previous) = state.regions() {
            self.deps.ui.clear(previous.output);
        }
        let next = match state {
            PipelineState::AutoTranslating { .. } => PipelineState::AutoTranslating {
                regions,
                epoch: inner.bump_epoch(),
            },
            _ => PipelineState::RegionReady(regions),
        };
        inner.state = next;

        tracing::info!(
            "OCR region set to {}, output at {}",
            regions.ocr,
            regions.output
        );
    }

    pub async fn select_output_region(self: &Arc<Self>) {
        if self.phase() == Phase::Idle {
            tracing::info!("Select an OCR region before choosing the output region");
            return;
        }

        match self.pick_region().await {
            Some(region) => self.set_output_region(region),
            None => tracing::debug!("Output region selection cancelled"),
        }
    }

    /// Override the derived output region until the OCR region is replaced
    pub fn set_output_region(&self, region: Rect) {
        let Some(output) = region.non_empty() else {
            tracing::debug!("Ignoring empty output region");
            return;
        };

        let mut inner = self.lock();
        let state = inner.state;
        let next = match state {
            PipelineState::Idle => {
                tracing::debug!("No OCR region, ignoring output region");
                return;
            }
            PipelineState::RegionReady(regions) => {
                self.deps.ui.clear(regions.output);
                PipelineState::RegionReady(Regions { output, ..regions })
            }
            PipelineState::AutoTranslating { regions, .. } => {
                self.deps.ui.clear(regions.output);
                PipelineState::AutoTranslating {
                    regions: Regions { output, ..regions },
                    epoch: inner.bump_epoch(),
                }
            }
        };
        inner.state = next;

        tracing::info!("Output region set to {output}");
    }

    /// Start or stop the periodic cycle. Must run inside a tokio runtime.
    pub fn toggle_auto_translation(self: &Arc<Self>) {
        let mut inner = self.lock();
        let state = inner.state;
        match state {
            PipelineState::Idle => {
                tracing::info!("No OCR region selected, auto translation not started");
            }
            PipelineState::RegionReady(regions) => {
                let epoch = inner.bump_epoch();
                inner.state = PipelineState::AutoTranslating { regions, epoch };

                let token = self.shutdown.child_token();
                inner.ticker = Some(token.clone());
                tokio::spawn(run_ticker(
                    Arc::downgrade(self),
                    token,
                    self.settings.capture_interval,
                ));

                tracing::info!(
                    "Auto translation started every {:?}",
                    self.settings.capture_interval
                );
            }
            PipelineState::AutoTranslating { regions, .. } => {
                inner.state = PipelineState::RegionReady(regions);
                if let Some(ticker) = inner.ticker.take() {
                    ticker.cancel();
                }
                self.deps.ui.clear(regions.output);

                tracing::info!("Auto translation stopped");
            }
        }
    }

    fn on_tick(self: &Arc<Self>) {
        {
            let mut inner = self.lock();
            if inner.state.phase() != Phase::AutoTranslating {
                return;
            }
            if inner.cycle_in_flight {
                self.stats.tick_skipped();
                tracing::trace!("Previous cycle still running, skipping tick");
                return;
            }
            inner.cycle_in_flight = true;
        }

        self.stats.cycle_started();
        let controller = self.clone();
        self.pool.submit(async move { controller.run_auto_cycle().await });
    }

    async fn run_auto_cycle(self: Arc<Self>) {
        let _in_flight = InFlight(&self);

        // Regions are read when the cycle actually starts, not when it was queued
        let PipelineState::AutoTranslating { regions, epoch } = self.state() else {
            return;
        };

        let Some(source) = self.recognize(regions.ocr).await else {
            return;
        };
        if source.is_empty() {
            tracing::trace!("Nothing recognized in {}", regions.ocr);
            return;
        }

        let Some(translated) = self.translate(&source).await else {
            return;
        };

        {
            let inner = self.lock();
            if inner.state != (PipelineState::AutoTranslating { regions, epoch }) {
                self.stats.stale_result();
                tracing::debug!("Discarding result of a superseded cycle");
                return;
            }
            self.deps.ui.update(regions.output, translated);
        }
        self.stats.cycle_completed();
    }

    async fn one_shot(self: &Arc<Self>, kind: OneShotKind) {
        {
            let mut inner = self.lock();
            let slot = inner.slot_mut(kind);
            match *slot {
                OneShotSlot::Pending => {
                    tracing::debug!("{kind} already running");
                    return;
                }
                OneShotSlot::Showing(region) => {
                    *slot = OneShotSlot::Neutral;
                    self.deps.ui.clear(region);
                    tracing::debug!("Cleared {kind} at {region}");
                    return;
                }
                OneShotSlot::Neutral => *slot = OneShotSlot::Pending,
            }
        }

        let Some(region) = self.pick_region().await else {
            tracing::debug!("{kind} selection cancelled");
            *self.lock().slot_mut(kind) = OneShotSlot::Neutral;
            return;
        };

        let controller = self.clone();
        self.pool.submit(async move {
            let text = controller.run_one_shot(kind, region).await;

            let mut inner = controller.lock();
            let slot = inner.slot_mut(kind);
            match text {
                Some(text) => {
                    controller.deps.ui.update(region, text);
                    *slot = OneShotSlot::Showing(region);
                }
                None => *slot = OneShotSlot::Neutral,
            }
        });
    }

    async fn run_one_shot(&self, kind: OneShotKind, region: Rect) -> Option<String> {
        let source = self.recognize(region).await?;
        if source.is_empty() {
            tracing::info!("{kind}: no text found in {region}");
            return None;
        }

        match kind {
            OneShotKind::Ocr => Some(source),
            OneShotKind::Translate => self.translate(&source).await,
        }
    }

    /// Capture and recognize off the async workers. `None` means the capture
    /// failed and the cycle should be skipped; a recognition failure reads as
    /// empty text.
    async fn recognize(&self, region: Rect) -> Option<String> {
        let frames = self.deps.frames.clone();
        let extractor = self.deps.extractor.clone();

        let joined = tokio::task::spawn_blocking(move || {
            let frame = frames.capture(region)?;
            Ok::<_, CaptureError>(extractor.extract(&frame))
        })
        .await;

        match joined {
            Ok(Ok(Ok(text))) => Some(text.trim().to_string()),
            Ok(Ok(Err(e))) => {
                self.stats.recognition_failed();
                tracing::warn!("{e}");
                Some(String::new())
            }
            Ok(Err(e)) => {
                self.stats.capture_failed();
                tracing::warn!("{e}");
                None
            }
            Err(e) => {
                self.stats.capture_failed();
                tracing::error!("Recognition task failed: {e}");
                None
            }
        }
    }

    /// `None` when the model failed or produced nothing
    async fn translate(&self, source: &str) -> Option<String> {
        match self.deps.translator.translate(source).await {
            Ok(text) if text.is_empty() => {
                tracing::debug!("Model returned an empty translation");
                None
            }
            Ok(text) => Some(text),
            Err(e) => {
                self.stats.translation_failed();
                tracing::warn!("Translation failed: {e}");
                None
            }
        }
    }

    async fn pick_region(&self) -> Option<Rect> {
        {
            let mut inner = self.lock();
            if inner.selecting {
                tracing::debug!("A region selection is already open");
                return None;
            }
            inner.selecting = true;
        }
        let _selecting = Selecting(self);

        let selector = self.deps.selector.clone();
        match tokio::task::spawn_blocking(move || selector.select()).await {
            Ok(region) => region.and_then(Rect::non_empty),
            Err(e) => {
                tracing::error!("Region selector failed: {e}");
                None
            }
        }
    }

    /// Stop the ticker and wait up to `grace` for running jobs. Results that
    /// arrive afterwards are discarded as stale.
    pub async fn shutdown(&self, grace: Duration) {
        {
            let mut inner = self.lock();
            if let Some(ticker) = inner.ticker.take() {
                ticker.cancel();
            }
            if let PipelineState::AutoTranslating { regions, .. } = inner.state {
                inner.state = PipelineState::RegionReady(regions);
            }
        }
        self.shutdown.cancel();

        if !self.pool.drain(grace).await {
            tracing::warn!(
                "{} of {} workers still busy after {grace:?}, abandoning them",
                self.pool.busy(),
                self.pool.size()
            );
        }
        tracing::info!("Pipeline stopped: {:?}", self.stats());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct InFlight<'a>(&'a PipelineController);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.lock().cycle_in_flight = false;
    }
}

struct Selecting<'a>(&'a PipelineController);

impl Drop for Selecting<'_> {
    fn drop(&mut self) {
        self.0.lock().selecting = false;
    }
}

async fn run_ticker(controller: Weak<PipelineController>, token: CancellationToken, period: Duration) {
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticks.tick() => {
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                controller.on_tick();
            }
        }
    }
    tracing::debug!("Ticker stopped");
}
