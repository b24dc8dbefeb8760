use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use screenlate_translator::{ProviderMetadata, TranslateError, Translator};
use screenlate_types::{Frame, Rect};
use tokio_util::sync::CancellationToken;

use crate::adapters::{FrameSource, RegionSelector, TextExtractor};
use crate::controller::{PipelineController, PipelineDeps, PipelineSettings};
use crate::dispatch::{QueuePoller, UiCommand, ui_channel};
use crate::error::{CaptureError, RecognitionError};
use crate::overlay::{OverlayRegistry, OverlaySurface};

/// Selector that replays a fixed list of picks; an exhausted script cancels
#[derive(Default)]
pub struct ScriptedSelector {
    picks: Mutex<VecDeque<Option<Rect>>>,
    gate: Mutex<Option<kanal::Receiver<()>>>,
    calls: AtomicUsize,
}

impl ScriptedSelector {
    pub fn push(&self, pick: Option<Rect>) {
        self.picks.lock().unwrap().push_back(pick);
    }

    /// Keep selections open until the returned sender is dropped
    pub fn hold(&self) -> kanal::Sender<()> {
        let (tx, rx) = kanal::bounded(0);
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegionSelector for ScriptedSelector {
    fn select(&self) -> Option<Rect> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.recv().ok();
        }
        self.picks.lock().unwrap().pop_front().flatten()
    }
}

pub struct StubFrames {
    screen: Rect,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl StubFrames {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl FrameSource for StubFrames {
    fn capture(&self, region: Rect) -> Result<Frame, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CaptureError::Backend("device lost".to_string()));
        }
        if !self.screen.contains(&region) {
            return Err(CaptureError::OffScreen(region));
        }
        let (width, height) = (region.width(), region.height());
        Ok(Frame::new(width, height, vec![0; (width * height * 4) as usize]))
    }

    fn display_bounds(&self, region: Rect) -> Option<Rect> {
        self.screen.contains(&region).then_some(self.screen)
    }
}

#[derive(Default)]
pub struct StubExtractor {
    text: Mutex<String>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn set_text(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for StubExtractor {
    fn extract(&self, _frame: &Frame) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RecognitionError::Engine("engine unavailable".to_string()));
        }
        Ok(self.text.lock().unwrap().clone())
    }
}

/// Dictionary translator; unknown input is wrapped in brackets
#[derive(Default)]
pub struct StubTranslator {
    map: Mutex<HashMap<String, String>>,
    delay: Mutex<Duration>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl StubTranslator {
    pub fn map(&self, from: &str, to: &str) {
        self.map
            .lock()
            .unwrap()
            .insert(from.to_string(), to.to_string());
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(TranslateError::Engine("model crashed".to_string()));
        }
        let mapped = self.map.lock().unwrap().get(text).cloned();
        Ok(mapped.unwrap_or_else(|| format!("[{text}]")))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "stub".to_string(),
            model: "stub".to_string(),
        }
    }
}

/// Surface whose windows are just their rectangles
#[derive(Default)]
pub struct FakeSurface {
    pub opened: usize,
    pub closed: usize,
}

impl OverlaySurface for FakeSurface {
    type Window = Rect;

    fn open(&mut self, region: Rect, _text: &str) -> anyhow::Result<Rect> {
        self.opened += 1;
        Ok(region)
    }

    fn set_text(&mut self, _window: &mut Rect, _text: &str) {}

    fn close(&mut self, _window: Rect) {
        self.closed += 1;
    }
}

pub fn screen() -> Rect {
    Rect::new(0, 0, 1920, 1080)
}

/// Controller wired to stubs, with the test body playing the GUI thread
pub struct Harness {
    pub controller: Arc<PipelineController>,
    pub overlays: OverlayRegistry<FakeSurface>,
    pub selector: Arc<ScriptedSelector>,
    pub frames: Arc<StubFrames>,
    pub extractor: Arc<StubExtractor>,
    pub translator: Arc<StubTranslator>,
    poller: QueuePoller<UiCommand>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(PipelineSettings {
            capture_interval: Duration::from_millis(20),
            ..Default::default()
        })
    }

    pub fn with_settings(settings: PipelineSettings) -> Self {
        let selector = Arc::new(ScriptedSelector::default());
        let frames = Arc::new(StubFrames::new(screen()));
        let extractor = Arc::new(StubExtractor::default());
        let translator = Arc::new(StubTranslator::default());
        let (ui, rx) = ui_channel();

        let controller = PipelineController::new(
            PipelineDeps {
                selector: selector.clone(),
                frames: frames.clone(),
                extractor: extractor.clone(),
                translator: translator.clone(),
                ui,
            },
            settings,
            CancellationToken::new(),
        );

        Self {
            controller,
            overlays: OverlayRegistry::new(FakeSurface::default()),
            selector,
            frames,
            extractor,
            translator,
            poller: QueuePoller::new(rx, Duration::from_millis(5)),
        }
    }

    /// Apply queued overlay commands
    pub fn pump(&mut self) {
        let overlays = &mut self.overlays;
        self.poller.poll_once(|command| match command {
            UiCommand::UpdateOverlay { region, text } => overlays.update(region, &text),
            UiCommand::SelectRegion { reply } => {
                reply.send(None).ok();
            }
            UiCommand::Quit => {}
        });
    }

    /// Pump until `done` holds, giving up after two seconds
    pub async fn pump_until(&mut self, done: impl Fn(&Self) -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            self.pump();
            if done(self) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(self.poller.interval()).await;
        }
    }

    /// Let background work run for `duration`, pumping as the GUI would
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        while tokio::time::Instant::now() < deadline {
            self.pump();
            tokio::time::sleep(self.poller.interval()).await;
        }
        self.pump();
    }

    pub async fn select_ocr(&self, region: Rect) {
        self.selector.push(Some(region));
        self.controller
            .handle(screenlate_types::Action::SelectOcrRegion)
            .await;
    }
}
