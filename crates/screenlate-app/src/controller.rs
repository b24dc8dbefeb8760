use std::sync::Arc;
use std::time::Duration;

use screenlate_core::{PipelineController, PipelineDeps, PipelineSettings, UiDispatcher};
use screenlate_types::Action;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;

/// Hotkey presses waiting for the event loop
const ACTION_QUEUE: usize = 64;

/// Application controller for task spawning and lifecycle
pub struct AppController {
    pipeline: Arc<PipelineController>,
    actions: (kanal::Sender<Action>, kanal::Receiver<Action>),
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(deps: PipelineDeps, settings: PipelineSettings) -> Self {
        let cancel_token = CancellationToken::new();
        let pipeline = PipelineController::new(deps, settings, cancel_token.child_token());

        Self {
            pipeline,
            actions: kanal::bounded(ACTION_QUEUE),
            cancel_token,
        }
    }

    pub fn pipeline(&self) -> &Arc<PipelineController> {
        &self.pipeline
    }

    pub fn action_sender(&self) -> kanal::Sender<Action> {
        self.actions.0.clone()
    }

    /// Must be called inside the tokio runtime
    pub fn spawn_tasks(&self, ui: UiDispatcher) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            self.pipeline.clone(),
            self.actions.1.clone_async(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(quit_on_ctrl_c(ui, self.cancel_token.child_token()));

        tasks
    }

    pub async fn shutdown(&self, grace: Duration) {
        self.cancel_token.cancel();
        self.pipeline.shutdown(grace).await;
    }
}

async fn quit_on_ctrl_c(ui: UiDispatcher, cancel: CancellationToken) -> anyhow::Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown requested");
            ui.quit();
        }
    }
    Ok(())
}
