use std::sync::Arc;

use kanal::AsyncReceiver;
use screenlate_core::PipelineController;
use screenlate_types::Action;
use tokio_util::sync::CancellationToken;

/// Dispatch hotkey actions to the pipeline until cancelled. Each action runs
/// in its own task so a pending region selection never holds up a toggle.
pub async fn event_loop(
    pipeline: Arc<PipelineController>,
    actions: AsyncReceiver<Action>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Waiting for hotkeys");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            action = actions.recv() => {
                let Ok(action) = action else {
                    tracing::debug!("[EVENT_LOOP] Action channel closed");
                    break;
                };
                let pipeline = pipeline.clone();
                tokio::spawn(async move { pipeline.handle(action).await });
            }
        }
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}
