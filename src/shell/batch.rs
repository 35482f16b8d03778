//! Batch action orchestrator.
//!
//! Applies one async action to a list of items strictly in order, one at a
//! time, with aggregate feedback through the injected notification sink.
//! The first failure aborts the remaining items. Single-item invocations
//! (and invocations without a feedback descriptor) bypass batching
//! entirely: the action runs once, not silent, with no progress
//! notification.

use std::future::Future;

use anyhow::Result;

use crate::notify::{NotificationOutcome, NotificationSink};

/// Passed to each per-item action. When `silent` is set the action must
/// suppress its own success/error notification; the orchestrator owns
/// user-facing feedback for the batch as a whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionOptions {
    pub silent: bool,
}

/// Notification texts for a batch run.
#[derive(Debug, Clone)]
pub struct BatchFeedback {
    pub loading: String,
    pub success: String,
    pub error: Option<String>,
}

const GENERIC_BATCH_ERROR: &str = "Une erreur est survenue.";

/// Run `action` over `items` sequentially.
///
/// In the batch path every item runs silent; item failures are consumed
/// into the error notification and `Ok(())` is returned. In the bypass
/// path (one item, or no feedback) the action's own error propagates to
/// the caller.
pub async fn run_batch<T, F, Fut>(
    items: Vec<T>,
    mut action: F,
    feedback: Option<BatchFeedback>,
    sink: &dyn NotificationSink,
) -> Result<()>
where
    F: FnMut(T, ActionOptions) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let feedback = match feedback {
        Some(feedback) if items.len() > 1 => feedback,
        _ => {
            if let Some(item) = items.into_iter().next() {
                action(item, ActionOptions::default()).await?;
            }
            return Ok(());
        }
    };

    let total = items.len();
    let handle = sink.start(&feedback.loading, &format!("0 / {}", total));

    let mut done = 0usize;
    for item in items {
        match action(item, ActionOptions { silent: true }).await {
            Ok(()) => {
                done += 1;
                sink.update(handle, &format!("{} / {}", done, total));
            }
            Err(e) => {
                tracing::debug!("batch item failed after {done}/{total}: {e:#}");
                let message = feedback
                    .error
                    .clone()
                    .unwrap_or_else(|| GENERIC_BATCH_ERROR.to_string());
                sink.resolve(handle, NotificationOutcome::Error, &message);
                return Ok(());
            }
        }
    }

    sink.resolve(handle, NotificationOutcome::Success, &feedback.success);
    Ok(())
}
