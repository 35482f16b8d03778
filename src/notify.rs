//! Notification sink.
//!
//! User-facing feedback that is not part of the transcript: the batch
//! orchestrator's aggregate progress and one-shot operation results. The
//! sink is injected wherever feedback is emitted, so the orchestrator
//! never reaches for ambient global state and tests can record instead of
//! print.

use std::sync::atomic::{AtomicU64, Ordering};

use colored::Colorize;

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Success,
    Error,
}

pub trait NotificationSink: Send + Sync {
    /// Begin a persistent notification; returns a handle for updates.
    fn start(&self, title: &str, detail: &str) -> NotificationId;

    /// Replace the detail text of a running notification.
    fn update(&self, id: NotificationId, detail: &str);

    /// Replace a running notification with its final outcome.
    fn resolve(&self, id: NotificationId, outcome: NotificationOutcome, message: &str);

    /// One-shot notification with no running state.
    fn push(&self, outcome: NotificationOutcome, message: &str);
}

/// Prints notifications as colored status lines on stdout.
pub struct ConsoleNotifier {
    next_id: AtomicU64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for ConsoleNotifier {
    fn start(&self, title: &str, detail: &str) -> NotificationId {
        println!("{} {} ({})", "…".bright_black(), title, detail);
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn update(&self, _id: NotificationId, detail: &str) {
        println!("{} {}", "…".bright_black(), detail);
    }

    fn resolve(&self, _id: NotificationId, outcome: NotificationOutcome, message: &str) {
        self.push(outcome, message);
    }

    fn push(&self, outcome: NotificationOutcome, message: &str) {
        match outcome {
            NotificationOutcome::Success => println!("{} {}", "✓".green(), message),
            NotificationOutcome::Error => println!("{} {}", "✗".red(), message.red()),
        }
    }
}

#[cfg(test)]
pub mod recording {
    //! Recording sink for orchestrator and handler tests.

    use std::sync::Mutex;

    use super::{NotificationId, NotificationOutcome, NotificationSink};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Event {
        Started { title: String, detail: String },
        Updated { detail: String },
        Resolved { outcome: NotificationOutcome, message: String },
        Pushed { outcome: NotificationOutcome, message: String },
    }

    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<Event>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap_or_else(|p| p.into_inner()).clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn start(&self, title: &str, detail: &str) -> NotificationId {
            self.events
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(Event::Started {
                    title: title.to_string(),
                    detail: detail.to_string(),
                });
            0
        }

        fn update(&self, _id: NotificationId, detail: &str) {
            self.events
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(Event::Updated {
                    detail: detail.to_string(),
                });
        }

        fn resolve(&self, _id: NotificationId, outcome: NotificationOutcome, message: &str) {
            self.events
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(Event::Resolved {
                    outcome,
                    message: message.to_string(),
                });
        }

        fn push(&self, outcome: NotificationOutcome, message: &str) {
            self.events
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(Event::Pushed {
                    outcome,
                    message: message.to_string(),
                });
        }
    }
}
