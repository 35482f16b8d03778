//! Shell core module

pub mod batch;
pub mod block;
pub mod builtin;
pub mod completer;
pub mod input;
pub mod parser;
pub mod path;
pub mod picker;
pub mod registry;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use colored::Colorize;
use tokio::sync::Notify;

use crate::notify::NotificationSink;
use crate::remote::{DirEntry, RemoteFs};
use crate::shell::block::{Block, Transcript};
use crate::shell::picker::FilePicker;
use crate::shell::registry::CommandId;

/// Read-only snapshot handed to each command invocation. Handlers never
/// mutate it; navigation and refreshes go through the [`Workspace`] and
/// the remote client.
#[derive(Debug, Clone)]
pub struct Context {
    pub current_path: String,
    pub entries: Vec<DirEntry>,
}

/// The process-wide current directory and cached listing.
///
/// Single-writer discipline: the navigation action writes the path, the
/// refresh routine writes the listing. Readers treat the listing as a
/// snapshot for the duration of one command. The notify handle lets the
/// dispatcher suspend while an initial load is still in flight.
pub struct Workspace {
    cwd: RwLock<String>,
    listing: RwLock<Vec<DirEntry>>,
    loading: AtomicBool,
    settled: Notify,
}

impl Workspace {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            cwd: RwLock::new(initial_path.into()),
            listing: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
            settled: Notify::new(),
        }
    }

    pub fn current_path(&self) -> String {
        self.cwd.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Commit a navigation. Callers validate the target first.
    pub fn navigate(&self, new_path: String) {
        tracing::info!(path = %new_path, "navigate");
        *self.cwd.write().unwrap_or_else(|p| p.into_inner()) = new_path;
    }

    pub fn entries(&self) -> Vec<DirEntry> {
        self.listing
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Sorted entry names, for autocompletion.
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .listing
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .map(|e| e.name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    fn begin_load(&self) {
        self.loading.store(true, Ordering::Release);
    }

    fn finish_load(&self, entries: Vec<DirEntry>) {
        *self.listing.write().unwrap_or_else(|p| p.into_inner()) = entries;
        self.loading.store(false, Ordering::Release);
        self.settled.notify_waiters();
    }

    fn abort_load(&self) {
        self.loading.store(false, Ordering::Release);
        self.settled.notify_waiters();
    }

    /// Suspend until an in-flight load settles, but only when the cache is
    /// still empty — a stale snapshot is fine, racing the very first load
    /// is not.
    pub async fn wait_until_settled(&self) {
        loop {
            let notified = self.settled.notified();
            let empty = self
                .listing
                .read()
                .unwrap_or_else(|p| p.into_inner())
                .is_empty();
            if !(empty && self.loading.load(Ordering::Acquire)) {
                return;
            }
            notified.await;
        }
    }
}

/// The command interpreter: owns the transcript and drives one submitted
/// line through tokenize → registry lookup → handler → block
/// normalization.
pub struct Shell {
    pub(crate) remote: Arc<dyn RemoteFs>,
    pub(crate) workspace: Arc<Workspace>,
    pub(crate) transcript: Arc<Mutex<Transcript>>,
    pub(crate) picker: Arc<dyn FilePicker>,
    pub(crate) notifier: Arc<dyn NotificationSink>,
    pub(crate) download_dir: PathBuf,
}

impl Shell {
    pub fn new(
        remote: Arc<dyn RemoteFs>,
        picker: Arc<dyn FilePicker>,
        notifier: Arc<dyn NotificationSink>,
        initial_path: impl Into<String>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            remote,
            workspace: Arc::new(Workspace::new(initial_path)),
            transcript: Arc::new(Mutex::new(Transcript::new())),
            picker,
            notifier,
            download_dir,
        }
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    /// Submit one command line.
    ///
    /// The echoed command block is always appended before any output the
    /// handler produces. Unknown names yield an error block; handlers
    /// convert their own failures, so nothing propagates out of here.
    pub async fn submit(&self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        self.workspace.wait_until_settled().await;
        let ctx = Context {
            current_path: self.workspace.current_path(),
            entries: self.workspace.entries(),
        };

        let tokens = parser::tokenize(line);
        let Some(name) = tokens.first() else {
            return;
        };

        self.transcript
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Block::Command {
                content: line.to_string(),
                cwd: ctx.current_path.clone(),
            });

        match CommandId::find(name) {
            None => {
                self.transcript
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .push(Block::error(format!("{name}: command not found")));
            }
            Some(id) => {
                let blocks = builtin::run(id, self, &ctx, &tokens[1..]).await;
                let mut transcript = self.transcript.lock().unwrap_or_else(|p| p.into_inner());
                for block in blocks {
                    match block {
                        Block::Clear => transcript.clear(),
                        Block::Nope => {}
                        other => transcript.push(other),
                    }
                }
            }
        }
    }

    /// Reload the cached listing for the current directory.
    ///
    /// Fire-and-forget: mutating commands call this and return without
    /// waiting; the fresh listing is observed by later commands.
    pub fn refresh_listing(&self) {
        self.workspace.begin_load();
        let remote = Arc::clone(&self.remote);
        let workspace = Arc::clone(&self.workspace);
        tokio::spawn(async move {
            let path = workspace.current_path();
            match remote.list_directory(&path).await {
                Ok(listing) => workspace.finish_load(listing.items),
                Err(e) => {
                    tracing::warn!(%path, "listing refresh failed: {e}");
                    workspace.abort_load();
                }
            }
        });
    }

    /// Prompt string for the REPL.
    pub fn prompt(&self) -> String {
        let cwd = self.workspace.current_path();
        format!(
            "{} {}{} ",
            "nimbus".bright_cyan().bold(),
            cwd.white(),
            ">".bright_black()
        )
    }

    /// Transcript blocks appended since the last call.
    pub fn take_unrendered(&self) -> Vec<Block> {
        self.transcript
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take_unrendered()
    }
}
