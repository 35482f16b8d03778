//! File selection for `upload`.
//!
//! The browser product opens a native picker; here the picker is a trait
//! so the CLI can prompt on stdin and tests can inject selections.
//! Cancellation — an empty line, a read error, or the configurable
//! timeout expiring — resolves to an empty selection, never an error.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::remote::PickedFile;
use crate::shell::parser;

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Ask the user for zero or more local files to upload.
    async fn pick(&self) -> Vec<PickedFile>;
}

/// Prompts for whitespace-separated local paths (quotes allowed) on stdin.
pub struct PromptPicker {
    timeout: Duration,
}

impl PromptPicker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl FilePicker for PromptPicker {
    async fn pick(&self) -> Vec<PickedFile> {
        println!("Files to upload (paths separated by spaces, quotes allowed; empty line cancels):");

        let mut line = String::new();
        let read = async {
            let mut reader = BufReader::new(tokio::io::stdin());
            reader.read_line(&mut line).await
        };
        match tokio::time::timeout(self.timeout, read).await {
            Ok(Ok(_)) => {}
            // Timeout or closed stdin counts as a cancelled selection.
            _ => return Vec::new(),
        }

        let mut files = Vec::new();
        for token in parser::tokenize(line.trim()) {
            match stat_local_file(&token).await {
                Some(file) => files.push(file),
                None => eprintln!("upload: skipping {token}: not a readable file"),
            }
        }
        files
    }
}

async fn stat_local_file(raw: &str) -> Option<PickedFile> {
    let path = std::path::PathBuf::from(raw);
    let metadata = tokio::fs::metadata(&path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    let name = path.file_name()?.to_string_lossy().into_owned();
    Some(PickedFile {
        size: metadata.len(),
        name,
        path,
    })
}
