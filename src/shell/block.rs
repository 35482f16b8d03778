//! Transcript blocks.
//!
//! The transcript is an append-only sequence of blocks: the echoed command
//! line, leveled text output, upload progress rows, and two sentinels
//! (`Clear` truncates the transcript, `Nope` produces no visible output).
//! Blocks are immutable once appended, except progress rows which are
//! updated in place by id while an upload batch runs.

use std::fmt;

pub type ProgressId = u64;

/// Severity/styling of a text output block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    Default,
    Info,
    Success,
    Error,
    Muted,
}

/// Lifecycle of one upload progress row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Pending => write!(f, "pending"),
            ProgressStatus::Uploading => write!(f, "uploading"),
            ProgressStatus::Success => write!(f, "done"),
            ProgressStatus::Error => write!(f, "failed"),
        }
    }
}

/// One renderable unit of terminal transcript output.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Echo of a submitted command line, tagged with the directory it ran in.
    Command { content: String, cwd: String },
    /// Text output at a display level.
    Output { level: OutputLevel, content: String },
    /// One file upload, updated in place by id.
    Progress {
        id: ProgressId,
        subject: String,
        loaded: u64,
        total: u64,
        status: ProgressStatus,
    },
    /// Truncate the transcript to empty.
    Clear,
    /// Produced by commands whose only effect is a side effect (navigation,
    /// a remote mutation); renders nothing.
    Nope,
}

impl Block {
    pub fn output(content: impl Into<String>) -> Self {
        Block::Output {
            level: OutputLevel::Default,
            content: content.into(),
        }
    }

    pub fn info(content: impl Into<String>) -> Self {
        Block::Output {
            level: OutputLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Block::Output {
            level: OutputLevel::Success,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Block::Output {
            level: OutputLevel::Error,
            content: content.into(),
        }
    }

    pub fn muted(content: impl Into<String>) -> Self {
        Block::Output {
            level: OutputLevel::Muted,
            content: content.into(),
        }
    }
}

/// Append-only block sequence with a render cursor.
///
/// The render cursor lets the CLI drain only the blocks appended since the
/// last repaint; `clear` rewinds it along with the content.
#[derive(Debug, Default)]
pub struct Transcript {
    blocks: Vec<Block>,
    next_progress_id: ProgressId,
    rendered: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.rendered = 0;
    }

    /// Append a fresh progress row in `Pending` state and return its id.
    pub fn push_progress(&mut self, subject: impl Into<String>, total: u64) -> ProgressId {
        let id = self.next_progress_id;
        self.next_progress_id += 1;
        self.blocks.push(Block::Progress {
            id,
            subject: subject.into(),
            loaded: 0,
            total,
            status: ProgressStatus::Pending,
        });
        id
    }

    /// Update a progress row in place. Unknown ids are ignored.
    pub fn update_progress(&mut self, target: ProgressId, new_loaded: u64, new_status: ProgressStatus) {
        for block in self.blocks.iter_mut() {
            if let Block::Progress {
                id,
                loaded,
                status,
                ..
            } = block
            {
                if *id == target {
                    *loaded = new_loaded;
                    *status = new_status;
                    return;
                }
            }
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks appended since the previous call (cloned for display).
    pub fn take_unrendered(&mut self) -> Vec<Block> {
        let fresh = self.blocks[self.rendered..].to_vec();
        self.rendered = self.blocks.len();
        fresh
    }
}
