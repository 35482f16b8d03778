//! Nimbus Term - terminal client for the Nimbus remote drive
//!
//! Features:
//! - POSIX-style virtual paths against an object-store backend
//! - Shell-like quoting and ghost-text autocompletion
//! - Sequential batch actions with aggregate progress feedback

pub mod config;
pub mod notify;
pub mod remote;
pub mod shell;

pub use shell::Shell;
