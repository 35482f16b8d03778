//! Virtual path resolution for the remote drive.
//!
//! Every object in the drive lives under a single `/`-rooted namespace.
//! Resolution is pure string algebra: no I/O, no existence checks. Callers
//! that need to know whether a resolved path exists (e.g. `cd`) ask the
//! remote client afterwards.
//!
//! Accepted input forms:
//! - `.` or empty     (current directory)
//! - `..`, `a/../b`   (parent traversal, floored at root)
//! - `~`, `~/docs`    (home aliases to the drive root)
//! - `/abs/olute`     (absolute)
//! - `rel/ative`      (resolved against the current directory)

/// Resolve a user-typed path fragment against the current directory into a
/// normalized absolute path.
///
/// The result is always `/`-rooted with no empty, `.` or `..` segments;
/// the root itself is exactly `"/"`. A `..` at root is a silent no-op.
pub fn resolve(input: &str, cwd: &str) -> String {
    let input = input.trim();

    if input.is_empty() || input == "." {
        return cwd.to_string();
    }

    // Single-level home: `~` is the drive root.
    let expanded = if input == "~" {
        "/".to_string()
    } else if let Some(rest) = input.strip_prefix("~/") {
        format!("/{}", rest)
    } else {
        input.to_string()
    };

    let joined = if expanded.starts_with('/') {
        expanded
    } else {
        format!("{}/{}", cwd, expanded)
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Split a normalized absolute path into its parent directory and leaf
/// name. The root splits into `("/", "")`.
pub fn split_parent(path: &str) -> (String, String) {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let leaf = segments.pop().unwrap_or("").to_string();
    let parent = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    };
    (parent, leaf)
}

/// Last segment of a normalized absolute path; empty for the root.
pub fn leaf(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("")
}
