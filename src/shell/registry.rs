//! Command registry.
//!
//! A closed set of command identifiers with a static descriptor table.
//! Lookup is exact-match and case-sensitive on the primary name or a
//! registered alias; there is no abbreviation or fuzzy fallback. The table
//! is built into the binary, so dispatch is an exhaustive `match` and
//! nothing can be registered at runtime.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    Help,
    Clear,
    Pwd,
    List,
    Cd,
    Mkdir,
    Rm,
    Mv,
    Rename,
    Copy,
    Compress,
    Download,
    Upload,
}

impl CommandId {
    pub const ALL: [CommandId; 13] = [
        CommandId::Help,
        CommandId::Clear,
        CommandId::Pwd,
        CommandId::List,
        CommandId::Cd,
        CommandId::Mkdir,
        CommandId::Rm,
        CommandId::Mv,
        CommandId::Rename,
        CommandId::Copy,
        CommandId::Compress,
        CommandId::Download,
        CommandId::Upload,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandId::Help => "help",
            CommandId::Clear => "clear",
            CommandId::Pwd => "pwd",
            CommandId::List => "list",
            CommandId::Cd => "cd",
            CommandId::Mkdir => "mkdir",
            CommandId::Rm => "rm",
            CommandId::Mv => "mv",
            CommandId::Rename => "rename",
            CommandId::Copy => "copy",
            CommandId::Compress => "compress",
            CommandId::Download => "download",
            CommandId::Upload => "upload",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CommandId::List => &["ls"],
            CommandId::Mv => &["move"],
            _ => &[],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandId::Help => "List available commands",
            CommandId::Clear => "Clear the terminal",
            CommandId::Pwd => "Display the absolute path of the current working directory",
            CommandId::List => "List the entries of a directory",
            CommandId::Cd => "Change the current directory",
            CommandId::Mkdir => "Create a directory: mkdir <name> or mkdir <path>",
            CommandId::Rm => "Delete a file or a directory",
            CommandId::Mv => "Move a file or directory into a destination folder",
            CommandId::Rename => "Rename a file or directory",
            CommandId::Copy => "Copy or duplicate a file or directory",
            CommandId::Compress => "Compress a file or directory into a zip archive",
            CommandId::Download => "Download a file or a directory",
            CommandId::Upload => "Upload one or more files to the current directory",
        }
    }

    /// Exact, case-sensitive lookup by name or registered alias.
    pub fn find(name: &str) -> Option<CommandId> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.name() == name || id.aliases().contains(&name))
    }

    /// Every registered name and alias, sorted, for autocompletion.
    pub fn completion_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = CommandId::ALL
            .into_iter()
            .flat_map(|id| std::iter::once(id.name()).chain(id.aliases().iter().copied()))
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(CommandId::find("cd"), Some(CommandId::Cd));
        assert_eq!(CommandId::find("download"), Some(CommandId::Download));
    }

    #[test]
    fn test_lookup_by_alias() {
        assert_eq!(CommandId::find("ls"), Some(CommandId::List));
        assert_eq!(CommandId::find("move"), Some(CommandId::Mv));
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_exact() {
        assert_eq!(CommandId::find("CD"), None);
        assert_eq!(CommandId::find("down"), None);
        assert_eq!(CommandId::find(""), None);
    }

    #[test]
    fn test_completion_names_sorted_and_complete() {
        let names = CommandId::completion_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"help"));
        assert!(names.contains(&"ls"));
        assert_eq!(names.len(), CommandId::ALL.len() + 2);
    }
}
