#![allow(dead_code)]

pub mod command;
pub mod file;

/// Directory holding the repository state inside a working tree
pub const REPOSITORY_DIR: &str = ".twig";

/// Block printed by `log` for a non-merge commit with the given message
pub fn log_entry_pattern(message: &str) -> String {
    format!(
        r"===\ncommit [0-9a-f]{{40}}\nDate: .+\n{}\n\n",
        regex::escape(message)
    )
}
