//! Commit history display
//!
//! - `history`: first-parent walk from a commit back to the root
//! - `log_entry`: the block printed for one commit by `log`, `global-log`

pub mod history;
pub mod log_entry;
