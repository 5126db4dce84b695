//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage a file for addition
//! - `commit`: Snapshot the staged changes
//! - `rm`: Unstage a file or stage it for removal
//! - `log`: Show history (`log`, `global-log`, `find`)
//! - `status`: Show branches, staged changes and working tree changes
//! - `checkout`: Restore files or switch branches
//! - `branch`: Create and delete branches
//! - `reset`: Move the current branch to another commit
//! - `merge`: Merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
