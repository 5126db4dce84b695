//! Version control data structures and algorithms
//!
//! - `branch`: Branch name validation
//! - `checkout`: Working tree migrations and untracked file detection
//! - `core`: Shared utilities (error taxonomy, pager wrapper)
//! - `index`: Staging area file format
//! - `log`: Commit display for log, global-log and find
//! - `merge`: Split point search and the three-way merge policy
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
