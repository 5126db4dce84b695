//! twig - a minimal content-addressed version control engine
//!
//! The crate is organized the same way the on-disk repository is:
//!
//! - `areas`: the persisted parts of a repository (object database, staging
//!   area, refs, working tree) and the `Repository` context tying them together
//! - `artifacts`: the data structures and algorithms operating on those areas
//!   (objects, index format, branch names, checkout migrations, merge policy)
//! - `commands`: the repository operations exposed to the command line

pub mod areas;
pub mod artifacts;
pub mod commands;

/// Name of the directory holding all repository state, relative to the root
pub const REPOSITORY_DIR: &str = ".twig";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";
