//! Working-tree synchronization
//!
//! Switching branches, resetting and merging all move the working directory
//! from one commit's snapshot to another. The move is planned as a
//! [`migration::Migration`] and validated before any file is touched.

pub mod migration;
