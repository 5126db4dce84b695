//! Repository command implementations
//!
//! Each command is an `impl Repository` block in `porcelain`, taking the plain
//! arguments given on the command line. Handled failures surface as
//! [`crate::artifacts::core::errors::RepositoryError`] before anything is written.

pub mod porcelain;
