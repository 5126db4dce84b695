//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: Object database for storing blobs and commits
//! - `index`: Staging area tracking pending additions and removals
//! - `refs`: Branch references and HEAD
//! - `repository`: Repository context coordinating the other areas
//! - `workspace`: Working directory file system operations

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod workspace;
