//! Merge support
//!
//! - `split_point`: latest common ancestor of two branch tips
//! - `resolution`: per-file three-way policy and conflict file content

pub mod resolution;
pub mod split_point;
