//! Object types and operations
//!
//! All content is stored as objects identified by SHA-1 hashes. There are two types:
//!
//! - **Blob**: File content (raw bytes)
//! - **Commit**: Snapshot with metadata (message, timestamp, parent commits, file mapping)
//!
//! All objects implement serialization/deserialization for the object format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated object id used in log output
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
