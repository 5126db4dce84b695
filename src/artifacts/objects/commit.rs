//! Commit object
//!
//! Commits are immutable snapshots of the tracked files. They contain:
//! - A message
//! - A timestamp
//! - Zero (root), one, or two (merge) parent commit IDs
//! - The complete mapping from file name to blob ID
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! version 1
//! parent <parent-sha>
//! date <unix-seconds> <timezone>
//! blob <blob-sha> <file-name>
//!
//! <commit message>
//! ```
//!
//! The identity of a commit is the hash of that encoding, so two commits built
//! from the same message, timestamp, parents and mapping are the same object.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Version of the commit payload encoding
const COMMIT_FORMAT_VERSION: u32 = 1;

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

/// File name to blob ID mapping of a commit
pub type BlobMapping = BTreeMap<String, ObjectId>;

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root commit, two for merge commits)
    parents: Vec<ObjectId>,
    /// Creation time, second precision
    timestamp: DateTime<FixedOffset>,
    /// Tracked files
    blobs: BlobMapping,
    /// Commit message
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// The timestamp is an explicit parameter: the root commit passes the epoch,
    /// every other commit passes `Commit::timestamp_from_env()`.
    pub fn new(
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        blobs: BlobMapping,
        message: String,
    ) -> Self {
        Commit {
            parents,
            // sub-second precision does not survive serialization
            timestamp: Self::truncate_to_seconds(timestamp),
            blobs,
            message,
        }
    }

    /// The parentless commit created by `init`
    pub fn root() -> Self {
        Self::new(
            Vec::new(),
            Self::epoch(),
            BlobMapping::new(),
            "initial commit".to_string(),
        )
    }

    /// Midnight, January 1st 1970, UTC
    pub fn epoch() -> DateTime<FixedOffset> {
        DateTime::<Utc>::default().fixed_offset()
    }

    /// Timestamp for a new commit
    ///
    /// Reads `TWIG_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and
    /// falls back to the current local time.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    fn truncate_to_seconds(timestamp: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        timestamp
            .offset()
            .timestamp_opt(timestamp.timestamp(), 0)
            .single()
            .unwrap_or(timestamp)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn blobs(&self) -> &BlobMapping {
        &self.blobs
    }

    pub fn blob_for(&self, file_name: &str) -> Option<&ObjectId> {
        self.blobs.get(file_name)
    }

    pub fn tracks(&self, file_name: &str) -> bool {
        self.blobs.contains_key(file_name)
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn payload_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("version {COMMIT_FORMAT_VERSION}")];

        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (file_name, blob_oid) in &self.blobs {
            lines.push(format!("blob {} {}", blob_oid.as_ref(), file_name));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines
    }

    fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let (seconds, timezone) = value
            .split_once(' ')
            .context("Invalid commit object: invalid date line")?;
        let seconds = seconds
            .parse::<i64>()
            .context("Invalid commit object: invalid timestamp")?;

        // Timezone is `+hhmm` or `-hhmm`
        let sign = match timezone.chars().next() {
            Some('-') => -1,
            Some('+') => 1,
            _ => anyhow::bail!("Invalid commit object: invalid timezone {timezone}"),
        };
        let digits = timezone
            .get(1..)
            .filter(|digits| digits.len() == 4 && digits.is_ascii())
            .context("Invalid commit object: invalid timezone")?;
        let hours = digits[..2].parse::<i32>()?;
        let minutes = digits[2..].parse::<i32>()?;
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .context("Invalid commit object: timezone out of range")?;

        offset
            .timestamp_opt(seconds, 0)
            .single()
            .context("Invalid commit object: timestamp out of range")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        // a line break in a name would split its blob line
        if let Some(file_name) = self.blobs.keys().find(|name| name.contains('\n')) {
            anyhow::bail!("File name {file_name:?} contains a line break");
        }

        let object_content = self.payload_lines().join("\n");

        Ok(with_header(self.object_type(), object_content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = headers.lines();

        let version = lines
            .next()
            .and_then(|line| line.strip_prefix("version "))
            .context("Invalid commit object: missing version line")?;
        if version != COMMIT_FORMAT_VERSION.to_string() {
            anyhow::bail!("Unsupported commit format version: {version}");
        }

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut blobs = BlobMapping::new();

        for line in lines {
            if let Some(parent_oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            } else if let Some(date) = line.strip_prefix("date ") {
                timestamp = Some(Self::parse_date(date)?);
            } else if let Some(entry) = line.strip_prefix("blob ") {
                let (blob_oid, file_name) = entry
                    .split_once(' ')
                    .context("Invalid commit object: invalid blob line")?;
                blobs.insert(
                    file_name.to_string(),
                    ObjectId::try_parse(blob_oid.to_string())?,
                );
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;

        Ok(Self::new(parents, timestamp, blobs, message.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
