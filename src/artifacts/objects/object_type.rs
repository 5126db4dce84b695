//! Object kinds and the `<kind> <size>\0` header stored in front of every
//! object payload

use anyhow::Context;
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Header announcing a payload of `size` bytes
    pub fn header(&self, size: usize) -> String {
        format!("{} {size}\0", self.as_str())
    }

    /// Consume an object header and return the kind with the announced
    /// payload size
    pub fn read_header(reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let mut header = Vec::new();
        reader.read_until(b'\0', &mut header)?;

        let header = header
            .strip_suffix(b"\0")
            .context("Object header is not terminated")?;
        let header = std::str::from_utf8(header).context("Object header is not UTF-8")?;

        let (kind, size) = header
            .split_once(' ')
            .with_context(|| format!("Malformed object header {header:?}"))?;
        let size = size
            .parse::<usize>()
            .with_context(|| format!("Invalid object size {size:?}"))?;

        Ok((kind.parse()?, size))
    }
}

impl FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(kind: &str) -> anyhow::Result<Self> {
        match kind {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            _ => anyhow::bail!("Unknown object kind {kind:?}"),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
