//! Locked index file stream with a SHA-1 trailer
//!
//! Every byte read or written through an [`IndexStream`] feeds the running
//! digest, so the trailer check covers exactly the bytes that were parsed.

use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::Context;
use byteorder::{NetworkEndian, ReadBytesExt};
use file_guard::FileGuard;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{Read, Write};
use std::ops::DerefMut;

#[derive(Debug)]
pub struct IndexStream<'f> {
    file: FileGuard<&'f mut File>,
    hasher: Sha1,
}

impl<'f> IndexStream<'f> {
    pub(crate) fn new(file: FileGuard<&'f mut File>) -> Self {
        IndexStream {
            file,
            hasher: Sha1::new(),
        }
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> anyhow::Result<Vec<u8>> {
        let mut buffer = vec![0; len];
        self.file
            .deref_mut()
            .read_exact(&mut buffer)
            .context("Index file ends in the middle of a record")?;

        self.hasher.update(&buffer);
        Ok(buffer)
    }

    pub(crate) fn read_u8(&mut self) -> anyhow::Result<u8> {
        Ok(self.read_bytes(1)?.as_slice().read_u8()?)
    }

    pub(crate) fn read_u16(&mut self) -> anyhow::Result<u16> {
        Ok(self.read_bytes(2)?.as_slice().read_u16::<NetworkEndian>()?)
    }

    pub(crate) fn write_all(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.file
            .deref_mut()
            .write_all(data)
            .context("Unable to write index file")?;

        self.hasher.update(data);
        Ok(())
    }

    /// Append the digest of everything written so far
    pub(crate) fn write_trailer(mut self) -> anyhow::Result<()> {
        let digest = self.hasher.clone().finalize();

        self.file
            .deref_mut()
            .write_all(&digest)
            .context("Unable to write index checksum")
    }

    /// Check that the rest of the file is exactly the digest of everything
    /// read so far
    pub(crate) fn verify_trailer(mut self) -> anyhow::Result<()> {
        let mut rest = Vec::new();
        self.file
            .deref_mut()
            .read_to_end(&mut rest)
            .context("Unable to read index checksum")?;

        if rest.len() != CHECKSUM_SIZE {
            anyhow::bail!(
                "Index checksum should be {CHECKSUM_SIZE} bytes, found {}",
                rest.len()
            );
        }

        if rest.as_slice() != self.hasher.clone().finalize().as_slice() {
            anyhow::bail!("Index file is corrupt: checksum mismatch");
        }

        Ok(())
    }
}
