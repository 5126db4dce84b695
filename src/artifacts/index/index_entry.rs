use crate::artifacts::index::checksum::IndexStream;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use byteorder::{NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use std::io::Write;

const KIND_ADDED: u8 = 0;
const KIND_REMOVED: u8 = 1;

/// One staged change as stored in the index file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// File staged for addition, pointing at the blob the next commit will track
    Added { name: String, oid: ObjectId },
    /// File staged for removal from the next commit
    Removed { name: String },
}

impl IndexEntry {
    pub fn name(&self) -> &str {
        match self {
            IndexEntry::Added { name, .. } | IndexEntry::Removed { name } => name,
        }
    }

    /// Read the next entry from the index file
    pub(crate) fn read_from(reader: &mut IndexStream) -> anyhow::Result<Self> {
        let kind = reader.read_u8()?;

        let oid = match kind {
            KIND_ADDED => {
                let oid_bytes = reader.read_bytes(OBJECT_ID_LENGTH / 2)?;
                Some(ObjectId::read_h40_from(&mut oid_bytes.as_slice())?)
            }
            KIND_REMOVED => None,
            _ => return Err(anyhow!("Invalid index entry kind: {kind}")),
        };

        let name_length = reader.read_u16()?;
        let name = reader.read_bytes(usize::from(name_length))?;
        let name = String::from_utf8(name).context("Invalid file name in index")?;

        Ok(match oid {
            Some(oid) => IndexEntry::Added { name, oid },
            None => IndexEntry::Removed { name },
        })
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::new();

        match self {
            IndexEntry::Added { oid, .. } => {
                bytes.write_u8(KIND_ADDED)?;
                oid.write_h40_to(&mut bytes)?;
            }
            IndexEntry::Removed { .. } => bytes.write_u8(KIND_REMOVED)?,
        }

        let name = self.name().as_bytes();
        let name_length =
            u16::try_from(name.len()).context(format!("File name too long: {}", self.name()))?;
        bytes.write_u16::<NetworkEndian>(name_length)?;
        bytes.write_all(name)?;

        Ok(Bytes::from(bytes))
    }
}
