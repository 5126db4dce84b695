//! Blob object
//!
//! Blobs store file content. They contain only the raw file bytes, without
//! the file name: the name lives in the commit mapping that points at the blob,
//! so two files with equal content share one blob.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, with_header};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Blob object representing one version of a file's content
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(with_header(self.object_type(), &self.content))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn identity_depends_only_on_content() {
        let first = Blob::new(Bytes::from_static(b"hello\n"));
        let second = Blob::new(Bytes::from_static(b"hello\n"));
        let other = Blob::new(Bytes::from_static(b"hello!\n"));

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_ne!(first.object_id().unwrap(), other.object_id().unwrap());
    }

    #[test]
    fn serialized_blob_carries_header_and_raw_bytes() {
        let blob = Blob::new(Bytes::from_static(&[0xff, 0x00, b'x']));
        let serialized = blob.serialize().unwrap();

        assert_eq!(&serialized[..], b"blob 3\0\xff\0x");

        let mut reader = Cursor::new(serialized);
        let header = ObjectType::read_header(&mut reader).unwrap();
        assert_eq!(header, (ObjectType::Blob, 3));
        assert_eq!(Blob::deserialize(reader).unwrap(), blob);
    }
}
