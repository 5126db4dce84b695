use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Identity of the object: the SHA-1 digest of its serialized form
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        Ok(ObjectId::digest(&content))
    }
}

/// Prefix the payload with the `<type> <size>\0` header
pub(crate) fn with_header(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = object_type.header(payload.len());

    let mut object_bytes = Vec::with_capacity(header.len() + payload.len());
    object_bytes.extend_from_slice(header.as_bytes());
    object_bytes.extend_from_slice(payload);

    Bytes::from(object_bytes)
}
