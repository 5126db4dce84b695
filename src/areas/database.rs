//! Content-addressed object database
//!
//! Every blob and commit is stored as one zlib-compressed file named after
//! the object ID, directly under `.twig/objects`. Objects are immutable:
//! storing an object that already exists is a no-op, and nothing is ever
//! deleted.

use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.as_ref())
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Load the uncompressed serialized form of an object
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(object_id);

        if !object_path.is_file() {
            anyhow::bail!("Object {} not found", object_id);
        }

        self.read_object(object_path)
    }

    /// Store an object and return its ID
    ///
    /// Writing an object that is already stored leaves the existing file untouched.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = ObjectId::digest(&object_content);
        let object_path = self.object_path(&object_id);

        if !object_path.exists() {
            std::fs::create_dir_all(&self.path).context(format!(
                "Unable to create object directory {}",
                self.path.display()
            ))?;

            self.write_object(object_path, object_content)?;
        }

        Ok(object_id)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Load a commit that is known to exist (branch tips, parents)
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .with_context(|| format!("Object {} is not a commit", object_id))
    }

    /// Load the content of a blob that is known to exist (commit mappings, staging area)
    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self
            .parse_object_as_blob(object_id)?
            .with_context(|| format!("Object {} is not a blob", object_id))?;

        Ok(blob.into_content())
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let stored_size = object_content.len();
        let mut object_reader = Cursor::new(object_content);

        let (object_type, payload_size) = ObjectType::read_header(&mut object_reader)
            .with_context(|| format!("Object {} is corrupt", object_id))?;

        let found_size = stored_size - object_reader.position() as usize;
        if found_size != payload_size {
            anyhow::bail!(
                "Object {} is corrupt: header announces {} bytes, found {}",
                object_id,
                payload_size,
                found_size
            );
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let temp_object_path = self.path.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// List every stored object ID in store-iteration order (ascending ID)
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        if !self.path.is_dir() {
            return Ok(Vec::new());
        }

        WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                // leftover temp files are not objects
                (file_name.len() == OBJECT_ID_LENGTH).then_some(file_name)
            })
            .map(ObjectId::try_parse)
            .collect()
    }

    /// List every stored commit in store-iteration order, reachable or not
    pub fn list_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();

        for object_id in self.list_objects()? {
            if let Some(commit) = self.parse_object_as_commit(&object_id)? {
                commits.push((object_id, commit));
            }
        }

        Ok(commits)
    }

    /// Find all objects whose OID starts with the given prefix
    ///
    /// # Returns
    ///
    /// A vector of all matching ObjectIds in store-iteration order. If no
    /// matches are found, returns an empty vector. More than one match means
    /// the prefix is ambiguous.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        Ok(self
            .list_objects()?
            .into_iter()
            .filter(|object_id| object_id.as_ref().starts_with(&prefix))
            .collect())
    }

    /// Resolve a full or abbreviated commit ID
    ///
    /// A full-length ID must name a stored commit. A shorter prefix must match
    /// exactly one stored commit; blobs sharing the prefix are ignored.
    pub fn resolve_commit(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Err(RepositoryError::NoSuchCommit.into());
        }

        if prefix.len() == OBJECT_ID_LENGTH {
            let object_id = ObjectId::try_parse(prefix.to_string())?;

            return match self.exists(&object_id)
                && self.get_object_type(&object_id)? == ObjectType::Commit
            {
                true => Ok(object_id),
                false => Err(RepositoryError::NoSuchCommit.into()),
            };
        }

        let mut commits = Vec::new();
        for object_id in self.find_objects_by_prefix(prefix)? {
            if self.get_object_type(&object_id)? == ObjectType::Commit {
                commits.push(object_id);
            }
        }

        match commits.len() {
            0 => Err(RepositoryError::NoSuchCommit.into()),
            1 => Ok(commits.remove(0)),
            _ => Err(RepositoryError::AmbiguousCommitId.into()),
        }
    }
}

/// Memoizes commit parents during graph walks
///
/// Split point searches visit the same commits from both sides; the cache keeps
/// each commit from being read and inflated more than once.
#[derive(Debug, Default)]
pub struct CommitCache {
    parents: RefCell<HashMap<ObjectId, Vec<ObjectId>>>,
}

impl CommitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parents of a commit, first parent first
    pub fn get_or_load_parents(
        &self,
        database: &Database,
        object_id: &ObjectId,
    ) -> anyhow::Result<Vec<ObjectId>> {
        if let Some(parents) = self.parents.borrow().get(object_id) {
            return Ok(parents.clone());
        }

        let parents = database.load_commit(object_id)?.parents().to_vec();

        self.parents
            .borrow_mut()
            .insert(object_id.clone(), parents.clone());

        Ok(parents)
    }
}
