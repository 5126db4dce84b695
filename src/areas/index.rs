//! Staging area
//!
//! The index records what the next commit changes relative to HEAD: files
//! staged for addition mapped to the blob they will point at, and files staged
//! for removal. A file name is never staged both ways at once.
//!
//! See [`crate::artifacts::index`] for the on-disk format.

use crate::artifacts::index::checksum::IndexStream;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.twig/index`)
    path: Box<Path>,
    /// Files staged for addition
    added: BTreeMap<String, ObjectId>,
    /// Files staged for removal
    removed: BTreeSet<String>,
    /// Set when the staging area differs from what was loaded
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            added: BTreeMap::new(),
            removed: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Load the staging area from disk
    ///
    /// A missing or empty index file is an empty staging area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.reset();

        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        // if the index file is empty, return early
        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = IndexStream::new(lock);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify_trailer()
    }

    fn parse_header(&self, reader: &mut IndexStream) -> anyhow::Result<u32> {
        let header_bytes = reader.read_bytes(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    fn parse_entries(&mut self, entries_count: u32, reader: &mut IndexStream) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            match IndexEntry::read_from(reader)? {
                IndexEntry::Added { name, oid } => self.add(name, oid),
                IndexEntry::Removed { name } => self.stage_for_removal(name),
            }
        }

        // loading is not a change
        self.changed = false;

        Ok(())
    }

    /// Persist the staging area
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the index file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = IndexStream::new(lock);

        let entries = self.entries().collect::<Vec<_>>();
        let header = IndexHeader::new(String::from(SIGNATURE), VERSION, entries.len() as u32);
        writer.write_all(&header.serialize()?)?;

        for entry in entries {
            writer.write_all(&entry.serialize()?)?;
        }

        writer.write_trailer()?;
        self.changed = false;

        Ok(())
    }

    /// Stage a file for addition, cancelling a pending removal
    pub fn add(&mut self, name: String, oid: ObjectId) {
        self.removed.remove(&name);
        self.added.insert(name, oid);
        self.changed = true;
    }

    /// Stage a file for removal, cancelling a pending addition
    pub fn stage_for_removal(&mut self, name: String) {
        self.added.remove(&name);
        self.removed.insert(name);
        self.changed = true;
    }

    /// Forget everything staged for a file
    pub fn revert(&mut self, name: &str) {
        let was_added = self.added.remove(name).is_some();
        let was_removed = self.removed.remove(name);

        self.changed |= was_added || was_removed;
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.changed = true;
        }

        self.added.clear();
        self.removed.clear();
    }

    fn reset(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.changed = false;
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added(&self) -> &BTreeMap<String, ObjectId> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    pub fn is_added(&self, name: &str) -> bool {
        self.added.contains_key(name)
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.removed.contains(name)
    }

    /// Staged changes in file order: additions first, then removals
    pub fn entries(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.added
            .iter()
            .map(|(name, oid)| IndexEntry::Added {
                name: name.clone(),
                oid: oid.clone(),
            })
            .chain(
                self.removed
                    .iter()
                    .map(|name| IndexEntry::Removed { name: name.clone() }),
            )
    }
}
