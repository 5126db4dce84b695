//! Working directory access
//!
//! File names are paths relative to the repository root with `/` separators.
//! Everything under the repository directory itself is invisible here.

use crate::REPOSITORY_DIR;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [REPOSITORY_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Whether a regular file with this name exists
    pub fn exists(&self, file_name: &str) -> bool {
        self.file_path(file_name).is_file()
    }

    pub fn parse_blob(&self, file_name: &str) -> anyhow::Result<Blob> {
        let data = self.read_file(file_name)?;
        Ok(Blob::new(data))
    }

    /// Turn a user-supplied path into a file name inside the working tree
    ///
    /// `.` components and repeated separators are dropped. Absolute paths,
    /// `..` components, anything under the repository directory and names
    /// containing a line break are rejected with `FileDoesNotExist`.
    pub fn normalize_file_name(file_name: &str) -> anyhow::Result<String> {
        let mut components = Vec::new();

        for component in Path::new(file_name).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => {
                    let part = part.to_str().ok_or(RepositoryError::FileDoesNotExist)?;
                    components.push(part);
                }
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(RepositoryError::FileDoesNotExist.into());
                }
            }
        }

        let is_valid = match components.first() {
            Some(first) => {
                !Self::is_ignored(first) && components.iter().all(|part| !part.contains('\n'))
            }
            None => false,
        };

        match is_valid {
            true => Ok(components.join("/")),
            false => Err(RepositoryError::FileDoesNotExist.into()),
        }
    }

    /// Every regular file below the root, sorted by name
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        self.list_files_below(&self.path)
    }

    /// Files found below `dir_name` when it is a directory, sorted by name
    pub fn list_files_in(&self, dir_name: &str) -> anyhow::Result<Vec<String>> {
        let dir_path = self.file_path(dir_name);

        match dir_path.is_dir() {
            true => self.list_files_below(&dir_path),
            false => Ok(Vec::new()),
        }
    }

    /// Leading path components of `file_name` that exist as non-directories
    ///
    /// Any of them keeps `file_name` from being created.
    pub fn blocking_parents(&self, file_name: &str) -> Vec<String> {
        let parts = file_name.split('/').collect::<Vec<_>>();

        (1..parts.len())
            .map(|depth| parts[..depth].join("/"))
            .filter(|parent| {
                let path = self.file_path(parent);
                path.exists() && !path.is_dir()
            })
            .collect()
    }

    fn list_files_below(&self, root: &Path) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.file_name(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    fn file_name(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;

        Some(
            relative_path
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    pub fn read_file(&self, file_name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.file_path(file_name);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    /// Create or overwrite a file, creating missing parent directories
    pub fn write_file(&self, file_name: &str, data: &[u8]) -> anyhow::Result<()> {
        let path = self.file_path(file_name);

        if path.is_dir() {
            Self::remove_empty_dirs(&path)?;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directories for: {:?}", file_name)
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_name))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_name))?;

        Ok(())
    }

    /// Delete a file if present, then any parent directories it leaves empty
    pub fn remove_file(&self, file_name: &str) -> anyhow::Result<()> {
        let path = self.file_path(file_name);

        if !path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove file: {:?}", file_name))?;
        self.prune_empty_parent_dirs(&path)
    }

    // fails on the first file found; only empty directory trees go away
    fn remove_empty_dirs(path: &Path) -> anyhow::Result<()> {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                Self::remove_empty_dirs(&entry.path())?;
            }
        }

        std::fs::remove_dir(path)
            .with_context(|| format!("Directory in the way is not empty: {:?}", path))
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    // Deletions go first so a file can replace a directory that only held
    // deleted files.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_name, _) in migration.files_for(ActionType::Delete) {
            self.remove_file(file_name)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_name, oid) in migration.files_for(action) {
                let oid = oid.with_context(|| format!("No blob planned for {:?}", file_name))?;
                let data = migration.load_blob_data(oid)?;
                self.write_file(file_name, &data)?;
            }
        }

        Ok(())
    }
}
