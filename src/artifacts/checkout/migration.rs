//! Checkout migration and untracked-file detection
//!
//! Moving the working directory to another snapshot involves:
//!
//! 1. Planning file system operations (create, overwrite, delete)
//! 2. Detecting untracked files the move would overwrite, including files
//!    inside a directory that a planned file replaces and files sitting
//!    where a planned file needs a directory
//! 3. Applying the planned operations to the workspace
//!
//! ## Safety
//!
//! All operations are planned and validated before execution, so a rejected
//! checkout leaves the working directory untouched.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::BlobMapping;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite existing file
    Modify,
}

/// Set of planned actions grouped by type, each file with the blob to write
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

/// Checkout migration planner and executor
pub struct Migration<'r> {
    repository: &'r Repository,
    /// Planned file system actions
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Self {
            repository,
            actions,
        }
    }

    /// Plan the move from the `current` snapshot to the `target` snapshot
    ///
    /// Every target file is written and every current file missing from the
    /// target is deleted. Fails with `UntrackedFileConflict` when a target
    /// file would overwrite an untracked working file with different content.
    pub fn between(
        repository: &'r Repository,
        index: &Index,
        current: &BlobMapping,
        target: &BlobMapping,
    ) -> anyhow::Result<Self> {
        Self::ensure_no_untracked_in_the_way(repository, index, current, target)?;

        let mut migration = Self::new(repository);

        for (file_name, oid) in target {
            let action = match current.contains_key(file_name) {
                true => ActionType::Modify,
                false => ActionType::Add,
            };
            migration.record_change(action, file_name, Some(oid.clone()));
        }

        for file_name in current.keys().filter(|name| !target.contains_key(*name)) {
            migration.record_change(ActionType::Delete, file_name, None);
        }

        migration.ensure_paths_are_clear()?;

        Ok(migration)
    }

    /// Reject the plan when a planned write would need to replace something
    /// the plan does not delete itself
    ///
    /// A file written at `d` needs every file below a directory `d` gone, and
    /// a file written at `d/x` needs a file `d` gone.
    pub fn ensure_paths_are_clear(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();
        let deleted = self
            .files_for(ActionType::Delete)
            .map(|(file_name, _)| file_name)
            .collect::<HashSet<_>>();
        let written = self
            .files_for(ActionType::Add)
            .chain(self.files_for(ActionType::Modify))
            .map(|(file_name, _)| file_name);

        for file_name in written {
            let nested = workspace.list_files_in(file_name)?;
            let parents = workspace.blocking_parents(file_name);

            let is_blocked = nested
                .iter()
                .chain(parents.iter())
                .any(|blocking| !deleted.contains(blocking.as_str()));

            if is_blocked {
                return Err(RepositoryError::UntrackedFileConflict.into());
            }
        }

        Ok(())
    }

    /// Reject the move when it would clobber a file the current commit does
    /// not track and the staging area does not hold
    pub fn ensure_no_untracked_in_the_way(
        repository: &Repository,
        index: &Index,
        current: &BlobMapping,
        target: &BlobMapping,
    ) -> anyhow::Result<()> {
        let workspace = repository.workspace();

        for (file_name, oid) in target {
            if current.contains_key(file_name)
                || index.is_added(file_name)
                || !workspace.exists(file_name)
            {
                continue;
            }

            if &workspace.parse_blob(file_name)?.object_id()? != oid {
                return Err(RepositoryError::UntrackedFileConflict.into());
            }
        }

        Ok(())
    }

    /// Plan writing a blob to a file, creating it when missing
    pub fn plan_write(&mut self, file_name: &str, oid: ObjectId) {
        let action = match self.repository.workspace().exists(file_name) {
            true => ActionType::Modify,
            false => ActionType::Add,
        };

        self.record_change(action, file_name, Some(oid));
    }

    pub fn plan_delete(&mut self, file_name: &str) {
        self.record_change(ActionType::Delete, file_name, None);
    }

    fn record_change(&mut self, action: ActionType, file_name: &str, oid: Option<ObjectId>) {
        self.actions
            .entry(action)
            .or_default()
            .push((file_name.to_string(), oid));
    }

    /// Planned files for one action with the blob each receives
    pub fn files_for(
        &self,
        action: ActionType,
    ) -> impl Iterator<Item = (&str, Option<&ObjectId>)> + '_ {
        self.actions
            .get(&action)
            .into_iter()
            .flatten()
            .map(|(file_name, oid)| (file_name.as_str(), oid.as_ref()))
    }

    pub fn apply_changes(&self) -> anyhow::Result<()> {
        self.repository.workspace().apply_migration(self)
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.repository.database().load_blob_data(object_id)
    }
}
