use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::merge::resolution::{self, MergeAction};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

const ANCESTOR_MESSAGE: &str = "Given branch is an ancestor of the current branch.";
const FAST_FORWARD_MESSAGE: &str = "Current branch fast-forwarded.";
const CONFLICT_MESSAGE: &str = "Encountered a merge conflict.";

/// How the staging area records one merged file
enum StagedChange {
    Add(ObjectId),
    Remove,
}

impl Repository {
    pub async fn merge(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        let target_name = match BranchName::try_parse(name.to_string()) {
            Ok(branch_name) => branch_name,
            Err(_) => return Err(RepositoryError::BranchNotFound.into()),
        };
        let target_id = self
            .refs()
            .read_branch(&target_name)?
            .ok_or(RepositoryError::BranchNotFound)?;

        let current_name = self.refs().read_head()?;
        if current_name == target_name {
            return Err(RepositoryError::SelfMerge.into());
        }

        let (head_id, head_commit) = self.head_commit()?;
        let split_id = self.split_point(&head_id, &target_id)?;

        if split_id == target_id {
            writeln!(self.writer(), "{ANCESTOR_MESSAGE}")?;
            return Ok(());
        }

        if split_id == head_id {
            self.switch_branch(&mut index, &target_name, &target_id)?;
            writeln!(self.writer(), "{FAST_FORWARD_MESSAGE}")?;
            return Ok(());
        }

        let target_commit = self.database().load_commit(&target_id)?;
        let split_commit = self.database().load_commit(&split_id)?;

        Migration::ensure_no_untracked_in_the_way(
            self,
            &index,
            head_commit.blobs(),
            target_commit.blobs(),
        )?;

        let actions = resolution::resolve_all(
            split_commit.blobs(),
            head_commit.blobs(),
            target_commit.blobs(),
        );

        // plan everything before the first write
        let mut migration = Migration::new(self);
        let mut conflict_blobs = Vec::new();
        let mut staged_changes = Vec::new();

        for (file_name, action) in &actions {
            match action {
                MergeAction::Keep => {}
                MergeAction::TakeTarget(blob_id) => {
                    migration.plan_write(file_name, blob_id.clone());
                    staged_changes.push((file_name, StagedChange::Add(blob_id.clone())));
                }
                MergeAction::Remove => {
                    migration.plan_delete(file_name);
                    staged_changes.push((file_name, StagedChange::Remove));
                }
                MergeAction::Conflict { current, target } => {
                    let blob = self.conflict_blob(current.as_ref(), target.as_ref())?;
                    let blob_id = blob.object_id()?;

                    migration.plan_write(file_name, blob_id.clone());
                    staged_changes.push((file_name, StagedChange::Add(blob_id)));
                    conflict_blobs.push(blob);
                }
            }
        }

        migration.ensure_paths_are_clear()?;

        for blob in &conflict_blobs {
            self.database().store(blob)?;
        }
        migration.apply_changes()?;

        for (file_name, change) in staged_changes {
            match change {
                StagedChange::Add(blob_id) => index.add(file_name.clone(), blob_id),
                StagedChange::Remove => index.stage_for_removal(file_name.clone()),
            }
        }

        let message = format!("Merged {} into {}.", target_name, current_name);
        self.commit_staged(&mut index, &message, Some(target_id))?;

        if actions.values().any(MergeAction::is_conflict) {
            writeln!(self.writer(), "{CONFLICT_MESSAGE}")?;
        }

        Ok(())
    }

    fn conflict_blob(
        &self,
        current: Option<&ObjectId>,
        target: Option<&ObjectId>,
    ) -> anyhow::Result<Blob> {
        let current = current
            .map(|blob_id| self.database().load_blob_data(blob_id))
            .transpose()?;
        let target = target
            .map(|blob_id| self.database().load_blob_data(blob_id))
            .transpose()?;

        Ok(Blob::new(resolution::conflict_content(
            current.as_deref(),
            target.as_deref(),
        )))
    }
}
