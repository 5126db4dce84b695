use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Restore a file to its version in the HEAD commit; staging is untouched
    pub async fn checkout_file(&mut self, file_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let (_, head_commit) = self.head_commit()?;
        self.restore_file(&head_commit, file_name)
    }

    /// Restore a file to its version in the commit named by a full or
    /// abbreviated ID; staging is untouched
    pub async fn checkout_commit_file(
        &mut self,
        commit_prefix: &str,
        file_name: &str,
    ) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let commit_id = self.database().resolve_commit(commit_prefix)?;
        let commit = self.database().load_commit(&commit_id)?;

        self.restore_file(&commit, file_name)
    }

    /// Switch to another branch, replacing the working tree with its tip
    pub async fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = match BranchName::try_parse(name.to_string()) {
            Ok(branch_name) => branch_name,
            Err(_) => return Err(RepositoryError::NoSuchBranch.into()),
        };

        let target_id = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::SameBranch.into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.switch_branch(&mut index, &branch_name, &target_id)
    }

    fn restore_file(&self, commit: &Commit, file_name: &str) -> anyhow::Result<()> {
        // names outside the working tree are never tracked
        let file_name = Workspace::normalize_file_name(file_name)
            .map_err(|_| RepositoryError::FileNotInCommit)?;
        let blob_id = commit
            .blob_for(&file_name)
            .ok_or(RepositoryError::FileNotInCommit)?;

        let data = self.database().load_blob_data(blob_id)?;
        self.workspace().write_file(&file_name, &data)
    }

    pub(crate) fn switch_branch(
        &self,
        index: &mut Index,
        branch_name: &BranchName,
        target_id: &ObjectId,
    ) -> anyhow::Result<()> {
        self.sync_working_tree(index, target_id)?;
        self.refs().set_head(branch_name)
    }

    /// Replace the files tracked by HEAD with those of the target commit and
    /// clear the staging area
    ///
    /// Fails with `UntrackedFileConflict` before touching anything when an
    /// untracked file would be overwritten.
    pub(crate) fn sync_working_tree(
        &self,
        index: &mut Index,
        target_id: &ObjectId,
    ) -> anyhow::Result<()> {
        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.database().load_commit(target_id)?;

        let migration = Migration::between(self, index, head_commit.blobs(), target_commit.blobs())?;
        migration.apply_changes()?;

        index.clear();
        index.write_updates()
    }
}
