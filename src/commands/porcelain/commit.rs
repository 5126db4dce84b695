use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        self.commit_staged(&mut index, message, None)?;

        Ok(())
    }

    /// Snapshot HEAD's files with the staged changes applied and advance the
    /// active branch to it
    ///
    /// A merge passes the target tip as `second_parent`; merge commits are
    /// created even when nothing is staged.
    pub(crate) fn commit_staged(
        &self,
        index: &mut Index,
        message: &str,
        second_parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }

        if index.is_empty() && second_parent.is_none() {
            return Err(RepositoryError::NothingToCommit.into());
        }

        let (head_id, head_commit) = self.head_commit()?;

        let mut blobs = head_commit.blobs().clone();
        for (file_name, blob_id) in index.added() {
            blobs.insert(file_name.clone(), blob_id.clone());
        }
        for file_name in index.removed() {
            blobs.remove(file_name);
        }

        let parents = std::iter::once(head_id).chain(second_parent).collect();

        let commit = Commit::new(
            parents,
            Commit::timestamp_from_env(),
            blobs,
            message.to_string(),
        );
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        index.clear();
        index.write_updates()?;

        Ok(commit_id)
    }
}
