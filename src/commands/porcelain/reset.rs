use crate::areas::repository::Repository;

impl Repository {
    /// Check out every file of an arbitrary commit and move the active branch to it
    pub async fn reset(&mut self, commit_prefix: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let target_id = self.database().resolve_commit(commit_prefix)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.sync_working_tree(&mut index, &target_id)?;
        self.refs().update_head(&target_id)?;

        Ok(())
    }
}
