use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        let index = self.index();
        let mut index = index.lock().await;
        index.clear();
        index
            .write_updates()
            .context("Failed to create .twig/index file")?;

        let root_commit_id = self.database().store(&Commit::root())?;

        let default_branch = BranchName::default_branch();
        self.refs()
            .update_branch(&default_branch, &root_commit_id)
            .context("Failed to create default branch")?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        Ok(())
    }
}
