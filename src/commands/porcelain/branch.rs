use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;

impl Repository {
    /// Create a branch pointing at the current HEAD commit, without switching to it
    pub async fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())?;
        let head_id = self.refs().read_head_oid()?;

        self.refs().create_branch(&branch_name, &head_id)
    }

    /// Delete a branch ref; its commits stay in the object store
    pub async fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = match BranchName::try_parse(name.to_string()) {
            Ok(branch_name) if self.refs().branch_exists(&branch_name) => branch_name,
            _ => return Err(RepositoryError::BranchNotFound.into()),
        };

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::CannotRemoveCurrentBranch.into());
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
