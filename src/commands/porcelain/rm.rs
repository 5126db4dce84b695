use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::errors::RepositoryError;

impl Repository {
    pub async fn rm(&mut self, file_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let file_name = Workspace::normalize_file_name(file_name)?;
        let file_name = file_name.as_str();

        let (_, head_commit) = self.head_commit()?;
        let is_staged = index.is_added(file_name);
        let is_tracked = head_commit.tracks(file_name);

        if !is_staged && !is_tracked {
            return Err(RepositoryError::NoReasonToRemove.into());
        }

        if is_staged {
            index.revert(file_name);
        }

        if is_tracked {
            index.stage_for_removal(file_name.to_string());
            self.workspace().remove_file(file_name)?;
        }

        index.write_updates()?;

        Ok(())
    }
}
