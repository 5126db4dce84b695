use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::object::Object;

impl Repository {
    pub async fn add(&mut self, file_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let file_name = Workspace::normalize_file_name(file_name)?;
        let file_name = file_name.as_str();

        if !self.workspace().exists(file_name) {
            return Err(RepositoryError::FileDoesNotExist.into());
        }

        let blob = self.workspace().parse_blob(file_name)?;
        let blob_id = blob.object_id()?;

        let (_, head_commit) = self.head_commit()?;

        // same content as HEAD: nothing left to stage, a pending removal included
        if head_commit.blob_for(file_name) == Some(&blob_id) {
            index.revert(file_name);
        } else {
            self.database().store(&blob)?;
            index.add(file_name.to_string(), blob_id);
        }

        index.write_updates()?;

        Ok(())
    }
}
