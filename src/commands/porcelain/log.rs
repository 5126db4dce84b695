use crate::areas::repository::Repository;
use crate::artifacts::log::history::FirstParentHistory;
use crate::artifacts::log::log_entry::LogEntry;
use std::io::Write;

const NO_MATCHING_COMMIT: &str = "Found no commit with that message.";

impl Repository {
    /// History of the current branch, following first parents only
    pub async fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let head_id = self.refs().read_head_oid()?;

        for entry in FirstParentHistory::new(self.database(), head_id) {
            let (commit_id, commit) = entry?;
            write!(self.writer(), "{}", LogEntry::new(&commit_id, &commit))?;
        }

        Ok(())
    }

    /// Every commit ever made, reachable or not, in object store order
    pub async fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for (commit_id, commit) in self.database().list_commits()? {
            write!(self.writer(), "{}", LogEntry::new(&commit_id, &commit))?;
        }

        Ok(())
    }

    /// IDs of every commit whose message is exactly `message`
    pub async fn find(&self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let matching_ids = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(commit_id, _)| commit_id)
            .collect::<Vec<_>>();

        if matching_ids.is_empty() {
            writeln!(self.writer(), "{NO_MATCHING_COMMIT}")?;
        }

        for commit_id in matching_ids {
            writeln!(self.writer(), "{commit_id}")?;
        }

        Ok(())
    }
}
