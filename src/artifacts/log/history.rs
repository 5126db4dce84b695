use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Walks the first-parent chain from a commit back to the root commit
///
/// Second parents of merge commits are never followed.
pub struct FirstParentHistory<'d> {
    database: &'d Database,
    next: Option<ObjectId>,
}

impl<'d> FirstParentHistory<'d> {
    pub fn new(database: &'d Database, start: ObjectId) -> Self {
        Self {
            database,
            next: Some(start),
        }
    }
}

impl Iterator for FirstParentHistory<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_id = self.next.take()?;

        match self.database.load_commit(&commit_id) {
            Ok(commit) => {
                self.next = commit.parent().cloned();
                Some(Ok((commit_id, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::BlobMapping;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    #[test]
    fn follows_first_parents_only() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let commit = |parents: Vec<ObjectId>, message: &str| {
            database
                .store(&Commit::new(
                    parents,
                    Commit::epoch(),
                    BlobMapping::new(),
                    message.to_string(),
                ))
                .unwrap()
        };

        let root = commit(vec![], "root");
        let side = commit(vec![root.clone()], "side");
        let main = commit(vec![root.clone()], "main");
        let merge = commit(vec![main.clone(), side], "merge");

        let messages = FirstParentHistory::new(&database, merge)
            .map(|entry| entry.unwrap().1.message().to_string())
            .collect::<Vec<_>>();

        assert_eq!(messages, vec!["merge", "main", "root"]);
    }
}
