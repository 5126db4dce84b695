use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let workspace = self.repository.workspace();
        let (_, head_commit) = self.repository.head_commit()?;

        let workspace_files = workspace
            .list_files()?
            .into_iter()
            .collect::<BTreeSet<_>>();

        let mut workspace_changeset = ChangeSet::new();

        for (file_name, oid) in head_commit.blobs() {
            if index.is_added(file_name) || index.is_removed(file_name) {
                continue;
            }

            if let Some(change) = self.check_against_workspace(&workspace_files, file_name, oid)? {
                workspace_changeset.insert(file_name.clone(), change);
            }
        }

        for (file_name, oid) in index.added() {
            if let Some(change) = self.check_against_workspace(&workspace_files, file_name, oid)? {
                workspace_changeset.insert(file_name.clone(), change);
            }
        }

        let untracked_files = workspace_files
            .into_iter()
            .filter(|file_name| {
                index.is_removed(file_name)
                    || (!head_commit.tracks(file_name) && !index.is_added(file_name))
            })
            .collect();

        Ok(StatusInfo {
            current_branch: self.repository.refs().read_head()?,
            branches: self.repository.refs().list_branches()?,
            staged_files: index.added().keys().cloned().collect(),
            removed_files: index.removed().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    fn check_against_workspace(
        &self,
        workspace_files: &BTreeSet<String>,
        file_name: &str,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !workspace_files.contains(file_name) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        let actual = self
            .repository
            .workspace()
            .parse_blob(file_name)?
            .object_id()?;

        Ok((&actual != expected).then_some(WorkspaceChangeType::Modified))
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(f, "{branch}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for file_name in &self.staged_files {
            writeln!(f, "{file_name}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for file_name in &self.removed_files {
            writeln!(f, "{file_name}")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (file_name, change) in &self.workspace_changeset {
            writeln!(f, "{}", format!("{file_name} {change}").red())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for file_name in &self.untracked_files {
            writeln!(f, "{}", file_name.red())?;
        }
        writeln!(f)
    }
}
