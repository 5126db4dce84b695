//! Handled repository errors
//!
//! Every variant is a condition the user can fix and re-run the command for.
//! The `Display` text is the exact message printed by the command line, which
//! then exits successfully. Anything that is not a `RepositoryError` (I/O
//! failures, corrupt objects) is an internal fault and travels as a plain
//! `anyhow::Error`.
//!
//! All handled errors are raised before the operation writes anything.

use thiserror::Error;

/// Coarse classification of handled errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong arity, missing repository, malformed input
    Usage,
    /// Unknown commit, branch or file
    NotFound,
    /// The repository state forbids the operation
    StateConflict,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Please enter a command.")]
    NoCommand,
    #[error("No command with that name exists.")]
    UnknownCommand,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("Not in an initialized Twig directory.")]
    NotInitialized,
    #[error("A Twig version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("File does not exist.")]
    FileDoesNotExist,
    #[error("Please enter a commit message.")]
    EmptyMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No reason to remove the file.")]
    NoReasonToRemove,
    #[error("No commit with that id exists.")]
    NoSuchCommit,
    #[error("Commit id prefix is ambiguous.")]
    AmbiguousCommitId,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No such branch exists.")]
    NoSuchBranch,
    #[error("No need to checkout the current branch.")]
    SameBranch,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict,
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),
    #[error("A branch with that name does not exist.")]
    BranchNotFound,
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    SelfMerge,
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NoCommand
            | RepositoryError::UnknownCommand
            | RepositoryError::IncorrectOperands
            | RepositoryError::NotInitialized
            | RepositoryError::EmptyMessage
            | RepositoryError::InvalidBranchName(_) => ErrorKind::Usage,
            RepositoryError::FileDoesNotExist
            | RepositoryError::NoSuchCommit
            | RepositoryError::AmbiguousCommitId
            | RepositoryError::FileNotInCommit
            | RepositoryError::NoSuchBranch
            | RepositoryError::BranchNotFound => ErrorKind::NotFound,
            RepositoryError::AlreadyInitialized
            | RepositoryError::NothingToCommit
            | RepositoryError::NoReasonToRemove
            | RepositoryError::SameBranch
            | RepositoryError::UntrackedFileConflict
            | RepositoryError::BranchAlreadyExists
            | RepositoryError::CannotRemoveCurrentBranch
            | RepositoryError::UncommittedChanges
            | RepositoryError::SelfMerge => ErrorKind::StateConflict,
        }
    }
}

/// Extract the handled error from an `anyhow` chain, if there is one
pub fn as_repository_error(error: &anyhow::Error) -> Option<&RepositoryError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<RepositoryError>())
}
