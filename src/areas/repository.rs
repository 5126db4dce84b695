use crate::REPOSITORY_DIR;
use crate::areas::database::{CommitCache, Database};
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::merge::split_point;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::cell::{RefCell, RefMut};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Repository context threaded through every operation
///
/// Holds the root path and the areas derived from it; nothing is process-wide,
/// so several repositories can be open side by side.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    commit_cache: CommitCache,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);

        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }

        let path = path.canonicalize()?;
        let twig_path = path.join(REPOSITORY_DIR);

        let index = Index::new(twig_path.join("index").into_boxed_path());
        let database = Database::new(twig_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(twig_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            commit_cache: CommitCache::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn twig_path(&self) -> Box<Path> {
        self.path.join(REPOSITORY_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.twig_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        match self.is_initialized() {
            true => Ok(()),
            false => Err(RepositoryError::NotInitialized.into()),
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Tip of the active branch along with its ID
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self.refs.read_head_oid()?;
        let head_commit = self.database.load_commit(&head_oid)?;

        Ok((head_oid, head_commit))
    }

    /// Every commit reachable from `oid` through any parent, `oid` included
    pub fn ancestors_of(&self, oid: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        split_point::ancestors_of(oid, |oid| {
            self.commit_cache.get_or_load_parents(&self.database, oid)
        })
    }

    /// Latest common ancestor of two commits, searched from the target side
    pub fn split_point(&self, current: &ObjectId, target: &ObjectId) -> anyhow::Result<ObjectId> {
        split_point::find_split_point(current, target, |oid| {
            self.commit_cache.get_or_load_parents(&self.database, oid)
        })
    }
}
