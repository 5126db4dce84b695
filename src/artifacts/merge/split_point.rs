//! Split point search for merges
//!
//! The split point of two branches is the latest common ancestor of their tips.
//! The search runs in two phases:
//!
//! 1. Collect every ancestor of the current tip (the tip included) with an
//!    explicit worklist over both parents.
//! 2. Walk breadth-first from the target tip, expanding first parents before
//!    second parents, and stop at the first commit already collected in phase 1.
//!
//! When several common ancestors sit at the same distance from the target tip,
//! the one reached through earlier parents wins, which makes the result
//! deterministic for criss-cross histories.
//!
//! ## Debug Logging
//!
//! Build with `--features debug_merge` to trace the traversal on stderr.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let split = find_split_point(&current, &target, |commit_id| {
//!     // load the parents of the commit
//!     database.load_commit(commit_id).map(|commit| commit.parents().to_vec())
//! })?;
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Macro for debug logging that is enabled with the debug_merge feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_CURRENT = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_CURRENT.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_CURRENT) {
            flags.push("CURRENT");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Every commit reachable from `commit_id` through any parent, `commit_id` included
///
/// `load_parents` returns the parents of a commit in order; it is called once
/// per reachable commit.
pub fn ancestors_of<ParentsLoaderFn>(
    commit_id: &ObjectId,
    load_parents: ParentsLoaderFn,
) -> anyhow::Result<HashSet<ObjectId>>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    let mut ancestors = HashSet::new();
    let mut worklist = vec![commit_id.clone()];

    while let Some(commit_id) = worklist.pop() {
        if !ancestors.insert(commit_id.clone()) {
            continue;
        }

        worklist.extend(
            load_parents(&commit_id)?
                .into_iter()
                .filter(|parent_id| !ancestors.contains(parent_id)),
        );
    }

    Ok(ancestors)
}

/// Latest common ancestor of `current` and `target`
///
/// Fails only when the two commits share no history, which cannot happen for
/// commits descending from the same root commit.
pub fn find_split_point<ParentsLoaderFn>(
    current: &ObjectId,
    target: &ObjectId,
    load_parents: ParentsLoaderFn,
) -> anyhow::Result<ObjectId>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    SplitPointFinder::new(load_parents).find(current, target)
}

struct SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    load_parents: ParentsLoaderFn,
    states: HashMap<ObjectId, VisitState>,
}

impl<ParentsLoaderFn> SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    fn new(load_parents: ParentsLoaderFn) -> Self {
        Self {
            load_parents,
            states: HashMap::new(),
        }
    }

    fn state_of(&self, commit_id: &ObjectId) -> VisitState {
        self.states
            .get(commit_id)
            .copied()
            .unwrap_or(VisitState::NONE)
    }

    fn mark(&mut self, commit_id: &ObjectId, state: VisitState) -> VisitState {
        let entry = self
            .states
            .entry(commit_id.clone())
            .or_insert(VisitState::NONE);
        *entry |= state;
        *entry
    }

    fn find(mut self, current: &ObjectId, target: &ObjectId) -> anyhow::Result<ObjectId> {
        for ancestor in ancestors_of(current, &self.load_parents)? {
            self.mark(&ancestor, VisitState::VISITED_FROM_CURRENT);
        }

        let mut queue = VecDeque::from([target.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            if self.state_of(&commit_id).contains(VisitState::VISITED_FROM_TARGET) {
                continue;
            }

            let state = self.mark(&commit_id, VisitState::VISITED_FROM_TARGET);
            debug_log!("Processing commit {}: state={}", &commit_id, state);

            if state.contains(VisitState::VISITED_FROM_BOTH) {
                debug_log!("Split point of {} and {}: {}", current, target, &commit_id);
                return Ok(commit_id);
            }

            for parent_id in (self.load_parents)(&commit_id)? {
                if !self.state_of(&parent_id).contains(VisitState::VISITED_FROM_TARGET) {
                    queue.push_back(parent_id);
                }
            }
        }

        Err(anyhow!(
            "Commits {} and {} have no common ancestor",
            current,
            target
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    /// In-memory commit store for testing
    #[derive(Debug, Clone, Default)]
    struct InMemoryCommitStore {
        commits: HashMap<ObjectId, Vec<ObjectId>>,
    }

    impl InMemoryCommitStore {
        fn add_commit(&mut self, commit_id: ObjectId, parents: Vec<ObjectId>) {
            self.commits.insert(commit_id, parents);
        }

        fn get_parents(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
            self.commits
                .get(commit_id)
                .cloned()
                .ok_or_else(|| anyhow!("Commit {} not found in test store", commit_id))
        }

        fn split_point(&self, current: &ObjectId, target: &ObjectId) -> ObjectId {
            find_split_point(current, target, |oid| self.get_parents(oid)).unwrap()
        }
    }

    fn create_oid(id: &str) -> ObjectId {
        // Create a deterministic 40-character hex ObjectId from string for testing
        let mut hex_string = id
            .as_bytes()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<String>();

        while hex_string.len() < 40 {
            hex_string.push('0');
        }
        hex_string.truncate(40);

        ObjectId::try_parse(hex_string).unwrap()
    }

    #[fixture]
    fn linear_history() -> InMemoryCommitStore {
        let mut store = InMemoryCommitStore::default();

        // Linear history: A <- B <- C
        store.add_commit(create_oid("a"), vec![]);
        store.add_commit(create_oid("b"), vec![create_oid("a")]);
        store.add_commit(create_oid("c"), vec![create_oid("b")]);

        store
    }

    #[fixture]
    fn diverged_branches() -> InMemoryCommitStore {
        let mut store = InMemoryCommitStore::default();

        //     A
        //    / \
        //   B   C
        //   |   |
        //   D   E
        store.add_commit(create_oid("a"), vec![]);
        store.add_commit(create_oid("b"), vec![create_oid("a")]);
        store.add_commit(create_oid("c"), vec![create_oid("a")]);
        store.add_commit(create_oid("d"), vec![create_oid("b")]);
        store.add_commit(create_oid("e"), vec![create_oid("c")]);

        store
    }

    #[fixture]
    fn criss_cross_merge() -> InMemoryCommitStore {
        let mut store = InMemoryCommitStore::default();

        //     A
        //    / \
        //   B   C
        //   |\ /|
        //   | X |
        //   |/ \|
        //   D   E
        store.add_commit(create_oid("a"), vec![]);
        store.add_commit(create_oid("b"), vec![create_oid("a")]);
        store.add_commit(create_oid("c"), vec![create_oid("a")]);
        store.add_commit(create_oid("d"), vec![create_oid("b"), create_oid("c")]);
        store.add_commit(create_oid("e"), vec![create_oid("c"), create_oid("b")]);

        store
    }

    #[rstest]
    fn ancestors_include_the_commit_itself(linear_history: InMemoryCommitStore) {
        let ancestors =
            ancestors_of(&create_oid("c"), |oid| linear_history.get_parents(oid)).unwrap();

        assert_eq!(
            ancestors,
            HashSet::from([create_oid("a"), create_oid("b"), create_oid("c")])
        );
    }

    #[rstest]
    fn ancestors_follow_second_parents(criss_cross_merge: InMemoryCommitStore) {
        let ancestors =
            ancestors_of(&create_oid("d"), |oid| criss_cross_merge.get_parents(oid)).unwrap();

        assert_eq!(ancestors.len(), 4);
        assert!(ancestors.contains(&create_oid("c")));
        assert!(!ancestors.contains(&create_oid("e")));
    }

    #[rstest]
    fn linear_history_splits_at_the_older_commit(linear_history: InMemoryCommitStore) {
        let a = create_oid("a");
        let c = create_oid("c");

        assert_eq!(linear_history.split_point(&c, &a), a);
        assert_eq!(linear_history.split_point(&a, &c), a);
        assert_eq!(linear_history.split_point(&c, &c), c);
    }

    #[rstest]
    fn diverged_branches_split_at_the_fork(diverged_branches: InMemoryCommitStore) {
        assert_eq!(
            diverged_branches.split_point(&create_oid("d"), &create_oid("e")),
            create_oid("a")
        );
    }

    #[rstest]
    fn criss_cross_prefers_the_target_first_parent(criss_cross_merge: InMemoryCommitStore) {
        // both B and C are common ancestors one step away from either tip
        assert_eq!(
            criss_cross_merge.split_point(&create_oid("d"), &create_oid("e")),
            create_oid("c")
        );
        assert_eq!(
            criss_cross_merge.split_point(&create_oid("e"), &create_oid("d")),
            create_oid("b")
        );
    }

    #[test]
    fn nearer_second_parent_beats_farther_first_parent() {
        let mut store = InMemoryCommitStore::default();

        //   A <- B <- X
        //    \         \
        //     C <------ T (parents X, C)
        //      \
        //       D (current)
        store.add_commit(create_oid("a"), vec![]);
        store.add_commit(create_oid("b"), vec![create_oid("a")]);
        store.add_commit(create_oid("x"), vec![create_oid("b")]);
        store.add_commit(create_oid("c"), vec![create_oid("a")]);
        store.add_commit(create_oid("t"), vec![create_oid("x"), create_oid("c")]);
        store.add_commit(create_oid("d"), vec![create_oid("c")]);

        assert_eq!(
            store.split_point(&create_oid("d"), &create_oid("t")),
            create_oid("c")
        );
    }

    #[test]
    fn unrelated_histories_have_no_split_point() {
        let mut store = InMemoryCommitStore::default();
        store.add_commit(create_oid("a"), vec![]);
        store.add_commit(create_oid("z"), vec![]);

        assert!(
            find_split_point(&create_oid("a"), &create_oid("z"), |oid| store.get_parents(oid))
                .is_err()
        );
    }
}
