//! Per-file three-way merge policy
//!
//! Every file in the union of the split point, current and target mappings is
//! resolved independently by the first matching rule:
//!
//! | # | split | current | target | condition                 | outcome      |
//! |---|-------|---------|--------|---------------------------|--------------|
//! | 1 | S     | C       | G      | S == C, S != G            | take target  |
//! | 2 | S     | C       | G      | S != C, S == G            | keep current |
//! | 3 | any   | C       | G      | C == G (both may be absent) | keep current |
//! | 4 | -     | -       | G      |                           | take target  |
//! | 5 | -     | C       | -      |                           | keep current |
//! | 6 | S     | C       | -      | S == C                    | remove       |
//! | 7 | S     | -       | G      | S == G                    | keep (absent)|
//! | 8 |       |         |        | anything else             | conflict     |

use crate::artifacts::objects::commit::BlobMapping;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

pub const CONFLICT_HEAD_MARKER: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_END_MARKER: &str = ">>>>>>>\n";

/// Outcome of merging a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the file as the current commit has it (present or absent)
    Keep,
    /// Check out the target version and stage it
    TakeTarget(ObjectId),
    /// Delete the file and stage the removal
    Remove,
    /// Both sides changed the file differently
    Conflict {
        current: Option<ObjectId>,
        target: Option<ObjectId>,
    },
}

impl MergeAction {
    pub fn is_conflict(&self) -> bool {
        matches!(self, MergeAction::Conflict { .. })
    }
}

/// Resolve one file from its blob in the split point, current and target commits
pub fn resolve(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    target: Option<&ObjectId>,
) -> MergeAction {
    match (split, current, target) {
        (Some(s), Some(c), Some(g)) if s == c && s != g => MergeAction::TakeTarget(g.clone()),
        (Some(s), Some(c), Some(g)) if s != c && s == g => MergeAction::Keep,
        (_, c, g) if c == g => MergeAction::Keep,
        (None, None, Some(g)) => MergeAction::TakeTarget(g.clone()),
        (None, Some(_), None) => MergeAction::Keep,
        (Some(s), Some(c), None) if s == c => MergeAction::Remove,
        (Some(s), None, Some(g)) if s == g => MergeAction::Keep,
        (_, c, g) => MergeAction::Conflict {
            current: c.cloned(),
            target: g.cloned(),
        },
    }
}

/// Resolve every file touched by any of the three commits, in file name order
pub fn resolve_all(
    split: &BlobMapping,
    current: &BlobMapping,
    target: &BlobMapping,
) -> BTreeMap<String, MergeAction> {
    let file_names = split
        .keys()
        .chain(current.keys())
        .chain(target.keys())
        .collect::<BTreeSet<_>>();

    file_names
        .into_iter()
        .map(|file_name| {
            let action = resolve(
                split.get(file_name),
                current.get(file_name),
                target.get(file_name),
            );
            (file_name.clone(), action)
        })
        .collect()
}

/// Content written in place of a conflicted file
///
/// A side that deleted the file contributes nothing between its markers.
pub fn conflict_content(current: Option<&[u8]>, target: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let target = target.unwrap_or_default();

    let mut content = Vec::with_capacity(
        CONFLICT_HEAD_MARKER.len()
            + current.len()
            + CONFLICT_SEPARATOR.len()
            + target.len()
            + CONFLICT_END_MARKER.len(),
    );
    content.extend_from_slice(CONFLICT_HEAD_MARKER.as_bytes());
    content.extend_from_slice(current);
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    content.extend_from_slice(target);
    content.extend_from_slice(CONFLICT_END_MARKER.as_bytes());

    Bytes::from(content)
}
