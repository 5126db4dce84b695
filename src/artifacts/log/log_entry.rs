use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use derive_new::new;
use std::fmt;

/// One commit as shown by the history commands
///
/// ```text
/// ===
/// commit <id>
/// Merge: <first parent short> <second parent short>
/// Date: <date>
/// <message>
///
/// ```
///
/// The `Merge:` line only appears for merge commits.
#[derive(Debug, new)]
pub struct LogEntry<'c> {
    oid: &'c ObjectId,
    commit: &'c Commit,
}

impl fmt::Display for LogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "{}", format!("commit {}", self.oid).yellow())?;

        if let (Some(first), Some(second)) = (self.commit.parent(), self.commit.second_parent()) {
            writeln!(
                f,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }

        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::BlobMapping;
    use crate::artifacts::objects::object::Object;
    use pretty_assertions::assert_eq;

    #[test]
    fn shows_the_root_commit() {
        colored::control::set_override(false);
        let commit = Commit::root();
        let oid = commit.object_id().unwrap();

        assert_eq!(
            LogEntry::new(&oid, &commit).to_string(),
            format!("===\ncommit {oid}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n")
        );
    }

    #[test]
    fn shows_both_parents_of_a_merge() {
        colored::control::set_override(false);
        let first = ObjectId::digest(b"first");
        let second = ObjectId::digest(b"second");
        let commit = Commit::new(
            vec![first.clone(), second.clone()],
            Commit::epoch(),
            BlobMapping::new(),
            "Merged feature into master.".to_string(),
        );
        let oid = commit.object_id().unwrap();

        let entry = LogEntry::new(&oid, &commit).to_string();

        assert!(entry.contains(&format!(
            "\nMerge: {} {}\n",
            first.to_short_oid(),
            second.to_short_oid()
        )));
    }
}
