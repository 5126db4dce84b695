use crate::common::REPOSITORY_DIR;
use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository with `1.txt` and `2.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("2.txt"),
        "two\n".to_string(),
    ));

    twig_add(repository_dir.path(), &["1.txt", "2.txt"]);
    twig_commit(repository_dir.path(), "Initial files")
        .assert()
        .success()
        .stdout("");

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.env_remove("TWIG_COMMIT_DATE");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Commit with a fixed timestamp (`%Y-%m-%d %H:%M:%S %z`)
pub fn twig_commit_at(dir: &Path, message: &str, date: &str) -> Command {
    let mut cmd = twig_commit(dir, message);
    cmd.env("TWIG_COMMIT_DATE", date);
    cmd
}

/// Stage every file, asserting each `add` succeeds silently
pub fn twig_add(dir: &Path, files: &[&str]) {
    for file in files {
        run_twig_command(dir, &["add", file])
            .assert()
            .success()
            .stdout("");
    }
}

/// Write, stage and commit files in one step
pub fn commit_files(dir: &Path, files: &[(&str, &str)], message: &str) {
    for (name, content) in files {
        write_file(FileSpec::new(dir.join(name), content.to_string()));
    }

    twig_add(dir, &files.iter().map(|(name, _)| *name).collect::<Vec<_>>());
    twig_commit(dir, message).assert().success().stdout("");
}

pub fn checkout_branch(dir: &Path, branch: &str) {
    run_twig_command(dir, &["checkout", branch])
        .assert()
        .success()
        .stdout("");
}

pub fn create_branch(dir: &Path, branch: &str) {
    run_twig_command(dir, &["branch", branch])
        .assert()
        .success()
        .stdout("");
}

/// Tip commit ID of a branch, read straight from its ref file
pub fn branch_head(dir: &Path, branch: &str) -> String {
    let ref_path = dir
        .join(REPOSITORY_DIR)
        .join("refs")
        .join("heads")
        .join(branch);

    std::fs::read_to_string(&ref_path)
        .unwrap_or_else(|e| panic!("Failed to read ref {:?}: {}", ref_path, e))
        .trim()
        .to_string()
}

/// Name of the active branch
pub fn head_branch(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(REPOSITORY_DIR).join("HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}

/// Commit IDs printed by `find` for a message
pub fn find_commits(dir: &Path, message: &str) -> Vec<String> {
    let output = run_twig_command(dir, &["find", message])
        .output()
        .expect("Failed to run find");

    String::from_utf8(output.stdout)
        .expect("find output is not UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Raw bytes of the staging area file
pub fn read_index(dir: &Path) -> Vec<u8> {
    std::fs::read(dir.join(REPOSITORY_DIR).join("index")).unwrap_or_default()
}
