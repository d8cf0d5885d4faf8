use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

pub(crate) const MAIN_CONFIG: &str = "hydrabot:\n  - when: issues.*\n    validate: []\n";
pub(crate) const FEATURE_CONFIG: &str = "hydrabot:\n  - when: pull_request.*\n    validate: []\n";

/// A repository with a single commit on `main` and no configuration file.
pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// A repository whose `main` carries `.github/hydrabot.yml`, plus:
/// - `edit-config`: modifies the configuration file
/// - `edit-readme`: touches only README.md
/// - `drop-config`: deletes the configuration file
pub(crate) fn create_config_repo() -> TempDir {
    let temp_dir = create_test_repo();
    let path = temp_dir.path();

    std::fs::create_dir_all(path.join(".github")).unwrap();
    std::fs::write(path.join(".github/hydrabot.yml"), MAIN_CONFIG).unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Add hydrabot config"]);

    branch_with(path, "edit-config", |p| {
        std::fs::write(p.join(".github/hydrabot.yml"), FEATURE_CONFIG).unwrap();
    });
    branch_with(path, "edit-readme", |p| {
        std::fs::write(p.join("README.md"), "# Changed\n").unwrap();
    });
    branch_with(path, "drop-config", |p| {
        std::fs::remove_file(p.join(".github/hydrabot.yml")).unwrap();
    });

    temp_dir
}

fn branch_with(path: &Path, name: &str, change: impl FnOnce(&Path)) {
    git(path, &["checkout", "-q", "-b", name, "main"]);
    change(path);
    git(path, &["add", "-A"]);
    git(path, &["commit", "-m", name]);
    git(path, &["checkout", "-q", "main"]);
}

pub(crate) fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}
