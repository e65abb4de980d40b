use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn tagdeck() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tagdeck"))
}

/// Scratch home with isolated XDG directories and the scripted tag tool.
struct Sandbox {
    root: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let script = root.path().join("fake-tag.sh");
        fs::copy(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/support/fake-tag.sh"),
            &script,
        )
        .expect("copy fake tag tool");

        let config_dir = root.path().join("config/tagdeck");
        fs::create_dir_all(&config_dir).expect("config dir");
        fs::write(
            config_dir.join("config.toml"),
            format!(
                "[tag]\nbinary = \"/bin/sh\"\nleading_args = [\"{}\"]\n",
                script.display()
            ),
        )
        .expect("write config");

        Self { root }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn image(&self, name: &str, tags: &[&str]) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, b"").expect("write image");
        if !tags.is_empty() {
            fs::write(format!("{}.tags", path.display()), tags.join("\n") + "\n")
                .expect("write tags");
        }
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        tagdeck()
            .args(args)
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("XDG_DATA_HOME", self.path().join("data"))
            .env("XDG_CACHE_HOME", self.path().join("cache"))
            .output()
            .expect("failed to run")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_exits_zero() {
    let output = tagdeck().arg("--help").output().expect("failed to run");
    assert!(output.status.success(), "tagdeck --help should exit 0");
    assert!(
        stdout(&output).contains("Finder tags"),
        "help should contain description"
    );
}

#[test]
fn test_version_exits_zero() {
    let output = tagdeck().arg("--version").output().expect("failed to run");
    assert!(output.status.success(), "tagdeck --version should exit 0");
    assert!(
        stdout(&output).contains("tagdeck"),
        "version output should contain crate name"
    );
}

#[cfg(target_os = "linux")]
#[test]
fn test_files_lists_only_images() {
    let sandbox = Sandbox::new();
    let pics = sandbox.path().join("pics");
    fs::create_dir_all(&pics).unwrap();
    for name in ["a.png", "b.jpg", "c.jpeg", "D.PNG", "notes.txt"] {
        fs::write(pics.join(name), b"").unwrap();
    }

    let output = sandbox.run(&["files", pics.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let mut listed: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    listed.sort();
    assert_eq!(listed, vec!["a.png", "b.jpg", "c.jpeg"]);
}

#[cfg(target_os = "linux")]
#[test]
fn test_files_without_directory_fails_cleanly() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["files"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("No directory given"), "stderr: {}", err);
    assert!(!err.contains("panicked"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_tag_round_trip_through_tool() {
    let sandbox = Sandbox::new();
    let image = sandbox.image("shot.png", &["old"]);
    let image = image.to_str().unwrap();

    let output = sandbox.run(&["add", image, "red,blue"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Tags added: red, blue."));

    let output = sandbox.run(&["list", image]);
    assert_eq!(stdout(&output).lines().collect::<Vec<_>>(), vec!["old", "red", "blue"]);

    let output = sandbox.run(&["remove", image, "old"]);
    assert!(stdout(&output).contains("Tags removed: old."));

    let output = sandbox.run(&["set", image]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Tags removed: red, blue."));

    let output = sandbox.run(&["list", image]);
    assert!(stdout(&output).contains("No tags on"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_tool_failure_exits_non_zero() {
    let sandbox = Sandbox::new();
    let image = sandbox.image("broken.png", &[]);

    let output = sandbox.run(&["add", image.to_str().unwrap(), "x"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Reading tags of"), "stderr: {}", err);
    assert!(err.contains("cannot read"), "stderr: {}", err);
}

#[cfg(target_os = "linux")]
#[test]
fn test_working_tags_are_remembered() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["working", "set", "cat", "dog, cat"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["working", "show"]);
    assert!(stdout(&output).contains("Working tags: cat, dog"));

    sandbox.run(&["working", "clear"]);
    let output = sandbox.run(&["working", "show"]);
    assert!(stdout(&output).contains("Working tags: (none)"));
}
