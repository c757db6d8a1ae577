//! Common test utilities and helpers
//!
//! Builds throwaway source trees with a `use.list`, stand-in build tool and
//! cleanup scripts, and runs the compiled `modbatch` binary against them.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the file the stand-in scripts append their invocations to
pub const CALL_LOG: &str = "calls.log";

/// A temporary source tree used as the base directory
pub struct TreeFixture {
    pub temp_dir: TempDir,
}

impl TreeFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a module directory (and its parents)
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.path().join(relative);
        fs::create_dir_all(&path).expect("create module dir");
        path
    }

    /// Write a file relative to the base directory
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).expect("read fixture file")
    }

    /// Write `use.list` with one entry per line
    pub fn use_list(&self, entries: &[&str]) {
        let mut contents = entries.join("\n");
        contents.push('\n');
        self.write("use.list", &contents);
    }

    /// Install a stand-in for the go tool and point `modbatch.yaml` at it.
    ///
    /// The script logs `<pwd> <args>` and writes a go.mod on `mod init`,
    /// reporting it on stderr like the real tool.
    /// `mod tidy` fails in directories containing a `fail-tidy` file.
    pub fn fake_go(&self) {
        self.fake_go_with_settings("");
    }

    /// Same as [`TreeFixture::fake_go`] with extra `modbatch.yaml` lines
    pub fn fake_go_with_settings(&self, extra_settings: &str) {
        let log = self.path().join(CALL_LOG);
        let script = format!(
            "echo \"$(pwd) $*\" >> '{log}'\n\
             if [ \"$1 $2\" = \"mod init\" ]; then echo \"module $3\" > go.mod; echo \"go: creating new go.mod: module $3\" >&2; fi\n\
             if [ \"$1 $2\" = \"mod tidy\" ] && [ -f fail-tidy ]; then echo 'tidy failed' >&2; exit 1; fi\n\
             exit 0\n",
            log = log.display()
        );
        let script_path = self.write("tools/fake-go.sh", &script);

        let settings = format!(
            "go_binary: \"sh {}\"\n{}",
            script_path.display(),
            extra_settings
        );
        self.write("modbatch.yaml", &settings);
    }

    /// Install a `clean.sh` that logs the directory it was given
    pub fn fake_clean_script(&self) {
        let log = self.path().join(CALL_LOG);
        self.write(
            "clean.sh",
            &format!("echo \"clean $1\" >> '{}'\n", log.display()),
        );
    }

    /// Lines written by the stand-in scripts, empty when nothing ran
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(self.path().join(CALL_LOG)) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// `modbatch -C <tree> --no-color` with a clean environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("modbatch").expect("binary is built");
        cmd.env_remove("MODBATCH_PREFIX")
            .env_remove("RUST_LOG")
            .env_remove("NO_COLOR")
            .arg("-C")
            .arg(self.path())
            .arg("--no-color");
        cmd
    }
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}
