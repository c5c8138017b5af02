// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with raw/gold text pairs
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Create a text file with given content
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write a raw/gold pair and return their paths
    pub fn create_pair(&self, name: &str, raw: &str, gold: &str) -> (PathBuf, PathBuf) {
        (
            self.create_file(format!("{name}.raw.txt"), raw),
            self.create_file(format!("{name}.gold.txt"), gold),
        )
    }

    /// Abbreviation list path, one entry per line
    pub fn create_abbreviations(&self, content: &str) -> PathBuf {
        self.create_file("abbreviations.txt", content)
    }

    pub fn path<P: AsRef<Path>>(&self, relative_path: P) -> PathBuf {
        self.root_path.join(relative_path)
    }

    pub fn read_file<P: AsRef<Path>>(&self, relative_path: P) -> String {
        fs::read_to_string(self.path(relative_path)).expect("Failed to read output file")
    }
}

/// Run the built CLI inside the fixture directory
pub fn run_cli(fixture: &TestFixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sentseg"))
        .args(args)
        .current_dir(&fixture.root_path)
        .output()
        .expect("Failed to run sentseg")
}

pub fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "sentseg failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context,
            expected_lines.len(),
            actual_lines.len()
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
