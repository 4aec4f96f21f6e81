//! Test harness utilities for caravel integration tests.
//!
//! Provides recording doubles for the external-process and decryption seams,
//! plus fixture helpers. Authentication tests mutate the process environment
//! and must be marked `#[serial]`.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use caravel::core::config::ClusterConfig;
use caravel::core::decrypt::{DecryptedFile, Decryptor};
use caravel::core::process::{render, CommandRunner};
use caravel::error::{CommandError, DecryptError, Result};

/// Records every invocation instead of running anything; optionally fails a
/// single call by index.
#[derive(Default)]
pub struct FakeRunner {
    calls: RefCell<Vec<Vec<String>>>,
    fail_on: Cell<Option<usize>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `index`-th recorded call (0-based) return a non-zero exit.
    pub fn fail_on_call(&self, index: usize) {
        self.fail_on.set(Some(index));
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, argv: &[OsString]) -> std::result::Result<(), CommandError> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(
            argv.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        );
        if self.fail_on.get() == Some(index) {
            Err(CommandError::Failed {
                command: render(argv),
                status: 1,
            })
        } else {
            Ok(())
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, argv: &[OsString]) -> std::result::Result<(), CommandError> {
        self.record(argv)
    }

    fn capture(&self, argv: &[OsString]) -> std::result::Result<Vec<u8>, CommandError> {
        self.record(argv)?;
        Ok(Vec::new())
    }
}

/// "Decrypts" by copying the source bytes to a scoped temp file, standing in
/// for sops in tests whose fixtures are already plaintext.
pub struct FakeDecryptor;

impl Decryptor for FakeDecryptor {
    fn decrypt(&self, source: &Path) -> Result<DecryptedFile> {
        if !source.is_file() {
            return Err(DecryptError::SourceMissing(source.to_path_buf()).into());
        }
        let mut file = NamedTempFile::new()?;
        file.write_all(&fs::read(source)?)?;
        file.flush()?;
        Ok(DecryptedFile::new(file))
    }
}

/// Always fails, simulating a missing decryption key.
pub struct FailingDecryptor;

impl Decryptor for FailingDecryptor {
    fn decrypt(&self, source: &Path) -> Result<DecryptedFile> {
        Err(DecryptError::Failed {
            path: source.to_path_buf(),
            reason: "simulated decryption failure".to_string(),
        }
        .into())
    }
}

/// Parse a cluster document with `base` as its directory.
pub fn cluster_from(yaml: &str, base: &Path) -> ClusterConfig {
    ClusterConfig::parse(yaml, base).expect("fixture cluster config must be valid")
}

/// Write a fixture file under `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write fixture file");
    path
}
