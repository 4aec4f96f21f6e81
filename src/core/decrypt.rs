//! Scoped decryption of sops-encrypted files.
//!
//! Cluster secrets (kubeconfigs, service-account keys) live encrypted in the
//! configuration repository. [`Decryptor::decrypt`] produces a
//! [`DecryptedFile`]: a temp file owning the plaintext, removed when the
//! value drops. The plaintext therefore never outlives the authentication
//! scope that needed it.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::process::{self, CommandRunner};
use crate::error::{DecryptError, Result};

/// Seam for secret decryption.
pub trait Decryptor {
    /// Decrypt `source` into a scoped plaintext file.
    fn decrypt(&self, source: &Path) -> Result<DecryptedFile>;
}

/// Plaintext secret material with a bounded lifetime.
///
/// Owns a `NamedTempFile`, so the file is unlinked when this drops. Temp
/// files are created with owner-only permissions on unix.
#[derive(Debug)]
pub struct DecryptedFile {
    file: NamedTempFile,
}

impl DecryptedFile {
    pub fn new(file: NamedTempFile) -> Self {
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Defensive existence check. Provider flows read and parse the
    /// plaintext as JSON immediately after acquisition, so a vanished file
    /// must fail here rather than as an opaque read error.
    pub fn verify(&self) -> Result<()> {
        if self.file.path().is_file() {
            Ok(())
        } else {
            Err(DecryptError::PlaintextMissing(self.file.path().to_path_buf()).into())
        }
    }
}

/// [`Decryptor`] that shells out to `sops --decrypt`.
pub struct SopsDecryptor<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> SopsDecryptor<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl Decryptor for SopsDecryptor<'_> {
    fn decrypt(&self, source: &Path) -> Result<DecryptedFile> {
        // Fail before invoking sops if the source is missing outright
        if !source.is_file() {
            return Err(DecryptError::SourceMissing(source.to_path_buf()).into());
        }

        debug!(source = %source.display(), "decrypting");

        let mut cmd = process::argv(["sops", "--decrypt"]);
        cmd.push(source.as_os_str().to_os_string());

        let plaintext = self.runner.capture(&cmd).map_err(|e| DecryptError::Failed {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut file = NamedTempFile::new().map_err(io_failed(source))?;
        file.write_all(&plaintext).map_err(io_failed(source))?;
        file.flush().map_err(io_failed(source))?;

        Ok(DecryptedFile::new(file))
    }
}

fn io_failed(source: &Path) -> impl Fn(std::io::Error) -> DecryptError {
    let path = source.to_path_buf();
    move |e| DecryptError::Failed {
        path: path.clone(),
        reason: e.to_string(),
    }
}
