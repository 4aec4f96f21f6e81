//! External command invocation.
//!
//! Everything caravel does to a cluster goes through other people's CLIs
//! (helm, sops, gcloud, aws, kops, az). The [`CommandRunner`] trait is the
//! single seam for those calls: production code uses [`SystemRunner`], tests
//! substitute a recording double. Calls block until the child exits; a
//! non-zero exit is a fatal, non-retried failure carrying the rendered
//! command line for the operator.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{CommandError, Result};

/// Seam for external process invocation.
pub trait CommandRunner {
    /// Run `argv` with inherited stdio, blocking until exit.
    fn run(&self, argv: &[OsString]) -> std::result::Result<(), CommandError>;

    /// Run `argv` capturing stdout; stderr still reaches the terminal.
    fn capture(&self, argv: &[OsString]) -> std::result::Result<Vec<u8>, CommandError>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[OsString]) -> std::result::Result<(), CommandError> {
        debug!(command = %render(argv), "running");

        let status = command(argv)?.status().map_err(|e| CommandError::Spawn {
            command: render(argv),
            source: e,
        })?;

        check_status(argv, status.success(), status.code())
    }

    fn capture(&self, argv: &[OsString]) -> std::result::Result<Vec<u8>, CommandError> {
        debug!(command = %render(argv), "running (capturing stdout)");

        let output = command(argv)?
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| CommandError::Spawn {
                command: render(argv),
                source: e,
            })?;

        check_status(argv, output.status.success(), output.status.code())?;
        Ok(output.stdout)
    }
}

fn command(argv: &[OsString]) -> std::result::Result<Command, CommandError> {
    let (program, args) = argv.split_first().ok_or_else(|| CommandError::NotFound(
        "<empty command>".to_string(),
    ))?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}

fn check_status(
    argv: &[OsString],
    success: bool,
    code: Option<i32>,
) -> std::result::Result<(), CommandError> {
    if success {
        Ok(())
    } else {
        Err(CommandError::Failed {
            command: render(argv),
            // Killed by signal if there is no exit code
            status: code.unwrap_or(-1),
        })
    }
}

/// Render an argument vector as a single operator-facing command line.
pub fn render(argv: &[OsString]) -> String {
    argv.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build an argument vector from string literals.
pub fn argv<I, S>(parts: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    parts.into_iter().map(|p| p.as_ref().to_os_string()).collect()
}

/// Build a single `--flag=<path>` argument without assuming UTF-8 paths.
pub fn path_arg(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path.as_os_str());
    arg
}

/// Verify that every named executable is available on PATH.
///
/// Runs before authentication begins so a missing CLI fails the operation
/// before any side effect.
pub fn preflight(binaries: &[&str]) -> Result<()> {
    for bin in binaries {
        which::which(bin).map_err(|_| CommandError::NotFound(bin.to_string()))?;
        debug!(binary = %bin, "preflight ok");
    }
    Ok(())
}
