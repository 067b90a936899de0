//! Source stream provider
//!
//! Produces the -listx XML byte stream, either by running `exiftool -listx`
//! (captured to completion or as a live child process) or by reading a dump
//! that was captured earlier.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use serde::Deserialize;

use crate::listx::DEFAULT_INPUT_BUFFER_SIZE;

#[cfg(test)]
mod tests;

/// Bytes of a live child's standard error kept for error messages
pub const STDERR_LIMIT: usize = 64 * 1024;

/// Errors from the process producing the XML
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The command could not be started
    #[error("command failed: could not start `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully
    #[error("command failed: `{command}` exited with {status}: {stderr}")]
    Failed {
        /// Rendered command line
        command: String,
        /// Exit status
        status: ExitStatus,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// I/O error while talking to the process or reading a dump
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The external command that prints the -listx XML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListxCommand {
    /// Executable name or path
    pub program: String,

    /// Arguments passed to the executable
    pub args: Vec<String>,
}

impl Default for ListxCommand {
    fn default() -> Self {
        Self {
            program: "exiftool".to_string(),
            args: vec!["-listx".to_string()],
        }
    }
}

impl fmt::Display for ListxCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl ListxCommand {
    /// Create a command from a program and its arguments
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Run the command to completion and return everything it printed
    pub fn capture(&self) -> Result<Vec<u8>, SourceError> {
        debug!("Running `{}`", self);
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SourceError::Spawn {
                command: self.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Failed {
                command: self.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("`{}` printed {} bytes", self, output.stdout.len());
        Ok(output.stdout)
    }

    /// Start the command with piped output for live streaming
    pub fn spawn(&self) -> Result<ListxChild, SourceError> {
        debug!("Spawning `{}`", self);
        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                command: self.to_string(),
                source,
            })?;

        let stderr = child.stderr.take().map(drain_stderr);
        Ok(ListxChild {
            command: self.to_string(),
            child,
            stderr,
        })
    }
}

/// Read `pipe` until EOF on its own thread, keeping at most [`STDERR_LIMIT`] bytes
fn drain_stderr(mut pipe: ChildStderr) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut kept = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let room = STDERR_LIMIT.saturating_sub(kept.len());
                    kept.extend_from_slice(&buf[..n.min(room)]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("Reading child stderr failed: {}", e);
                    break;
                }
            }
        }
        kept
    })
}

/// A running -listx process
#[derive(Debug)]
pub struct ListxChild {
    command: String,
    child: Child,
    stderr: Option<JoinHandle<Vec<u8>>>,
}

impl ListxChild {
    /// Process ID of the child
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Take the child's standard output; returns `None` on the second call
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Kill the process if it is still running
    ///
    /// Killing a process that already exited is not an error.
    pub fn kill(&mut self) -> Result<(), SourceError> {
        match self.child.try_wait()? {
            Some(_) => Ok(()),
            None => {
                warn!("Killing `{}` (pid {})", self.command, self.child.id());
                match self.child.kill() {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
                    Err(e) => Err(SourceError::Io(e)),
                }
            }
        }
    }

    /// Wait for the process to exit and check its status
    ///
    /// Standard error is drained on a separate thread from the moment the
    /// process starts, so a chatty child never blocks on a full pipe while
    /// its stdout is being read. Any stdout still owned by this handle is
    /// dropped.
    pub fn wait(mut self) -> Result<(), SourceError> {
        drop(self.child.stdout.take());

        let status = self.child.wait()?;
        let stderr = match self.stderr.take().map(JoinHandle::join) {
            Some(Ok(raw)) => String::from_utf8_lossy(&raw).trim().to_string(),
            Some(Err(_)) => {
                warn!("Stderr reader for `{}` panicked", self.command);
                String::new()
            }
            None => String::new(),
        };
        debug!("`{}` exited with {}", self.command, status);
        if status.success() {
            Ok(())
        } else {
            Err(SourceError::Failed {
                command: self.command,
                status,
                stderr,
            })
        }
    }
}

/// Where the CLI reads its -listx XML from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Run the command and capture its output
    Command(ListxCommand),
    /// Read a previously captured dump
    File(PathBuf),
    /// Read standard input
    Stdin,
}

impl InputSource {
    /// Open the source as a buffered reader
    ///
    /// A command runs to completion first; its output is then read from memory.
    pub fn open(&self) -> Result<Box<dyn BufRead>, SourceError> {
        match self {
            InputSource::Command(cmd) => Ok(Box::new(std::io::Cursor::new(cmd.capture()?))),
            InputSource::File(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::with_capacity(
                    DEFAULT_INPUT_BUFFER_SIZE,
                    file,
                )))
            }
            InputSource::Stdin => Ok(Box::new(BufReader::with_capacity(
                DEFAULT_INPUT_BUFFER_SIZE,
                std::io::stdin(),
            ))),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Command(cmd) => write!(f, "`{}`", cmd),
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => write!(f, "<stdin>"),
        }
    }
}
