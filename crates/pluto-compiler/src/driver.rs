//! Subprocess orchestration for `plutoc`.
//!
//! The compiler only reads source from disk, so every analysis pass goes
//! through a temp-file handoff: write the live buffer out, point
//! `plutoc -p` at it, collect stdout. The temp file is removed on every
//! exit path, including errors, by the [`tempfile`] guard.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Failure to obtain compiler output.
///
/// A non-zero exit status is deliberately NOT an error: `plutoc` exits
/// non-zero whenever it reports diagnostics, which is the interesting
/// case.
#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    /// The buffer could not be staged into a temp file.
    #[error("failed to stage source into a temp file: {0}")]
    TempFile(#[source] std::io::Error),

    /// The compiler process could not be started at all.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// The executable that was invoked.
        program: String,
        /// The underlying spawn failure.
        #[source]
        source: std::io::Error,
    },
}

/// Runs `plutoc -p` over buffer contents.
#[derive(Debug, Clone)]
pub struct CompilerDriver {
    plutoc_path: PathBuf,
}

impl CompilerDriver {
    /// Create a driver invoking the given executable.
    pub fn new(plutoc_path: impl Into<PathBuf>) -> Self {
        Self { plutoc_path: plutoc_path.into() }
    }

    /// The executable this driver invokes.
    pub fn plutoc_path(&self) -> &Path {
        &self.plutoc_path
    }

    /// Analyze `contents` and return the compiler's stdout verbatim.
    ///
    /// The contents land in a fresh temp file with a `.lua` extension
    /// (the compiler keys its diagnostics format off the extension); the
    /// file is deleted before this function returns.
    pub fn run(&self, contents: &str) -> Result<String, CompilerError> {
        let mut source = tempfile::Builder::new()
            .prefix("pluto-lsp-")
            .suffix(".lua")
            .tempfile()
            .map_err(CompilerError::TempFile)?;
        source.write_all(contents.as_bytes()).map_err(CompilerError::TempFile)?;
        source.flush().map_err(CompilerError::TempFile)?;

        let output = Command::new(&self.plutoc_path)
            .arg("-p")
            .arg(source.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CompilerError::Spawn {
                program: self.plutoc_path.display().to_string(),
                source: e,
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for CompilerDriver {
    fn default() -> Self {
        Self::new("plutoc")
    }
}
