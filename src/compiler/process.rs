//! Faust backend that runs the `faust` executable inside a scratch directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::debug;

use super::backend::{BackendFault, FaustBackend};

/// Runs the Faust command-line compiler.
///
/// Each instance owns a private scratch directory that plays the role of the
/// compiler's filesystem: sources are written there, the compiler runs with it
/// as the working directory, and artifacts are read back from it.
pub struct FaustProcess {
    program: PathBuf,
    scratch: TempDir,
    last_error: String,
}

impl FaustProcess {
    /// Create a backend that invokes `program` (usually just `faust`).
    pub fn new(program: impl Into<PathBuf>) -> io::Result<Self> {
        Ok(Self {
            program: program.into(),
            scratch: tempfile::Builder::new().prefix("faust-cmaj").tempdir()?,
            last_error: String::new(),
        })
    }

    /// Directory the compiler runs in.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, BackendFault> {
        let relative = Path::new(path);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !inside {
            return Err(BackendFault::new(format!("unit path must be relative: {path}")));
        }
        Ok(self.scratch.path().join(relative))
    }

    fn clear_scratch(&self) -> io::Result<()> {
        for entry in fs::read_dir(self.scratch.path())? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

impl FaustBackend for FaustProcess {
    fn generate_aux_files(
        &mut self,
        name: &str,
        content: &str,
        args: &str,
    ) -> Result<bool, BackendFault> {
        // Artifacts only live until the next compile.
        self.clear_scratch()
            .map_err(|e| BackendFault::new(format!("cannot clear scratch dir: {e}")))?;
        let source_name = format!("{name}.dsp");
        let source = self.resolve(&source_name)?;
        if let Some(parent) = source.parent() {
            fs::create_dir_all(parent).map_err(|e| BackendFault::new(e.to_string()))?;
        }
        fs::write(&source, content).map_err(|e| BackendFault::new(e.to_string()))?;

        debug!(program = %self.program.display(), %args, "running faust");
        let output = Command::new(&self.program)
            .args(args.split_whitespace())
            .arg(&source_name)
            .current_dir(self.scratch.path())
            .output()
            .map_err(|e| {
                BackendFault::new(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            self.last_error = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Ok(false);
        }

        // The command-line compiler names the sidecar after the source file.
        let sidecar = self.resolve(&format!("{source_name}.json"))?;
        if sidecar.exists() {
            let target = self.resolve(&format!("{name}.json"))?;
            fs::rename(&sidecar, &target).map_err(|e| BackendFault::new(e.to_string()))?;
        }
        self.last_error.clear();
        Ok(true)
    }

    fn read_file(&self, path: &str) -> Result<String, BackendFault> {
        let full = self.resolve(path)?;
        fs::read_to_string(&full)
            .map_err(|e| BackendFault::new(format!("cannot read {path}: {e}")))
    }

    fn error_after_exception(&self) -> String {
        self.last_error.clone()
    }

    fn cleanup_after_exception(&mut self) {
        self.last_error.clear();
        if let Err(e) = self.clear_scratch() {
            debug!("failed to clear scratch dir: {e}");
        }
    }

    fn version(&self) -> String {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| {
                String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .next()
                    .map(|line| line.trim().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}
