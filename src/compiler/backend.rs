//! Backend seam — the calls the adapter makes into a Faust compiler.

/// A fault raised by the backend while compiling or reading an artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendFault {
    pub message: String,
}

impl BackendFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A Faust compiler that can emit auxiliary files into its own private filesystem.
///
/// After `generate_aux_files` returns `Err`, the backend is in an undefined
/// state until `cleanup_after_exception` has been called.
pub trait FaustBackend {
    /// Compile `content` as the unit `name` with the given command line.
    ///
    /// `Ok(true)` means the artifacts named in `args` are now readable.
    fn generate_aux_files(
        &mut self,
        name: &str,
        content: &str,
        args: &str,
    ) -> Result<bool, BackendFault>;

    /// Read a generated artifact as UTF-8 text.
    fn read_file(&self, path: &str) -> Result<String, BackendFault>;

    /// Diagnostic left behind by the last failure. Empty if none.
    fn error_after_exception(&self) -> String;

    /// Reset internal state after a fault so the backend can be reused.
    fn cleanup_after_exception(&mut self);

    fn version(&self) -> String;
}
