//! Compiler adapter — Faust DSP source → Cmajor hybrid module + JSON UI descriptor.

pub mod args;
pub mod backend;
pub mod process;

pub use args::compile_args;
pub use backend::{BackendFault, FaustBackend};
pub use process::FaustProcess;

use std::path::PathBuf;

use tracing::debug;

use crate::error::CompileError;

/// Artifacts produced by one successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// Translated Cmajor source.
    pub cmajor: String,
    /// JSON UI descriptor.
    pub json: String,
}

/// Wraps a Faust backend and normalizes its failures.
///
/// Holds the only mutable compiler instance; calls must not overlap.
pub struct CmajorCompiler<B> {
    backend: B,
    include_dirs: Vec<PathBuf>,
    error_message: String,
}

impl<B: FaustBackend> CmajorCompiler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            include_dirs: Vec::new(),
            error_message: String::new(),
        }
    }

    /// Pass `-I <dir>` for each directory on every compile.
    pub fn with_include_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.include_dirs = dirs;
        self
    }

    /// Version reported by the underlying Faust library.
    pub fn version(&self) -> String {
        self.backend.version()
    }

    /// Message from the most recent failed compile. Cleared by the next call.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Compile `content` as unit `name`, appending `extra_args` before the
    /// mandatory name/output flags.
    pub fn compile(
        &mut self,
        name: &str,
        content: &str,
        extra_args: &str,
    ) -> Result<CompileOutput, CompileError> {
        self.error_message.clear();
        if name.is_empty() {
            return Err(self.fail("empty DSP name".to_string()));
        }

        let command = compile_args(name, extra_args, &self.include_dirs);
        debug!(%name, %command, "compiling");

        match self.run(name, content, &command) {
            Ok(Some(output)) => Ok(output),
            Ok(None) => {
                let reported = self.backend.error_after_exception();
                let message = if reported.is_empty() {
                    "compilation failed".to_string()
                } else {
                    reported
                };
                Err(self.fail(message))
            }
            Err(fault) => {
                let reported = self.backend.error_after_exception();
                let message = if reported.is_empty() {
                    fault.to_string()
                } else {
                    reported
                };
                self.backend.cleanup_after_exception();
                Err(self.fail(message))
            }
        }
    }

    fn run(
        &mut self,
        name: &str,
        content: &str,
        command: &str,
    ) -> Result<Option<CompileOutput>, BackendFault> {
        if !self.backend.generate_aux_files(name, content, command)? {
            return Ok(None);
        }
        let cmajor = self.backend.read_file(&args::cmajor_artifact(name))?;
        let json = self.backend.read_file(&args::json_artifact(name))?;
        Ok(Some(CompileOutput { cmajor, json }))
    }

    fn fail(&mut self, message: String) -> CompileError {
        debug!(%message, "faust compile failed");
        self.error_message = message.clone();
        CompileError::new(message)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedBackend, Step};
    use super::*;

    const JSON: &str = r#"{"name":"osc","ui":[]}"#;

    #[test]
    fn success_returns_both_artifacts() {
        let backend =
            ScriptedBackend::new(vec![ScriptedBackend::succeeding("graph osc {}", JSON)]);
        let mut compiler = CmajorCompiler::new(backend);
        let out = compiler.compile("osc", "process = os.osc(440);", "").unwrap();
        assert_eq!(out.cmajor, "graph osc {}");
        assert_eq!(out.json, JSON);
        assert!(compiler.error_message().is_empty());
    }

    #[test]
    fn passes_name_content_and_assembled_args() {
        let backend = ScriptedBackend::new(vec![ScriptedBackend::succeeding("", JSON)]);
        let mut compiler = CmajorCompiler::new(backend);
        compiler.compile("osc", "process = _;", "-double").unwrap();
        let (name, content, args) = &compiler.backend().calls[0];
        assert_eq!(name, "osc");
        assert_eq!(content, "process = _;");
        assert_eq!(args, "-lang cmajor-hybrid -json -double -cn osc -o osc.cmajor");
    }

    #[test]
    fn include_dirs_reach_the_command_line() {
        let backend = ScriptedBackend::new(vec![ScriptedBackend::succeeding("", JSON)]);
        let mut compiler =
            CmajorCompiler::new(backend).with_include_dirs(vec![PathBuf::from("libraries")]);
        compiler.compile("osc", "", "").unwrap();
        assert_eq!(
            compiler.backend().calls[0].2,
            "-lang cmajor-hybrid -json -I libraries -cn osc -o osc.cmajor"
        );
    }

    #[test]
    fn empty_name_is_rejected_without_invoking() {
        let mut compiler = CmajorCompiler::new(ScriptedBackend::default());
        let err = compiler.compile("", "process = _;", "").unwrap_err();
        assert_eq!(err.message, "empty DSP name");
        assert!(compiler.backend().calls.is_empty());
    }

    #[test]
    fn fault_prefers_reported_error() {
        let backend = ScriptedBackend::new(vec![Step::Fault {
            raised: "RuntimeError: unreachable".to_string(),
            reported: "osc : 1 : ERROR : syntax error".to_string(),
        }]);
        let mut compiler = CmajorCompiler::new(backend);
        let err = compiler.compile("osc", "process = ;", "").unwrap_err();
        assert_eq!(err.message, "osc : 1 : ERROR : syntax error");
        assert_eq!(compiler.error_message(), "osc : 1 : ERROR : syntax error");
    }

    #[test]
    fn fault_falls_back_to_raised_message() {
        let backend = ScriptedBackend::new(vec![Step::Fault {
            raised: "RuntimeError: unreachable".to_string(),
            reported: String::new(),
        }]);
        let mut compiler = CmajorCompiler::new(backend);
        let err = compiler.compile("osc", "process = ;", "").unwrap_err();
        assert_eq!(err.message, "RuntimeError: unreachable");
    }

    #[test]
    fn fault_triggers_cleanup_and_next_call_succeeds() {
        let backend = ScriptedBackend::new(vec![
            Step::Fault {
                raised: "boom".to_string(),
                reported: String::new(),
            },
            ScriptedBackend::succeeding("graph ok {}", JSON),
        ]);
        let mut compiler = CmajorCompiler::new(backend);
        assert!(compiler.compile("bad", "process = ;", "").is_err());
        assert_eq!(compiler.backend().cleanups, 1);

        let out = compiler.compile("ok", "process = _;", "").unwrap();
        assert_eq!(out.cmajor, "graph ok {}");
        assert!(compiler.error_message().is_empty());
    }

    #[test]
    fn refusal_uses_backend_error_without_cleanup() {
        let backend = ScriptedBackend::new(vec![Step::Refuse("bad input".to_string())]);
        let mut compiler = CmajorCompiler::new(backend);
        let err = compiler.compile("osc", "", "").unwrap_err();
        assert_eq!(err.message, "bad input");
        assert_eq!(compiler.backend().cleanups, 0);
    }

    #[test]
    fn refusal_without_message_is_generic() {
        let backend = ScriptedBackend::new(vec![Step::Refuse(String::new())]);
        let mut compiler = CmajorCompiler::new(backend);
        let err = compiler.compile("osc", "", "").unwrap_err();
        assert_eq!(err.message, "compilation failed");
    }

    #[test]
    fn version_comes_from_backend() {
        let compiler = CmajorCompiler::new(ScriptedBackend::default());
        assert_eq!(compiler.version(), "2.70.3");
    }
}
