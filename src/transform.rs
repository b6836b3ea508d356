//! Source transformer — routes `.dsp` files through the Faust compiler.

use tracing::{debug, error, info, warn};

use crate::compiler::{CmajorCompiler, FaustBackend};
use crate::ui;

const DSP_SUFFIX: &str = ".dsp";

/// Unit name for a Faust source file: `filename` minus its `.dsp` suffix.
///
/// The match is exact and case-sensitive; `Synth.DSP` is not a DSP file.
pub fn dsp_name(filename: &str) -> Option<&str> {
    filename.strip_suffix(DSP_SUFFIX)
}

/// Transforms host source files, compiling Faust programs to Cmajor.
pub struct SourceTransformer<B> {
    compiler: CmajorCompiler<B>,
    extra_args: String,
    log_declarations: bool,
}

impl<B: FaustBackend> SourceTransformer<B> {
    pub fn new(compiler: CmajorCompiler<B>) -> Self {
        Self {
            compiler,
            extra_args: String::new(),
            log_declarations: true,
        }
    }

    /// Extra compiler flags passed on every compile.
    pub fn with_extra_args(mut self, extra_args: impl Into<String>) -> Self {
        self.extra_args = extra_args.into();
        self
    }

    /// Whether generated declarations are logged after each compile.
    pub fn with_declaration_logging(mut self, enabled: bool) -> Self {
        self.log_declarations = enabled;
        self
    }

    pub fn compiler(&self) -> &CmajorCompiler<B> {
        &self.compiler
    }

    /// Transform one file. Never fails: anything that cannot be compiled is
    /// returned unchanged.
    pub fn transform(&mut self, filename: &str, contents: &str) -> String {
        let Some(name) = dsp_name(filename) else {
            return contents.to_string();
        };

        match self.compiler.compile(name, contents, &self.extra_args) {
            Ok(output) => {
                debug!(%filename, json = %output.json, "faust UI descriptor");
                self.report_declarations(filename, &output.json);
                output.cmajor
            }
            Err(e) => {
                error!(%filename, "{e}");
                contents.to_string()
            }
        }
    }

    fn report_declarations(&self, filename: &str, json: &str) {
        let log = self.log_declarations;
        let result = ui::map_descriptor_with(json, |line| {
            if log {
                info!(target: "faust_cmaj::declarations", "{line}");
            }
        });
        match result {
            Ok(lines) => debug!(%filename, count = lines.len(), "generated declarations"),
            Err(e) => warn!(%filename, "skipping declarations: {e}"),
        }
    }
}
