//! faust-cmaj — a source transformer that compiles Faust `.dsp` files into Cmajor.

pub mod compiler;
pub mod config;
pub mod error;
pub mod transform;
pub mod transport;
pub mod ui;

pub use compiler::{CmajorCompiler, CompileOutput, FaustBackend, FaustProcess};
pub use config::BridgeConfig;
pub use error::{BridgeError, CompileError, ParseError};
pub use transform::SourceTransformer;
