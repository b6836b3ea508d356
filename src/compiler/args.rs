//! Command-line assembly for the Faust compiler.

use std::path::PathBuf;

/// Flags every compile starts with: Cmajor hybrid output plus the JSON sidecar.
pub const BASE_ARGS: &str = "-lang cmajor-hybrid -json";

/// Build the argument string for compiling unit `name`.
///
/// Include directories are appended to the base flags as `-I <dir>`. A
/// non-empty `extra_args` is followed by exactly one space; an empty one adds
/// nothing, so the mandatory `-cn` flag always sits one space after the
/// preceding token.
pub fn compile_args(name: &str, extra_args: &str, include_dirs: &[PathBuf]) -> String {
    let mut base = String::from(BASE_ARGS);
    for dir in include_dirs {
        base.push_str(" -I ");
        base.push_str(&dir.to_string_lossy());
    }
    let aux = if extra_args.is_empty() {
        String::new()
    } else {
        format!("{extra_args} ")
    };
    format!("{base} {aux}-cn {name} -o {}", cmajor_artifact(name))
}

/// Translated-source artifact written for unit `name`.
pub fn cmajor_artifact(name: &str) -> String {
    format!("{name}.cmajor")
}

/// JSON UI descriptor artifact written for unit `name`.
pub fn json_artifact(name: &str) -> String {
    format!("{name}.json")
}
