//! Cmajor input-event declarations generated from UI leaves.

use super::descriptor::{UiDescriptor, UiNode};
use crate::error::ParseError;

/// Characters that cannot appear in a Cmajor endpoint identifier.
const LABEL_SPECIALS: [char; 7] = [' ', '(', ')', '\\', '/', '.', '-'];

/// Replace every character in ` ()\/.-` with `_`, one for one, in a single pass.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if LABEL_SPECIALS.contains(&c) { '_' } else { c })
        .collect()
}

/// Declaration for one node, or `None` for containers and unsupported leaves.
pub fn declaration_for(node: &UiNode) -> Option<String> {
    match node {
        UiNode::Continuous {
            label,
            min,
            max,
            init,
            step,
            ..
        } => Some(format!(
            "input event float32 {} [[ name: \"{label}\", min: {min}, max: {max}, init: {init}, step: {step} ]];",
            sanitize_label(label)
        )),
        UiNode::Discrete { label, .. } => Some(format!(
            "input event float32 {} [[ name: \"{label}\", text: \"off|on\", boolean ]];",
            sanitize_label(label)
        )),
        UiNode::Container { .. } | UiNode::Other { .. } => None,
    }
}

/// Declarations for every supported leaf, in document order.
pub fn declarations(descriptor: &UiDescriptor) -> Vec<String> {
    descriptor
        .leaves()
        .into_iter()
        .filter_map(declaration_for)
        .collect()
}

/// Parse a JSON descriptor and generate its declarations.
pub fn map_descriptor_to_declarations(json: &str) -> Result<Vec<String>, ParseError> {
    map_descriptor_with(json, |_| {})
}

/// Like [`map_descriptor_to_declarations`], calling `hook` with each line as it
/// is generated.
pub fn map_descriptor_with(
    json: &str,
    mut hook: impl FnMut(&str),
) -> Result<Vec<String>, ParseError> {
    let descriptor = UiDescriptor::parse(json)?;
    let lines = declarations(&descriptor);
    for line in &lines {
        hook(line);
    }
    Ok(lines)
}
