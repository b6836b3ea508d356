//! UI descriptor mapper — Faust JSON UI tree → Cmajor input-event declarations.

pub mod declaration;
pub mod descriptor;

pub use declaration::{
    declaration_for, declarations, map_descriptor_to_declarations, map_descriptor_with,
    sanitize_label,
};
pub use descriptor::{ContinuousKind, DiscreteKind, GroupKind, UiDescriptor, UiNode, UiNumber};
