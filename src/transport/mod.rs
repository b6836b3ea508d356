//! Host transport — the message protocol between the editor/runtime and the transformer.

pub mod message;
pub mod session;

pub use message::{Inbound, Outbound, TransformRequest, TransformResponse};
pub use session::Session;
