//! Host message envelope — `{"type": ..., "message": {...}}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub filename: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub contents: String,
}

/// Messages received from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    TransformRequest { message: TransformRequest },
    /// Any other message type; ignored.
    #[serde(other)]
    Unknown,
}

/// Messages sent to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    Ready,
    TransformResponse { message: TransformResponse },
}

impl Outbound {
    pub fn transform_response(contents: impl Into<String>) -> Self {
        Outbound::TransformResponse {
            message: TransformResponse {
                contents: contents.into(),
            },
        }
    }
}
