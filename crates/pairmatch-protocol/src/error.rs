//! Codec errors.

/// A frame could not be turned into bytes or back.
///
/// Game-rule rejections are not protocol errors; they travel as
/// [`AckError`](crate::AckError) payloads inside well-formed frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A server frame failed to serialize.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Malformed JSON, an unknown action name, missing fields, or a payload
    /// of the wrong shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
