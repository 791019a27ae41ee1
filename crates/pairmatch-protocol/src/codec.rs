//! Codec trait and implementations for serializing/deserializing frames.
//!
//! The server doesn't care HOW frames are serialized; it only needs
//! something that implements [`Codec`]. Browser clients speak JSON, so
//! [`JsonCodec`] is the one we ship.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use pairmatch_protocol::{ClientAction, ClientEnvelope, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let envelope = ClientEnvelope { ack: Some(1), action: ClientAction::FetchGames };
///
/// let bytes = codec.encode(&envelope).unwrap();
/// let decoded: ClientEnvelope = codec.decode(&bytes).unwrap();
/// assert_eq!(envelope, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientAction, ClientEnvelope, GameId, PlayRequest};

    #[test]
    fn test_json_codec_decodes_client_frame() {
        let codec = JsonCodec;
        let bytes = br#"{"ack":3,"action":{"event":"play","data":{"gameId":1,"index":0}}}"#;

        let env: ClientEnvelope = codec.decode(bytes).expect("decode");

        assert_eq!(env.ack, Some(3));
        assert_eq!(
            env.action,
            ClientAction::Play(PlayRequest {
                game_id: GameId(1),
                index: 0
            })
        );
    }

    #[test]
    fn test_json_codec_output_is_valid_utf8() {
        // The server sends JSON as text frames.
        let codec = JsonCodec;
        let bytes = codec
            .encode(&ClientAction::ChatMessage("olá".into()))
            .expect("encode");
        assert!(std::str::from_utf8(&bytes).is_ok());
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_decode_error() {
        let codec = JsonCodec;
        let result: Result<ClientEnvelope, _> = codec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_missing_action_returns_error() {
        let codec = JsonCodec;
        let result: Result<ClientEnvelope, _> = codec.decode(br#"{"ack":1}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
