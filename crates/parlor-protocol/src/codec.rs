//! Codec trait and implementations.
//!
//! A codec converts between protocol types and raw bytes. The rest of
//! the stack only sees the [`Codec`] trait, so the encoding can change
//! (JSON today, a binary format later) without touching any other code.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes protocol values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because the codec is shared across the
/// per-connection tasks for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// truncated, or don't match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable, which makes lobby traffic trivial to inspect while
/// debugging. Behind the `json` feature flag (enabled by default).
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
    use crate::{ClientMessage, GameMode, PlayerColor};

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let msg = ClientMessage::CreateRoom {
            name: "duel pit".into(),
            mode: GameMode::Arena,
            visible: false,
            color: PlayerColor::Red,
        };
        let bytes = codec.encode(&msg).unwrap();
        let decoded: ClientMessage = codec.decode(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_json_codec_decode_error() {
        let codec = JsonCodec;
        let result: Result<ClientMessage, _> = codec.decode(b"{broken");
        assert!(result.is_err());
    }
}
