//! JSON encoding for event payloads.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Cannot encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed payload: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn encode<T: Serialize>(event: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(event).map_err(CodecError::Encode)
}

pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(payload).map_err(CodecError::Decode)
}
