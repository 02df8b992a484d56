//! JSON chunk codec.
//!
//! Serialization of chunks is owned by the transport collaborator; this
//! module is the codec offered to transports that carry text frames. A
//! frame that fails to decode is reported and skipped, never fatal to the
//! stream, since subsequent chunks are independent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sluice_core::{Chunk, SluiceResult, TransportError};
use tracing::warn;

/// Encode one chunk as a JSON frame.
pub fn encode_chunk<P: Serialize>(chunk: &Chunk<P>) -> SluiceResult<String> {
    serde_json::to_string(chunk).map_err(|err| {
        TransportError::EncodeFailed {
            reason: err.to_string(),
        }
        .into()
    })
}

/// Decode one JSON frame into a chunk.
pub fn decode_chunk<P: DeserializeOwned>(frame: &str) -> SluiceResult<Chunk<P>> {
    serde_json::from_str(frame).map_err(|err| {
        TransportError::MalformedChunk {
            reason: err.to_string(),
        }
        .into()
    })
}

/// Decode an arrival batch of frames, skipping malformed frames with a
/// warning and preserving the order of the frames that do decode.
pub fn decode_frames<P: DeserializeOwned>(frames: &[String]) -> Vec<Chunk<P>> {
    let mut chunks = Vec::with_capacity(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        match decode_chunk(frame) {
            Ok(chunk) => chunks.push(chunk),
            Err(err) => {
                warn!(frame = index, error = %err, "skipping malformed chunk");
            }
        }
    }
    chunks
}
