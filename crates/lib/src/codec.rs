//! Value encoding for stored records.
//!
//! The store itself only ever handles raw bytes. A [`Codec`] decides how a
//! caller's value becomes those bytes and how they are turned back into a
//! value on read.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error produced by a codec.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

/// Encodes values to bytes and decodes bytes back into values.
pub trait Codec: Send + Sync {
  /// Encode `value` into the bytes that will be stored on disk.
  fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

  /// Decode stored bytes into a value.
  fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Compact JSON, the default codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
  fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
  }

  fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
  }
}

/// Indented JSON, for stores meant to be read by humans.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJsonCodec;

impl Codec for PrettyJsonCodec {
  fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec_pretty(value)?)
  }

  fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
  }
}
