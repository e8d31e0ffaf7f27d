use thiserror::Error;

use super::layout;

/// Errors returned by datagram decoding.
///
/// # Examples
/// ```
/// use ledframe_core::protocol::ProtocolError;
///
/// let err = ProtocolError::MalformedPacket { len: 8 };
/// assert!(err.to_string().contains("multiple of 7"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("packet size should be a multiple of {}: got {len} bytes", layout::RECORD_LEN)]
    MalformedPacket { len: usize },
}
