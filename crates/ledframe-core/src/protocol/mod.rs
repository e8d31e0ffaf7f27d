//! Wire protocol for pixel datagrams.
//!
//! A datagram is a concatenation of 7-byte records: a tag byte followed by
//! six payload bytes. Tag `0x00` flushes the framebuffer, tag `0x01` sets one
//! pixel (`x, y, r, g, b, w`), and any other tag is skipped so newer senders
//! can talk to older receivers. A datagram whose length is not a multiple of
//! the record size is rejected as a whole.
//!
//! Offsets and tags live in `layout`, safe byte access in `reader`, and the
//! command decoding in `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::ProtocolError;
pub use parser::{Command, encode_commands, parse_datagram, parse_record};
