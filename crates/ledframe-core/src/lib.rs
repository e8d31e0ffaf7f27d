//! ledframe core library: a network-addressable framebuffer for a serpentine
//! LED panel matrix.
//!
//! Datagrams of 7-byte records arrive from a [`DatagramSource`], the
//! `protocol` layer decodes them (layout/reader/parser), and
//! [`apply_datagram`] writes pixels into a [`Framebuffer`] through the
//! [`SerpentineMapper`]. A flush record hands the whole buffer, already in
//! chain order, to an [`LedTransport`]. Decoding and mapping are pure; all
//! I/O is isolated in the `source` and `transport` modules.
//!
//! Invariants:
//! - A datagram whose length is not a multiple of 7 is dropped whole.
//! - Coordinates are bounds-checked before they reach the mapper.
//! - Every flush pushes all `led_count` LEDs; the buffer is never cleared.
//! - Transport failures are fatal to [`serve`].
//!
//! # Examples
//! ```
//! use ledframe_core::protocol::{Command, encode_commands};
//! use ledframe_core::{Framebuffer, PanelGeometry, RecordingTransport, Rgb, apply_datagram};
//!
//! let mut fb = Framebuffer::new(PanelGeometry::DEFAULT);
//! let mut transport = RecordingTransport::new();
//! let datagram = encode_commands(&[
//!     Command::set_pixel(0, 0, Rgb::new(255, 0, 0)),
//!     Command::Flush,
//! ]);
//!
//! let summary = apply_datagram(&mut fb, &mut transport, &datagram)?;
//! assert_eq!(summary.flushes, 1);
//! assert_eq!(transport.last_frame().unwrap()[248], Rgb::new(255, 0, 0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod color;
mod dispatch;
mod framebuffer;
mod geometry;
mod mapping;
pub mod protocol;
mod server;
mod source;
mod transport;

pub use color::Rgb;
pub use dispatch::{DatagramSummary, DispatchError, apply_datagram};
pub use framebuffer::{Framebuffer, FramebufferError};
pub use geometry::{GeometryError, MAX_DIMENSION, PanelGeometry};
pub use mapping::{ChainLayout, SerpentineMapper};
pub use server::{ServeError, ServeStats, serve};
pub use source::{DatagramEvent, DatagramSource, MemorySource, SourceError, UdpSource};
pub use transport::{
    ChannelOrder, HardwareError, LedTransport, NullTransport, RecordingTransport, WriterTransport,
};
