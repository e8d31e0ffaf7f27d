//! Blocking receive loop.
//!
//! One datagram is decoded and applied before the next is read, so the
//! framebuffer and transport are owned by the loop and need no locking.

use serde::Serialize;
use thiserror::Error;

use crate::dispatch::{DatagramSummary, DispatchError, apply_datagram};
use crate::framebuffer::Framebuffer;
use crate::protocol::layout::MAX_DATAGRAM_LEN;
use crate::source::DatagramSource;
use crate::transport::{HardwareError, LedTransport};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),
}

/// Totals over the lifetime of a serve loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServeStats {
    pub datagrams: u64,
    pub rejected_datagrams: u64,
    pub receive_errors: u64,
    pub records: DatagramSummary,
}

/// Receive and apply datagrams until the source is exhausted or the
/// transport fails.
///
/// Malformed datagrams and failed receives are logged and dropped. A
/// transport failure ends the loop with [`ServeError::Hardware`]; the LEDs
/// no longer reflect the buffer and there is no way to resynchronize them
/// here.
pub fn serve<S, T>(
    source: &mut S,
    framebuffer: &mut Framebuffer,
    transport: &mut T,
) -> Result<ServeStats, ServeError>
where
    S: DatagramSource + ?Sized,
    T: LedTransport + ?Sized,
{
    let mut stats = ServeStats::default();
    let mut buf = vec![0u8; MAX_DATAGRAM_LEN];

    loop {
        let event = match source.next_datagram(&mut buf) {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("receive failed: {err}");
                stats.receive_errors += 1;
                continue;
            }
        };
        stats.datagrams += 1;
        match apply_datagram(framebuffer, transport, event.payload) {
            Ok(summary) => {
                tracing::trace!(peer = ?event.peer, ?summary, "datagram applied");
                stats.records += summary;
            }
            Err(DispatchError::Protocol(err)) => {
                tracing::warn!(peer = ?event.peer, "dropping datagram: {err}");
                stats.rejected_datagrams += 1;
            }
            Err(DispatchError::Hardware(err)) => {
                tracing::error!("LED render failed: {err}");
                return Err(err.into());
            }
        }
    }

    Ok(stats)
}
