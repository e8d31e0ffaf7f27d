mod udp;

pub use udp::UdpSource;

use std::collections::VecDeque;
use std::net::SocketAddr;

use thiserror::Error;

/// One received datagram, borrowed from the caller's buffer.
#[derive(Debug)]
pub struct DatagramEvent<'a> {
    pub peer: Option<SocketAddr>,
    pub payload: &'a [u8],
}

pub trait DatagramSource {
    /// Blocks until the next datagram arrives. `Ok(None)` means the source
    /// is exhausted.
    fn next_datagram<'a>(
        &mut self,
        buf: &'a mut [u8],
    ) -> Result<Option<DatagramEvent<'a>>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Replays queued datagrams, then reports exhaustion.
#[derive(Debug, Default)]
pub struct MemorySource {
    queue: VecDeque<Vec<u8>>,
}

impl MemorySource {
    pub fn new<I>(datagrams: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            queue: datagrams.into_iter().collect(),
        }
    }
}

impl DatagramSource for MemorySource {
    fn next_datagram<'a>(
        &mut self,
        buf: &'a mut [u8],
    ) -> Result<Option<DatagramEvent<'a>>, SourceError> {
        let Some(datagram) = self.queue.pop_front() else {
            return Ok(None);
        };
        // mirror socket semantics: oversized datagrams are truncated
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok(Some(DatagramEvent {
            peer: None,
            payload: &buf[..len],
        }))
    }
}
