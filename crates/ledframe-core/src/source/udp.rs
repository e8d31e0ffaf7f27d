use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use super::{DatagramEvent, DatagramSource, SourceError};

/// Datagrams from a bound UDP socket. Never exhausts.
pub struct UdpSource {
    socket: UdpSocket,
}

impl UdpSource {
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self, SourceError> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Self { socket })
    }

    pub fn from_socket(socket: UdpSocket) -> Self {
        Self { socket }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SourceError> {
        Ok(self.socket.local_addr()?)
    }
}

impl DatagramSource for UdpSource {
    fn next_datagram<'a>(
        &mut self,
        buf: &'a mut [u8],
    ) -> Result<Option<DatagramEvent<'a>>, SourceError> {
        let (len, peer) = self.socket.recv_from(buf)?;
        Ok(Some(DatagramEvent {
            peer: Some(peer),
            payload: &buf[..len],
        }))
    }
}
