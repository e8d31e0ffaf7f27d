pub const RECORD_LEN: usize = 7;

pub const TAG_OFFSET: usize = 0;
pub const X_OFFSET: usize = 1;
pub const Y_OFFSET: usize = 2;
pub const RED_OFFSET: usize = 3;
pub const GREEN_OFFSET: usize = 4;
pub const BLUE_OFFSET: usize = 5;
pub const WHITE_OFFSET: usize = 6;

pub const TAG_FLUSH: u8 = 0x00;
pub const TAG_SET_PIXEL: u8 = 0x01;

pub const DEFAULT_PORT: u16 = 5005;
/// Receive buffer size; larger datagrams are truncated by the socket.
pub const MAX_DATAGRAM_LEN: usize = 8192;
