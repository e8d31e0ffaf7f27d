//! Applies decoded datagrams to the framebuffer.

use std::ops::AddAssign;

use serde::Serialize;
use thiserror::Error;

use crate::color::Rgb;
use crate::framebuffer::{Framebuffer, FramebufferError};
use crate::protocol::{Command, ProtocolError, parse_datagram};
use crate::transport::{HardwareError, LedTransport};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("hardware error: {0}")]
    Hardware(#[from] HardwareError),
}

/// Per-datagram record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatagramSummary {
    pub records: u64,
    pub pixels_written: u64,
    pub pixels_out_of_bounds: u64,
    pub unknown_records: u64,
    pub flushes: u64,
}

impl AddAssign for DatagramSummary {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.pixels_written += other.pixels_written;
        self.pixels_out_of_bounds += other.pixels_out_of_bounds;
        self.unknown_records += other.unknown_records;
        self.flushes += other.flushes;
    }
}

/// Decode `payload` and apply its records in order.
///
/// A datagram with a partial record is rejected before anything is applied.
/// Out-of-bounds pixels and unknown tags are skipped. A failed flush stops
/// the batch and is returned as [`DispatchError::Hardware`].
pub fn apply_datagram<T: LedTransport + ?Sized>(
    framebuffer: &mut Framebuffer,
    transport: &mut T,
    payload: &[u8],
) -> Result<DatagramSummary, DispatchError> {
    let mut summary = DatagramSummary::default();
    for record in parse_datagram(payload)? {
        summary.records += 1;
        match record {
            Some(Command::Flush) => {
                framebuffer.render(transport)?;
                summary.flushes += 1;
            }
            Some(Command::SetPixel { x, y, r, g, b, w: _ }) => {
                match framebuffer.set_pixel(x, y, Rgb::new(r, g, b)) {
                    Ok(()) => summary.pixels_written += 1,
                    Err(FramebufferError::OutOfBounds { .. }) => {
                        tracing::debug!(x, y, "dropping out-of-bounds pixel");
                        summary.pixels_out_of_bounds += 1;
                    }
                }
            }
            None => summary.unknown_records += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{DatagramSummary, DispatchError, apply_datagram};
    use crate::color::Rgb;
    use crate::framebuffer::Framebuffer;
    use crate::geometry::PanelGeometry;
    use crate::protocol::{Command, ProtocolError, encode_commands};
    use crate::transport::RecordingTransport;

    fn setup() -> (Framebuffer, RecordingTransport) {
        (
            Framebuffer::new(PanelGeometry::DEFAULT),
            RecordingTransport::new(),
        )
    }

    #[test]
    fn malformed_datagram_changes_nothing() {
        let (mut fb, mut transport) = setup();
        let payload = [0x01, 0, 0, 255, 255, 255, 0, 0x00];
        let err = apply_datagram(&mut fb, &mut transport, &payload).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Protocol(ProtocolError::MalformedPacket { len: 8 })
        ));
        assert!(fb.leds().iter().all(|led| led.is_off()));
        assert!(transport.frames().is_empty());
    }

    #[test]
    fn out_of_bounds_record_does_not_abort_batch() {
        let (mut fb, mut transport) = setup();
        let payload = [
            0x01, 32, 0, 9, 9, 9, 0, //
            0x01, 0, 0, 1, 2, 3, 0,
        ];
        let summary = apply_datagram(&mut fb, &mut transport, &payload).unwrap();
        assert_eq!(summary.pixels_written, 1);
        assert_eq!(summary.pixels_out_of_bounds, 1);
        assert_eq!(fb.pixel(0, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(fb.leds().iter().filter(|led| !led.is_off()).count(), 1);
    }

    #[test]
    fn row_out_of_bounds_is_dropped() {
        let (mut fb, mut transport) = setup();
        let payload = Command::set_pixel(0, 24, Rgb::new(1, 1, 1)).encode();
        let summary = apply_datagram(&mut fb, &mut transport, &payload).unwrap();
        assert_eq!(summary.pixels_out_of_bounds, 1);
        assert!(fb.leds().iter().all(|led| led.is_off()));
    }

    #[test]
    fn last_write_wins_before_flush() {
        let (mut fb, mut transport) = setup();
        let payload = encode_commands(&[
            Command::SetPixel {
                x: 0,
                y: 0,
                r: 255,
                g: 0,
                b: 0,
                w: 0,
            },
            Command::SetPixel {
                x: 0,
                y: 0,
                r: 0,
                g: 255,
                b: 0,
                w: 0,
            },
            Command::Flush,
        ]);
        apply_datagram(&mut fb, &mut transport, &payload).unwrap();
        assert_eq!(transport.frames().len(), 1);
        let frame = transport.last_frame().unwrap();
        assert_eq!(frame[fb.mapper().map(0, 0)], Rgb::new(0, 255, 0));
    }

    #[test]
    fn flush_without_writes_sends_dark_frame() {
        let (mut fb, mut transport) = setup();
        apply_datagram(&mut fb, &mut transport, &Command::Flush.encode()).unwrap();
        let frame = transport.last_frame().unwrap();
        assert_eq!(frame.len(), 768);
        assert!(frame.iter().all(|led| led.is_off()));
    }

    #[test]
    fn white_byte_is_not_stored() {
        let (mut fb, mut transport) = setup();
        let payload = [0x01, 2, 3, 10, 20, 30, 255];
        apply_datagram(&mut fb, &mut transport, &payload).unwrap();
        assert_eq!(fb.pixel(2, 3), Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn flush_sees_writes_from_earlier_datagrams() {
        let (mut fb, mut transport) = setup();
        let first = Command::set_pixel(5, 9, Rgb::new(4, 5, 6)).encode();
        apply_datagram(&mut fb, &mut transport, &first).unwrap();
        assert!(transport.frames().is_empty());
        apply_datagram(&mut fb, &mut transport, &Command::Flush.encode()).unwrap();
        let frame = transport.last_frame().unwrap();
        assert_eq!(frame[fb.mapper().map(5, 9)], Rgb::new(4, 5, 6));
    }

    #[test]
    fn flush_mid_batch_captures_prefix_only() {
        let (mut fb, mut transport) = setup();
        let payload = encode_commands(&[
            Command::set_pixel(1, 1, Rgb::new(1, 0, 0)),
            Command::Flush,
            Command::set_pixel(2, 2, Rgb::new(2, 0, 0)),
            Command::Flush,
        ]);
        let summary = apply_datagram(&mut fb, &mut transport, &payload).unwrap();
        assert_eq!(summary.flushes, 2);
        let first = &transport.frames()[0];
        assert!(first[fb.mapper().map(2, 2)].is_off());
        let second = &transport.frames()[1];
        assert_eq!(second[fb.mapper().map(2, 2)], Rgb::new(2, 0, 0));
    }

    #[test]
    fn unknown_tags_are_counted_and_ignored() {
        let (mut fb, mut transport) = setup();
        let payload = [0x02, 0, 0, 1, 1, 1, 1, 0xff, 0, 0, 0, 0, 0, 0];
        let summary = apply_datagram(&mut fb, &mut transport, &payload).unwrap();
        assert_eq!(
            summary,
            DatagramSummary {
                records: 2,
                unknown_records: 2,
                ..DatagramSummary::default()
            }
        );
        assert!(transport.frames().is_empty());
    }

    #[test]
    fn transport_failure_is_fatal_and_stops_batch() {
        let mut fb = Framebuffer::new(PanelGeometry::DEFAULT);
        let mut transport = RecordingTransport::failing();
        let payload = encode_commands(&[
            Command::Flush,
            Command::set_pixel(0, 0, Rgb::new(9, 9, 9)),
        ]);
        let err = apply_datagram(&mut fb, &mut transport, &payload).unwrap_err();
        assert!(matches!(err, DispatchError::Hardware(_)));
        assert_eq!(fb.pixel(0, 0), Some(Rgb::OFF));
    }

    #[test]
    fn empty_datagram_is_a_no_op() {
        let (mut fb, mut transport) = setup();
        let summary = apply_datagram(&mut fb, &mut transport, &[]).unwrap();
        assert_eq!(summary, DatagramSummary::default());
    }
}
