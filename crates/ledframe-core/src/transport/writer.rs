use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use super::{HardwareError, LedTransport};
use crate::color::Rgb;

/// Byte order of one LED on the output stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    /// WS2811/WS2812 strips expect green first.
    #[default]
    Grb,
}

impl ChannelOrder {
    fn write(self, led: Rgb, out: &mut Vec<u8>) {
        match self {
            ChannelOrder::Rgb => out.extend_from_slice(&[led.r, led.g, led.b]),
            ChannelOrder::Grb => out.extend_from_slice(&[led.g, led.r, led.b]),
        }
    }
}

/// Streams raw frames (`led_count * 3` bytes each) into any writer: a
/// device node, a FIFO read by a strip driver, a file or stdout.
pub struct WriterTransport<W: Write> {
    writer: W,
    led_count: usize,
    order: ChannelOrder,
    scratch: Vec<u8>,
}

impl<W: Write> WriterTransport<W> {
    pub fn new(writer: W, led_count: usize, order: ChannelOrder) -> Self {
        Self {
            writer,
            led_count,
            order,
            scratch: Vec::with_capacity(led_count * 3),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterTransport<Box<dyn Write + Send>> {
    /// Opens `path` for frame output; `-` writes to stdout.
    pub fn open(path: &Path, led_count: usize, order: ChannelOrder) -> Result<Self, HardwareError> {
        let writer: Box<dyn Write + Send> = if path.as_os_str() == "-" {
            Box::new(io::stdout())
        } else {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .map_err(|source| HardwareError::Init {
                    context: path.display().to_string(),
                    source,
                })?;
            Box::new(file)
        };
        Ok(Self::new(writer, led_count, order))
    }
}

impl<W: Write> LedTransport for WriterTransport<W> {
    fn render(&mut self, leds: &[Rgb]) -> Result<(), HardwareError> {
        if leds.len() != self.led_count {
            return Err(HardwareError::FrameLength {
                expected: self.led_count,
                actual: leds.len(),
            });
        }
        self.scratch.clear();
        for &led in leds {
            self.order.write(led, &mut self.scratch);
        }
        self.writer.write_all(&self.scratch)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::{ChannelOrder, WriterTransport};
    use crate::color::Rgb;
    use crate::transport::{HardwareError, LedTransport};

    #[test]
    fn writes_grb_frames() {
        let mut transport = WriterTransport::new(Vec::new(), 2, ChannelOrder::Grb);
        transport
            .render(&[Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)])
            .unwrap();
        assert_eq!(transport.into_inner(), vec![2, 1, 3, 5, 4, 6]);
    }

    #[test]
    fn writes_rgb_frames_back_to_back() {
        let mut transport = WriterTransport::new(Vec::new(), 1, ChannelOrder::Rgb);
        transport.render(&[Rgb::new(1, 2, 3)]).unwrap();
        transport.render(&[Rgb::new(7, 8, 9)]).unwrap();
        assert_eq!(transport.into_inner(), vec![1, 2, 3, 7, 8, 9]);
    }

    #[test]
    fn rejects_wrong_frame_length() {
        let mut transport = WriterTransport::new(Vec::new(), 3, ChannelOrder::Rgb);
        let err = transport.render(&[Rgb::OFF]).unwrap_err();
        assert!(matches!(
            err,
            HardwareError::FrameLength {
                expected: 3,
                actual: 1
            }
        ));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_render_error() {
        let mut transport = WriterTransport::new(BrokenPipe, 1, ChannelOrder::Rgb);
        let err = transport.render(&[Rgb::OFF]).unwrap_err();
        assert!(matches!(err, HardwareError::Render(_)));
    }

    #[test]
    fn open_missing_directory_is_init_error() {
        let path = std::env::temp_dir()
            .join("ledframe-missing-dir")
            .join("nested")
            .join("frames.bin");
        let err = match WriterTransport::open(&path, 4, ChannelOrder::Grb) {
            Ok(_) => panic!("expected open to fail"),
            Err(err) => err,
        };
        assert!(matches!(err, HardwareError::Init { .. }));
    }
}
