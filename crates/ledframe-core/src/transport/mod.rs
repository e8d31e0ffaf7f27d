//! LED transport seam.
//!
//! The framebuffer never talks to hardware directly: a flush hands the whole
//! buffer, in chain order, to an [`LedTransport`]. Initialization is the
//! implementation's constructor; a transport that cannot be brought up
//! returns [`HardwareError::Init`] and the process must not start serving.

mod writer;

pub use writer::{ChannelOrder, WriterTransport};

use thiserror::Error;

use crate::color::Rgb;

/// Failures of the LED output path. All of them are fatal to the server.
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("LED transport init failed ({context}): {source}")]
    Init {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("LED transport render failed: {0}")]
    Render(#[from] std::io::Error),
    #[error("frame length mismatch: expected {expected} LEDs, got {actual}")]
    FrameLength { expected: usize, actual: usize },
}

pub trait LedTransport {
    /// Push one complete frame to the chain.
    fn render(&mut self, leds: &[Rgb]) -> Result<(), HardwareError>;
}

impl<T: LedTransport + ?Sized> LedTransport for &mut T {
    fn render(&mut self, leds: &[Rgb]) -> Result<(), HardwareError> {
        (**self).render(leds)
    }
}

impl<T: LedTransport + ?Sized> LedTransport for Box<T> {
    fn render(&mut self, leds: &[Rgb]) -> Result<(), HardwareError> {
        (**self).render(leds)
    }
}

/// Drops every frame. Used for dry runs without LEDs attached.
#[derive(Debug, Default)]
pub struct NullTransport {
    frames: u64,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl LedTransport for NullTransport {
    fn render(&mut self, leds: &[Rgb]) -> Result<(), HardwareError> {
        self.frames += 1;
        let lit = leds.iter().filter(|led| !led.is_off()).count();
        tracing::trace!(frame = self.frames, leds = leds.len(), lit, "frame discarded");
        Ok(())
    }
}

/// Keeps a copy of every rendered frame.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    frames: Vec<Vec<Rgb>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every render fails, as if the chain went away.
    pub fn failing() -> Self {
        Self {
            frames: Vec::new(),
            fail: true,
        }
    }

    pub fn frames(&self) -> &[Vec<Rgb>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[Rgb]> {
        self.frames.last().map(|frame| frame.as_slice())
    }
}

impl LedTransport for RecordingTransport {
    fn render(&mut self, leds: &[Rgb]) -> Result<(), HardwareError> {
        if self.fail {
            return Err(HardwareError::Render(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "LED chain unavailable",
            )));
        }
        self.frames.push(leds.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HardwareError, LedTransport, NullTransport, RecordingTransport};
    use crate::color::Rgb;

    #[test]
    fn recording_keeps_frames_in_order() {
        let mut transport = RecordingTransport::new();
        transport.render(&[Rgb::new(1, 2, 3)]).unwrap();
        transport.render(&[Rgb::OFF]).unwrap();
        assert_eq!(transport.frames().len(), 2);
        assert_eq!(transport.last_frame(), Some(&[Rgb::OFF][..]));
    }

    #[test]
    fn failing_transport_reports_render_error() {
        let mut transport = RecordingTransport::failing();
        let err = transport.render(&[Rgb::OFF]).unwrap_err();
        assert!(matches!(err, HardwareError::Render(_)));
        assert!(transport.frames().is_empty());
    }

    #[test]
    fn null_transport_counts_frames() {
        let mut transport = NullTransport::new();
        transport.render(&[Rgb::OFF; 4]).unwrap();
        transport.render(&[Rgb::OFF; 4]).unwrap();
        assert_eq!(transport.frames(), 2);
    }

    #[test]
    fn boxed_transport_forwards() {
        let mut transport: Box<dyn LedTransport> = Box::new(NullTransport::new());
        transport.render(&[Rgb::OFF]).unwrap();
    }
}
