use thiserror::Error;

use crate::color::Rgb;
use crate::geometry::PanelGeometry;
use crate::mapping::SerpentineMapper;
use crate::transport::{HardwareError, LedTransport};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramebufferError {
    #[error("pixel ({x}, {y}) outside {width}x{height} matrix")]
    OutOfBounds {
        x: u8,
        y: u8,
        width: u16,
        height: u16,
    },
}

/// Pixel store addressed by physical chain position.
///
/// Writes go through the mapper, so the buffer is always in the order the
/// LED chain expects and a flush can hand it over as-is.
///
/// # Examples
/// ```
/// use ledframe_core::{Framebuffer, PanelGeometry, RecordingTransport, Rgb};
///
/// let mut fb = Framebuffer::new(PanelGeometry::DEFAULT);
/// fb.set_pixel(0, 0, Rgb::new(255, 0, 0))?;
///
/// let mut transport = RecordingTransport::new();
/// fb.render(&mut transport)?;
/// assert_eq!(transport.last_frame().unwrap()[248], Rgb::new(255, 0, 0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Framebuffer {
    mapper: SerpentineMapper,
    leds: Vec<Rgb>,
}

impl Framebuffer {
    /// Allocates a buffer with every LED off.
    pub fn new(geometry: PanelGeometry) -> Self {
        Self {
            mapper: SerpentineMapper::new(geometry),
            leds: vec![Rgb::OFF; geometry.led_count()],
        }
    }

    pub fn geometry(&self) -> &PanelGeometry {
        self.mapper.geometry()
    }

    pub fn mapper(&self) -> &SerpentineMapper {
        &self.mapper
    }

    pub fn set_pixel(&mut self, x: u8, y: u8, color: Rgb) -> Result<(), FramebufferError> {
        let geometry = self.mapper.geometry();
        if !geometry.contains(x, y) {
            return Err(FramebufferError::OutOfBounds {
                x,
                y,
                width: geometry.matrix_width(),
                height: geometry.matrix_height(),
            });
        }
        let index = self.mapper.map(x, y);
        self.leds[index] = color;
        Ok(())
    }

    /// Color at a logical coordinate, if it lies inside the matrix.
    pub fn pixel(&self, x: u8, y: u8) -> Option<Rgb> {
        if !self.mapper.geometry().contains(x, y) {
            return None;
        }
        self.leds.get(self.mapper.map(x, y)).copied()
    }

    /// The whole buffer in chain order.
    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    /// Pushes every LED to the transport. The buffer is left untouched.
    pub fn render<T: LedTransport + ?Sized>(&self, transport: &mut T) -> Result<(), HardwareError> {
        transport.render(&self.leds)
    }
}
