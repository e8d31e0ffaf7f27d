use serde::Serialize;
use thiserror::Error;

/// Largest matrix dimension addressable by the `u8` wire coordinates.
pub const MAX_DIMENSION: u16 = 256;

/// Errors returned when a panel geometry cannot be mapped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("geometry dimension `{name}` must be non-zero")]
    ZeroDimension { name: &'static str },
    #[error("matrix width {matrix_width} must equal panel width {panel_width}")]
    WidthMismatch { matrix_width: u16, panel_width: u16 },
    #[error("matrix height {matrix_height} is not a multiple of panel height {panel_height}")]
    HeightNotMultiple { matrix_height: u16, panel_height: u16 },
    #[error("geometry dimension `{name}` = {value} exceeds 256")]
    TooLarge { name: &'static str, value: u16 },
}

/// Physical layout of the LED matrix.
///
/// Panels span the full matrix width and are stacked top to bottom in bands
/// of `panel_height` rows.
///
/// # Examples
/// ```
/// use ledframe_core::PanelGeometry;
///
/// let geometry = PanelGeometry::new(32, 24, 32, 8)?;
/// assert_eq!(geometry.led_count(), 768);
/// assert!(geometry.contains(31, 23));
/// # Ok::<(), ledframe_core::GeometryError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelGeometry {
    matrix_width: u16,
    matrix_height: u16,
    panel_width: u16,
    panel_height: u16,
}

impl PanelGeometry {
    /// Three 32x8 panels stacked into a 32x24 matrix.
    pub const DEFAULT: PanelGeometry = PanelGeometry {
        matrix_width: 32,
        matrix_height: 24,
        panel_width: 32,
        panel_height: 8,
    };

    pub fn new(
        matrix_width: u16,
        matrix_height: u16,
        panel_width: u16,
        panel_height: u16,
    ) -> Result<Self, GeometryError> {
        for (name, value) in [
            ("matrix_width", matrix_width),
            ("matrix_height", matrix_height),
            ("panel_width", panel_width),
            ("panel_height", panel_height),
        ] {
            if value == 0 {
                return Err(GeometryError::ZeroDimension { name });
            }
            if value > MAX_DIMENSION {
                return Err(GeometryError::TooLarge { name, value });
            }
        }
        if matrix_width != panel_width {
            return Err(GeometryError::WidthMismatch {
                matrix_width,
                panel_width,
            });
        }
        if matrix_height % panel_height != 0 {
            return Err(GeometryError::HeightNotMultiple {
                matrix_height,
                panel_height,
            });
        }
        Ok(Self {
            matrix_width,
            matrix_height,
            panel_width,
            panel_height,
        })
    }

    pub fn matrix_width(&self) -> u16 {
        self.matrix_width
    }

    pub fn matrix_height(&self) -> u16 {
        self.matrix_height
    }

    pub fn panel_width(&self) -> u16 {
        self.panel_width
    }

    pub fn panel_height(&self) -> u16 {
        self.panel_height
    }

    /// Number of LEDs in one physical panel.
    pub fn panel_area(&self) -> usize {
        self.panel_width as usize * self.panel_height as usize
    }

    /// Total number of LEDs on the chain.
    pub fn led_count(&self) -> usize {
        self.matrix_width as usize * self.matrix_height as usize
    }

    /// Returns true when `(x, y)` is a logical coordinate inside the matrix.
    pub fn contains(&self, x: u8, y: u8) -> bool {
        u16::from(x) < self.matrix_width && u16::from(y) < self.matrix_height
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}
