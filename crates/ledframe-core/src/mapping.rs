//! Logical-to-physical coordinate mapping.
//!
//! Every panel is wired column by column, alternating direction on each
//! column, and panels are chained end to end down the matrix. The second
//! band (rows `panel_height..2 * panel_height`) is mounted in the opposite
//! orientation to the others, so its chain runs the other way. That band is
//! a property of the installation and is not generalized to later bands.

use serde::Serialize;

use crate::geometry::PanelGeometry;

/// Index of the band whose cabling runs in the reversed direction.
const REVERSED_BAND: usize = 1;

/// Maps logical `(x, y)` coordinates to positions on the LED chain.
///
/// # Examples
/// ```
/// use ledframe_core::{PanelGeometry, SerpentineMapper};
///
/// let mapper = SerpentineMapper::new(PanelGeometry::DEFAULT);
/// assert_eq!(mapper.map(0, 0), 248);
/// assert_eq!(mapper.map(31, 23), 512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerpentineMapper {
    geometry: PanelGeometry,
}

impl SerpentineMapper {
    pub fn new(geometry: PanelGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// Physical chain index for a logical coordinate.
    ///
    /// The caller must check `(x, y)` against the geometry first; results
    /// for coordinates outside the matrix are meaningless and may panic on
    /// arithmetic overflow in debug builds.
    pub fn map(&self, x: u8, y: u8) -> usize {
        let panel_height = self.geometry.panel_height() as usize;
        let area = self.geometry.panel_area();
        let x = x as usize;
        let y = y as usize;
        let band = y / panel_height;
        let y_local = y % panel_height;

        if band == REVERSED_BAND {
            let column_start = area + x * panel_height;
            if x % 2 == 1 {
                column_start + (panel_height - 1) - y_local
            } else {
                column_start + y_local
            }
        } else {
            let column_end = area * band + (area - 1) - x * panel_height;
            if x % 2 == 0 {
                column_end - (panel_height - 1) + y_local
            } else {
                column_end - y_local
            }
        }
    }

    /// Inverse table: entry `i` holds the logical coordinate wired to chain
    /// position `i`.
    pub fn chain_order(&self) -> Vec<(u8, u8)> {
        let mut order = vec![(0u8, 0u8); self.geometry.led_count()];
        for y in 0..self.geometry.matrix_height() {
            for x in 0..self.geometry.matrix_width() {
                let (x, y) = (x as u8, y as u8);
                order[self.map(x, y)] = (x, y);
            }
        }
        order
    }

    /// Serializable view of the full wiring, as printed by `ledframe layout`.
    pub fn layout(&self) -> ChainLayout {
        ChainLayout {
            geometry: self.geometry,
            led_count: self.geometry.led_count(),
            chain: self
                .chain_order()
                .into_iter()
                .map(|(x, y)| [x, y])
                .collect(),
        }
    }
}

/// Geometry plus the logical coordinate at every chain position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainLayout {
    pub geometry: PanelGeometry,
    pub led_count: usize,
    pub chain: Vec<[u8; 2]>,
}
