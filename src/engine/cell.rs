//! Cell state and coordinate records shared between the engine and renderers.

use bytemuck::{NoUninit, Pod, Zeroable};

/// State of a single cell. One byte per cell in the state buffer.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, NoUninit)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    pub fn toggled(self) -> Cell {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }
}

/// A `(row, column)` pair identifying one grid cell.
///
/// Laid out as two consecutive `u16` slots so a list of records can be
/// handed across the wasm boundary as a flat `u16` buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct CellCoordinates(pub u16, pub u16);

impl CellCoordinates {
    /// Number of `u16` slots each record occupies in a raw buffer.
    pub const SLOTS: usize = 2;

    #[inline]
    pub fn row(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn column(self) -> u16 {
        self.1
    }

    /// View a list of records as raw `u16` slots (`2 * records.len()` long).
    pub fn as_raw_pairs(records: &[CellCoordinates]) -> &[u16] {
        bytemuck::cast_slice(records)
    }

    /// Reinterpret raw `u16` slots as coordinate records.
    ///
    /// The slot count must be even; the record count is half the slot count.
    pub fn try_from_raw_pairs(slots: &[u16]) -> Result<&[CellCoordinates], EngineError> {
        bytemuck::try_cast_slice(slots).map_err(|_| EngineError::UnpairedSlots(slots.len()))
    }
}

impl From<(u16, u16)> for CellCoordinates {
    fn from((row, column): (u16, u16)) -> Self {
        CellCoordinates(row, column)
    }
}

/// Errors raised when interpreting raw engine buffers.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Changed-cell buffer holds {0} slots, expected an even number of (row, column) slots")]
    UnpairedSlots(usize),
    #[error("Cell ({row}, {column}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        row: u16,
        column: u16,
        width: u16,
        height: u16,
    },
}
