//! Stamp patterns that can be inserted around a clicked cell.

/// Glider relative to its center cell, as `(row, column)` offsets.
const GLIDER: [(i32, i32); 5] = [(-1, 0), (0, 1), (1, -1), (1, 0), (1, 1)];

/// Row offsets of the pulsar's horizontal bars.
const PULSAR_BAR_ROWS: [i32; 4] = [-6, -1, 1, 6];
/// Column distances of each horizontal bar from the center column.
const PULSAR_BAR_SPAN: [i32; 3] = [2, 3, 4];
/// Column distances of the pulsar's vertical bars from the center column.
const PULSAR_POST_COLUMNS: [i32; 2] = [1, 6];

/// Predefined patterns for insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Five-cell spaceship travelling down and to the right.
    Glider,
    /// Period-3 oscillator occupying a 13x13 box.
    Pulsar,
}

impl Pattern {
    /// Half-width of the square cleared before the pattern is stamped.
    pub fn clear_radius(self) -> i32 {
        match self {
            Pattern::Glider => 1,
            Pattern::Pulsar => 7,
        }
    }

    /// Live cells as `(row, column)` offsets from the pattern center.
    pub fn offsets(self) -> Vec<(i32, i32)> {
        match self {
            Pattern::Glider => GLIDER.to_vec(),
            Pattern::Pulsar => {
                let mut cells = Vec::with_capacity(48);
                for row in PULSAR_BAR_ROWS {
                    for span in PULSAR_BAR_SPAN {
                        cells.push((row, -span));
                        cells.push((row, span));
                    }
                }
                // The vertical bars are the horizontal bars transposed.
                for row in PULSAR_BAR_SPAN.iter().flat_map(|&s| [-s, s]) {
                    for column in PULSAR_POST_COLUMNS {
                        cells.push((row, -column));
                        cells.push((row, column));
                    }
                }
                cells
            }
        }
    }
}
