use std::fmt::{Display, Formatter};

use crate::errors::{Error, SensorError};
use crate::io::Resolution;

/// A square matrix of `f64` values, stored row-major.
///
/// Grids are built from the flat buffers a ranging driver hands out: the first `side²` values are
/// laid out row by row, then the row order is flipped so that row 0 matches the top of the
/// physical field of view.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    side: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Builds a grid with one cell per zone of `resolution` from a flat driver buffer
    /// (reshape + row flip).
    ///
    /// Values beyond the zone count are ignored.
    ///
    /// # Errors
    /// * `BufferTooShort`: the buffer holds fewer values than `resolution` has zones.
    pub fn from_flat<T>(
        name: &'static str,
        buffer: &[T],
        resolution: Resolution,
    ) -> Result<Self, Error>
    where
        T: Copy + Into<f64>,
    {
        let side = resolution.side();
        let zones = resolution.zones();
        if buffer.len() < zones {
            return Err(SensorError::BufferTooShort {
                name,
                expected: zones,
                received: buffer.len(),
            }
            .into());
        }

        let cells = buffer[..zones]
            .chunks_exact(side)
            .rev()
            .flat_map(|row| row.iter().map(|&value| value.into()))
            .collect();

        Ok(Self { side, cells })
    }

    /// Returns a copy of the grid with its row order reversed.
    ///
    /// Flipping a grid built by [`Self::from_flat`] gives back the driver's original ordering.
    pub fn flip_rows(&self) -> Self {
        let cells = self
            .cells
            .chunks_exact(self.side)
            .rev()
            .flatten()
            .copied()
            .collect();
        Self {
            side: self.side,
            cells,
        }
    }

    /// Number of cells per row (and per column).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns the value at (`row`, `col`), if inside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match row < self.side && col < self.side {
            true => Some(self.cells[row * self.side + col]),
            false => None,
        }
    }

    /// Returns the `index`-th row, if inside the grid.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows().nth(index)
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.side)
    }

    /// All cells, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|value| format!("{:>6}", value)).collect();
            writeln!(f, "[{}]", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<u16> {
        (0..len as u16).collect()
    }

    #[test]
    fn test_from_flat_flips_rows() {
        let grid = Grid::from_flat("test", &ramp(16), Resolution::X4).unwrap();
        assert_eq!(grid.side(), 4);
        assert_eq!(grid.row(0).unwrap(), &[12.0, 13.0, 14.0, 15.0]);
        assert_eq!(grid.row(3).unwrap(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(grid.get(0, 1), Some(13.0));
        assert_eq!(grid.get(3, 3), Some(3.0));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 4), None);
    }

    #[test]
    fn test_from_flat_ignores_trailing_values() {
        let grid = Grid::from_flat("test", &ramp(100), Resolution::X8).unwrap();
        assert_eq!(grid.as_slice().len(), 64);
        assert_eq!(grid.row(0).unwrap()[0], 56.0);
        assert_eq!(grid.row(7).unwrap()[7], 7.0);
    }

    #[test]
    fn test_from_flat_too_short() {
        let result = Grid::from_flat("distance_mm", &ramp(15), Resolution::X4);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Sensor error: Buffer 'distance_mm' too short - expected 16 values, 15 received."
        );
    }

    #[test]
    fn test_from_flat_empty_buffer() {
        let buffer: Vec<u8> = vec![];
        for resolution in [Resolution::X4, Resolution::X8] {
            let result = Grid::from_flat("reflectance", &buffer, resolution);
            assert!(result.is_err(), "An empty buffer is an error, never a panic");
        }
    }

    #[test]
    fn test_flip_rows_restores_driver_order() {
        for resolution in [Resolution::X4, Resolution::X8] {
            let buffer = ramp(resolution.zones());
            let grid = Grid::from_flat("test", &buffer, resolution).unwrap();
            let expected: Vec<f64> = buffer.iter().map(|&v| v as f64).collect();
            assert_eq!(grid.flip_rows().as_slice(), expected.as_slice());
            assert_eq!(grid.flip_rows().flip_rows(), grid);
        }
    }

    #[test]
    fn test_from_flat_signed_values() {
        let buffer: Vec<i16> = (0..16).map(|v| if v % 2 == 0 { -v } else { v }).collect();
        let grid = Grid::from_flat("test", &buffer, Resolution::X4).unwrap();
        assert_eq!(grid.row(0).unwrap(), &[-12.0, 13.0, -14.0, 15.0]);
        assert_eq!(grid.row(3).unwrap(), &[0.0, 1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_grid_display() {
        let grid = Grid::from_flat("test", &ramp(16), Resolution::X4).unwrap();
        assert_eq!(
            format!("{}", grid),
            "[    12     13     14     15]\n\
             [     8      9     10     11]\n\
             [     4      5      6      7]\n\
             [     0      1      2      3]\n"
        );
    }
}
