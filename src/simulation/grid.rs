use crate::simulation::cell::GpuCell;

/// Host-memory grid buffer used by the CPU dispatcher.
///
/// Cells are stored row-major, `size * size` of them, in the same layout the
/// GPU buffer uses.
#[derive(Clone, Debug, PartialEq)]
pub struct CpuGrid {
    size: u32,
    cells: Vec<GpuCell>,
}

impl CpuGrid {
    /// Create an all-dead grid
    pub fn new(size: u32) -> Self {
        let cell_count = size as usize * size as usize;
        Self {
            size,
            cells: vec![GpuCell::DEAD; cell_count],
        }
    }

    /// Create a grid with the listed cells alive at full age
    pub fn with_live_cells(size: u32, live: &[(u32, u32)]) -> Self {
        let mut grid = Self::new(size);
        for &(x, y) in live {
            grid.set(x, y, GpuCell::NEWBORN);
        }
        grid
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cells(&self) -> &[GpuCell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [GpuCell] {
        &mut self.cells
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size as usize + x as usize
    }

    /// Cell at (x, y); out-of-range coordinates read as dead
    pub fn get(&self, x: u32, y: u32) -> GpuCell {
        if x < self.size && y < self.size {
            self.cells[self.index(x, y)]
        } else {
            GpuCell::DEAD
        }
    }

    /// Overwrite the cell at (x, y); out-of-range coordinates are ignored
    pub fn set(&mut self, x: u32, y: u32, cell: GpuCell) {
        if x < self.size && y < self.size {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    /// Sample with signed coordinates, wrapping toroidally or reading dead past the edge
    pub fn sample(&self, x: i64, y: i64, wrap: bool) -> GpuCell {
        let size = self.size as i64;
        if wrap {
            self.get(x.rem_euclid(size) as u32, y.rem_euclid(size) as u32)
        } else if x < 0 || y < 0 || x >= size || y >= size {
            GpuCell::DEAD
        } else {
            self.get(x as u32, y as u32)
        }
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Coordinates of all live cells, row by row
    pub fn live_cells(&self) -> Vec<(u32, u32)> {
        let size = self.size;
        (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y).is_alive())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = CpuGrid::new(100);
        assert_eq!(grid.cells().len(), 10000);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_live_cells() {
        let grid = CpuGrid::with_live_cells(8, &[(1, 2), (7, 7), (9, 9)]);
        assert_eq!(grid.population(), 2);
        assert_eq!(grid.live_cells(), vec![(1, 2), (7, 7)]);
        assert_eq!(grid.get(1, 2).age, 1.0);
    }

    #[test]
    fn test_sample_wraps_or_reads_dead() {
        let grid = CpuGrid::with_live_cells(4, &[(3, 3)]);
        assert!(grid.sample(-1, -1, true).is_alive());
        assert!(!grid.sample(-1, -1, false).is_alive());
        assert!(grid.sample(3, 3, false).is_alive());
        assert!(grid.sample(7, 7, true).is_alive());
    }
}
