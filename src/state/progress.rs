//! Survey progress over a fixed-size grid of cells

use crate::core::{GridCell, DEFAULT_CELL_SIZE_M};
use log::info;
use parking_lot::Mutex;
use std::collections::BTreeSet;

/// Cell containing `(x, y)` on a lattice with `cell_size_m` edges
pub fn cell_of(x: f64, y: f64, cell_size_m: f64) -> GridCell {
    GridCell::containing(x, y, cell_size_m)
}

/// Set of cells sampled so far. Grows monotonically; cells are never removed.
#[derive(Debug)]
pub struct GridProgressTracker {
    cell_size_m: f64,
    visited: Mutex<BTreeSet<GridCell>>,
}

impl Default for GridProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE_M)
    }
}

impl GridProgressTracker {
    pub fn new(cell_size_m: f64) -> Self {
        Self {
            cell_size_m,
            visited: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn cell_size_m(&self) -> f64 {
        self.cell_size_m
    }

    pub fn cell_of(&self, x: f64, y: f64) -> GridCell {
        cell_of(x, y, self.cell_size_m)
    }

    /// Idempotent insert. Returns `true` if the cell was not visited before.
    pub fn mark_visited(&self, cell: GridCell) -> bool {
        let inserted = self.visited.lock().insert(cell);
        if inserted {
            info!("Cell ({}, {}) visited", cell.row, cell.col);
        }
        inserted
    }

    pub fn is_visited(&self, cell: GridCell) -> bool {
        self.visited.lock().contains(&cell)
    }

    /// Visited cells in (row, col) order
    pub fn snapshot(&self) -> Vec<GridCell> {
        self.visited.lock().iter().copied().collect()
    }

    /// Replace the set wholesale; used once at startup
    pub fn load(&self, initial: Vec<GridCell>) {
        let cells: BTreeSet<GridCell> = initial.into_iter().collect();
        info!("Loaded {} visited cells", cells.len());
        *self.visited.lock() = cells;
    }

    pub fn len(&self) -> usize {
        self.visited.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_cell_of_is_pure_and_floors() {
        assert_eq!(cell_of(-0.5, 0.0, 1.0), GridCell::new(0, -1));
        assert_eq!(cell_of(-0.5, -0.5, 1.0), GridCell::new(-1, -1));
        assert_eq!(cell_of(3.7, 2.2, 1.0), cell_of(3.7, 2.2, 1.0));
        assert_eq!(cell_of(0.0, 0.0, 1.0), GridCell::new(0, 0));
    }

    #[test]
    fn test_adjacent_points_map_to_adjacent_cells() {
        for &size in &[0.5, 1.0, 2.0] {
            for &(x, y) in &[(0.25, 0.25), (-3.1, 7.6), (12.2, -4.4)] {
                let here = cell_of(x, y, size);
                let east = cell_of(x + size, y, size);
                let north = cell_of(x, y + size, size);
                assert_eq!(east.col - here.col, 1);
                assert_eq!(east.row, here.row);
                assert_eq!(north.row - here.row, 1);
                assert_eq!(north.col, here.col);
            }
        }
    }

    #[test]
    fn test_mark_visited_is_idempotent() {
        let tracker = GridProgressTracker::default();
        let cell = tracker.cell_of(2.5, 3.5);

        assert!(tracker.mark_visited(cell));
        assert!(!tracker.mark_visited(cell));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.is_visited(GridCell::new(3, 2)));
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let tracker = GridProgressTracker::new(1.0);
        tracker.mark_visited(GridCell::new(9, 9));
        tracker.load(vec![GridCell::new(0, 1), GridCell::new(-2, 3), GridCell::new(0, 1)]);

        assert_eq!(tracker.snapshot(), vec![GridCell::new(-2, 3), GridCell::new(0, 1)]);
        assert!(!tracker.is_visited(GridCell::new(9, 9)));
    }

    #[test]
    fn test_concurrent_marks_are_visible() {
        let tracker = Arc::new(GridProgressTracker::new(1.0));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    for j in 0..25 {
                        tracker.mark_visited(GridCell::new(j % 5, i % 4));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(tracker.len(), 20);
    }
}
