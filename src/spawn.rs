use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use crate::grid::{BONUS_SPAN, Cell, Grid};

/// Random draws tried before falling back to scanning the free cells.
const SAMPLE_ATTEMPTS: usize = 64;

/// Places items on free cells. Generic over the RNG so tests can seed it.
#[derive(Debug, Clone)]
pub struct Spawner<R> {
    rng: R,
    grid: Grid,
    /// A bonus spawns with probability 1 / `bonus_one_in`.
    bonus_one_in: u32,
}

impl<R: Rng> Spawner<R> {
    pub fn new(rng: R, grid: Grid, bonus_one_in: u32) -> Self {
        Self {
            rng,
            grid,
            bonus_one_in: bonus_one_in.max(1),
        }
    }

    /// A uniformly chosen cell not in `occupied`, or `None` when the board is full.
    pub fn spawn_regular(&mut self, occupied: &HashSet<Cell>) -> Option<Cell> {
        let cols = self.grid.size;
        self.sample(cols, |grid, cell| {
            grid.contains(cell) && !occupied.contains(&cell)
        })
    }

    /// Anchor of a new bonus item, or `None` if one is already live, the roll
    /// fails, or no 2x2 block is free.
    pub fn maybe_spawn_bonus(
        &mut self,
        occupied: &HashSet<Cell>,
        already_present: bool,
    ) -> Option<Cell> {
        if already_present || !self.rng.gen_ratio(1, self.bonus_one_in) {
            return None;
        }
        // Anchors stop one span short of the far edges so the footprint stays on the board.
        let cols = self.grid.size - BONUS_SPAN + 1;
        let anchor = self.sample(cols, |grid, anchor| {
            grid.footprint(anchor, BONUS_SPAN)
                .all(|cell| grid.contains(cell) && !occupied.contains(&cell))
        });
        if let Some(anchor) = anchor {
            tracing::debug!(x = anchor.x, y = anchor.y, "bonus item spawned");
        }
        anchor
    }

    /// Rejection-sample anchors in `[0, cols)` on both axes, then scan every
    /// candidate if sampling keeps missing.
    fn sample(&mut self, cols: i32, is_free: impl Fn(&Grid, Cell) -> bool) -> Option<Cell> {
        if cols <= 0 {
            return None;
        }
        let grid = self.grid;
        for _ in 0..SAMPLE_ATTEMPTS {
            let cell = grid.cell_at(self.rng.gen_range(0..cols), self.rng.gen_range(0..cols));
            if is_free(&grid, cell) {
                return Some(cell);
            }
        }
        tracing::debug!("spawn sampling exhausted, scanning free cells");
        (0..cols)
            .flat_map(|row| (0..cols).map(move |col| grid.cell_at(col, row)))
            .filter(|cell| is_free(&grid, *cell))
            .choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spawner(grid: Grid, bonus_one_in: u32) -> Spawner<StdRng> {
        Spawner::new(StdRng::seed_from_u64(7), grid, bonus_one_in)
    }

    #[test]
    fn test_regular_avoids_occupied() {
        let grid = Grid::default();
        let mut spawner = spawner(grid, 5);
        let occupied: HashSet<Cell> = grid.cells().take(350).collect();

        for _ in 0..200 {
            let cell = spawner.spawn_regular(&occupied).unwrap();
            assert!(grid.contains(cell));
            assert_eq!(cell.x % grid.tile, 0);
            assert_eq!(cell.y % grid.tile, 0);
            assert!(!occupied.contains(&cell));
        }
    }

    #[test]
    fn test_regular_finds_last_free_cell() {
        let grid = Grid::new(6, 25);
        let mut spawner = spawner(grid, 5);
        let last = grid.cell_at(3, 4);
        let occupied: HashSet<Cell> = grid.cells().filter(|c| *c != last).collect();

        assert_eq!(spawner.spawn_regular(&occupied), Some(last));
    }

    #[test]
    fn test_regular_on_full_board() {
        let grid = Grid::new(3, 25);
        let mut spawner = spawner(grid, 5);
        let occupied: HashSet<Cell> = grid.cells().collect();

        assert_eq!(spawner.spawn_regular(&occupied), None);
    }

    #[test]
    fn test_bonus_not_spawned_when_present() {
        let mut spawner = spawner(Grid::default(), 1);
        assert_eq!(spawner.maybe_spawn_bonus(&HashSet::new(), true), None);
    }

    #[test]
    fn test_bonus_footprint_is_free_and_on_board() {
        let grid = Grid::default();
        let mut spawner = spawner(grid, 1);
        let occupied: HashSet<Cell> = grid.cells().filter(|c| c.x < 250 || c.y == 100).collect();

        for _ in 0..100 {
            let anchor = spawner.maybe_spawn_bonus(&occupied, false).unwrap();
            for cell in grid.footprint(anchor, BONUS_SPAN) {
                assert!(grid.contains(cell));
                assert!(!occupied.contains(&cell));
            }
        }
    }

    #[test]
    fn test_bonus_rate_is_roughly_one_in_five() {
        let mut spawner = spawner(Grid::default(), 5);
        let empty = HashSet::new();
        let hits = (0..5000)
            .filter(|_| spawner.maybe_spawn_bonus(&empty, false).is_some())
            .count();
        assert!((800..1200).contains(&hits), "hits = {hits}");
    }
}
