/// Side length of one tile, in distance units.
pub const TILE_SIZE: i32 = 25;
/// Cells per side of the square board.
pub const GRID_SIZE: i32 = 20;
/// Cells per side of the bonus item footprint.
pub const BONUS_SPAN: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Unit step (dx, dy) in cells; y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A grid-aligned coordinate, expressed in distance units (multiples of the tile size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// One tile further along `direction`.
    pub fn stepped(self, direction: Direction, tile: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * tile,
            y: self.y + dy * tile,
        }
    }
}

/// Board geometry: `size` x `size` cells of `tile` units each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub size: i32,
    pub tile: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_SIZE, TILE_SIZE)
    }
}

impl Grid {
    pub fn new(size: i32, tile: i32) -> Self {
        Self { size, tile }
    }

    /// Board side length in distance units.
    pub fn extent(&self) -> i32 {
        self.size * self.tile
    }

    pub fn cell_count(&self) -> usize {
        (self.size * self.size) as usize
    }

    /// Cell at column/row indices.
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(col * self.tile, row * self.tile)
    }

    pub fn center(&self) -> Cell {
        self.cell_at(self.size / 2, self.size / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let extent = self.extent();
        cell.x >= 0 && cell.x < extent && cell.y >= 0 && cell.y < extent
    }

    /// All cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| self.cell_at(col, row)))
    }

    /// The cells covered by a `span` x `span` block anchored at its top-left cell.
    pub fn footprint(&self, anchor: Cell, span: i32) -> impl Iterator<Item = Cell> + '_ {
        (0..span).flat_map(move |dy| {
            (0..span).map(move |dx| Cell::new(anchor.x + dx * self.tile, anchor.y + dy * self.tile))
        })
    }

    /// Bounding-box containment of `point` inside the block anchored at `anchor`.
    pub fn footprint_contains(&self, anchor: Cell, span: i32, point: Cell) -> bool {
        let side = span * self.tile;
        point.x >= anchor.x && point.x < anchor.x + side && point.y >= anchor.y && point.y < anchor.y + side
    }
}
