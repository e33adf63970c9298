use std::collections::VecDeque;

use crate::grid::{Cell, Direction, Grid};

/// Segments a fresh snake starts with.
pub const INITIAL_LENGTH: usize = 3;

/// The snake: segment positions (head first), heading, and a buffered turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: VecDeque<Cell>,
    /// Tail cell dropped by the last `advance`, restored by `grow`.
    vacated: Option<Cell>,
    heading: Direction,
    next_heading: Direction,
    grid: Grid,
}

impl Snake {
    pub fn new(grid: Grid, initial_length: usize) -> Self {
        let mut snake = Self {
            segments: VecDeque::with_capacity(initial_length),
            vacated: None,
            heading: Direction::Right,
            next_heading: Direction::Right,
            grid,
        };
        snake.reset(initial_length);
        snake
    }

    /// Lay out `initial_length` segments leftwards from the grid center, heading right.
    pub fn reset(&mut self, initial_length: usize) {
        let head = self.grid.center();
        self.segments.clear();
        for i in 0..initial_length.max(1) {
            self.segments.push_back(Cell::new(head.x - i as i32 * self.grid.tile, head.y));
        }
        self.vacated = None;
        self.heading = Direction::Right;
        self.next_heading = Direction::Right;
    }

    /// Move one tile along the buffered heading; every body segment takes its predecessor's place.
    pub fn advance(&mut self) {
        self.heading = self.next_heading;
        let new_head = self.head().stepped(self.heading, self.grid.tile);
        self.segments.push_front(new_head);
        self.vacated = self.segments.pop_back();
    }

    /// Lengthen by one segment, reclaiming the cell the tail just left.
    pub fn grow(&mut self) {
        let tail = match self.vacated.take() {
            Some(cell) => cell,
            // Not moved since reset: stack the new tail on the old one.
            None => self.tail(),
        };
        self.segments.push_back(tail);
    }

    /// Buffer a turn for the next `advance`. Reversals of the heading in effect are rejected.
    pub fn set_heading(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.heading) {
            return false;
        }
        self.next_heading = direction;
        true
    }

    pub fn check_self_collision(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(1).any(|segment| *segment == head)
    }

    pub fn check_wall_collision(&self) -> bool {
        !self.grid.contains(self.head())
    }

    pub fn head(&self) -> Cell {
        // reset() always leaves at least one segment and nothing removes the head.
        self.segments[0]
    }

    pub fn tail(&self) -> Cell {
        self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &VecDeque<Cell> {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Heading used by the most recent `advance`.
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Heading the next `advance` will use.
    pub fn next_heading(&self) -> Direction {
        self.next_heading
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }
}
