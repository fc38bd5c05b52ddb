/// One of the four sides of a cell, which is also the direction of the
/// neighbor sharing that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row - 1, the top wall.
    North,
    /// Towards row + 1, the bottom wall.
    South,
    /// Towards column - 1, the left wall.
    West,
    /// Towards column + 1, the right wall.
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The side of the neighbor that faces back at us.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Step from `(col, row)` in this direction.
    /// Returns `None` when the step would underflow; the upper bound is the grid's concern.
    pub fn step(self, (col, row): (usize, usize)) -> Option<(usize, usize)> {
        match self {
            Direction::North => row.checked_sub(1).map(|r| (col, r)),
            Direction::South => row.checked_add(1).map(|r| (col, r)),
            Direction::West => col.checked_sub(1).map(|c| (c, row)),
            Direction::East => col.checked_add(1).map(|c| (c, row)),
        }
    }
}

/// Background of a cell when rendered.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFill {
    #[default]
    Empty,
    /// The cell whose top wall opens to the outside.
    Entrance,
    /// The cell whose bottom wall opens to the outside.
    Exit,
}

/// A single maze cell: four wall flags plus the traversal mark.
///
/// The cell does not know its own position, that is implied by where it sits
/// in the [`Grid`](super::grid::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
    visited: bool,
    fill: CellFill,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new()
    }
}

impl Cell {
    /// A fresh cell with all four walls standing and no visit mark.
    pub const fn new() -> Self {
        Cell {
            top: true,
            bottom: true,
            left: true,
            right: true,
            visited: false,
            fill: CellFill::Empty,
        }
    }

    pub fn has_wall(&self, side: Direction) -> bool {
        match side {
            Direction::North => self.top,
            Direction::South => self.bottom,
            Direction::West => self.left,
            Direction::East => self.right,
        }
    }

    /// Knock down one side of this cell only.
    /// Carving between two cells must go through the grid so both sides stay consistent.
    pub fn remove_wall(&mut self, side: Direction) {
        match side {
            Direction::North => self.top = false,
            Direction::South => self.bottom = false,
            Direction::West => self.left = false,
            Direction::East => self.right = false,
        }
    }

    pub fn has_top_wall(&self) -> bool {
        self.top
    }

    pub fn has_bottom_wall(&self) -> bool {
        self.bottom
    }

    pub fn has_left_wall(&self) -> bool {
        self.left
    }

    pub fn has_right_wall(&self) -> bool {
        self.right
    }

    /// Number of sides still standing.
    pub fn wall_count(&self) -> usize {
        Direction::ALL.iter().filter(|&&d| self.has_wall(d)).count()
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    pub fn fill(&self) -> CellFill {
        self.fill
    }

    pub fn set_fill(&mut self, fill: CellFill) {
        self.fill = fill;
    }
}
