use super::cell::{Cell, Direction};

/// Column-major grid of maze cells, addressed by `(column, row)`.
pub struct Grid {
    data: Box<[Cell]>,
    num_cols: usize,
    num_rows: usize,
}

impl Grid {
    /// Number of cells a `num_cols` x `num_rows` grid holds, or `None` when
    /// that many cells cannot be addressed in memory.
    pub fn cell_count(num_cols: usize, num_rows: usize) -> Option<usize> {
        let fits = |n: usize| {
            n.checked_mul(size_of::<Cell>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        };
        num_cols.checked_mul(num_rows).filter(|&n| fits(n))
    }

    /// Allocate a grid where every cell has all four walls up.
    ///
    /// Panics if the grid is too large to address; see [`Grid::cell_count`].
    pub fn new(num_cols: usize, num_rows: usize) -> Self {
        let Some(len) = Self::cell_count(num_cols, num_rows) else {
            panic!("grid of {}x{} cells is too large", num_cols, num_rows);
        };
        let data = vec![Cell::new(); len].into_boxed_slice();
        Grid {
            data,
            num_cols,
            num_rows,
        }
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// True when the grid holds no cells at all (either dimension is 0).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_in_bounds(&self, coord: (usize, usize)) -> bool {
        coord.0 < self.num_cols && coord.1 < self.num_rows
    }

    fn ravel_index(&self, col: usize, row: usize) -> usize {
        col * self.num_rows + row
    }

    pub fn get(&self, coord: (usize, usize)) -> Option<&Cell> {
        self.is_in_bounds(coord)
            .then(|| &self.data[self.ravel_index(coord.0, coord.1)])
    }

    /// All cells of column `col`, top to bottom.
    ///
    /// # Panics
    /// If `col` is out of bounds.
    pub fn column(&self, col: usize) -> &[Cell] {
        assert!(col < self.num_cols, "column {} is out of bounds", col);
        let start = col * self.num_rows;
        &self.data[start..start + self.num_rows]
    }

    /// Columns left to right. Yields `num_cols` slices even when `num_rows` is 0.
    pub fn columns(&self) -> impl Iterator<Item = &[Cell]> {
        (0..self.num_cols).map(move |col| self.column(col))
    }

    /// Every coordinate in column-major order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let num_rows = self.num_rows;
        (0..self.num_cols).flat_map(move |col| (0..num_rows).map(move |row| (col, row)))
    }

    /// Grid-adjacent neighbors of `coord` in north, south, west, east order,
    /// ignoring walls.
    pub fn neighbors(
        &self,
        coord: (usize, usize),
    ) -> impl Iterator<Item = (Direction, (usize, usize))> + '_ {
        let in_bounds = self.is_in_bounds(coord);
        Direction::ALL
            .into_iter()
            .filter(move |_| in_bounds)
            .filter_map(move |dir| dir.step(coord).map(|next| (dir, next)))
            .filter(move |&(_, next)| self.is_in_bounds(next))
    }

    /// Neighbors of `coord` reachable through an open wall.
    pub fn open_neighbors(
        &self,
        coord: (usize, usize),
    ) -> impl Iterator<Item = (Direction, (usize, usize))> + '_ {
        self.neighbors(coord)
            .filter(move |&(dir, _)| !self[coord].has_wall(dir))
    }

    /// Remove the wall between `from` and its neighbor in direction `dir`,
    /// on both sides at once. Returns the neighbor coordinate.
    ///
    /// # Panics
    /// If `from` or the neighbor is out of bounds.
    pub fn carve(&mut self, from: (usize, usize), dir: Direction) -> (usize, usize) {
        let to = dir
            .step(from)
            .filter(|&to| self.is_in_bounds(from) && self.is_in_bounds(to))
            .unwrap_or_else(|| panic!("cannot carve {:?} from {:?}", dir, from));
        self[from].remove_wall(dir);
        self[to].remove_wall(dir.opposite());
        to
    }

    /// Clear the visited mark on every cell.
    pub fn reset_visited(&mut self) {
        self.data.iter_mut().for_each(|cell| cell.set_visited(false));
    }

    /// Number of internal openings, counting each shared wall once.
    /// Boundary openings (entrance, exit) are not counted.
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::South, Direction::East]
                    .into_iter()
                    .filter(|&dir| {
                        dir.step(coord).is_some_and(|next| self.is_in_bounds(next))
                            && !self[coord].has_wall(dir)
                    })
                    .count()
            })
            .sum()
    }
}

impl std::ops::Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let idx = self.ravel_index(index.0, index.1);
        &mut self.data[idx]
    }
}
