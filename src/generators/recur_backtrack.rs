use rand::Rng;

use crate::{
    generators::Progress,
    maze::{
        canvas::{Animator, Canvas},
        grid::Grid,
    },
};

/// Carve a perfect maze out of `grid` with a randomized depth-first walk from `start`.
///
/// The walk always extends the most recently reached cell; a cell with no
/// unvisited neighbor is popped without any drawing. Each carve draws both
/// cells and pumps the animator, and a dead canvas ends the walk right there,
/// leaving the grid partially carved.
///
/// On `Progress::Complete` every cell is visited and the open walls form a
/// spanning tree of the grid. Cells are left marked as visited.
pub fn recursive_backtrack<R, C>(
    grid: &mut Grid,
    start: (usize, usize),
    rng: &mut R,
    animator: &mut Animator<'_, C>,
) -> Progress
where
    R: Rng,
    C: Canvas + ?Sized,
{
    if !grid.is_in_bounds(start) {
        return Progress::Complete;
    }

    tracing::debug!(
        "[generate] carving {}x{} grid from {:?}",
        grid.num_cols(),
        grid.num_rows(),
        start
    );

    grid[start].set_visited(true);
    // The stack will keep the current branch of the walk, deepest cell last
    let mut stack = vec![start];
    let mut carved = 0usize;

    while let Some(&cell) = stack.last() {
        if !animator.is_live() {
            tracing::warn!("[generate] canvas closed after {} carves", carved);
            return Progress::Aborted;
        }

        let neighbors = grid
            .neighbors(cell)
            .filter(|&(_, c)| !grid[c].is_visited())
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            stack.pop();
            continue;
        }

        let (direction, neighbor) = neighbors[rng.random_range(0..neighbors.len())];
        grid.carve(cell, direction);
        carved += 1;

        animator.draw_cell(grid, cell);
        animator.draw_cell(grid, neighbor);
        if !animator.pump() {
            tracing::warn!("[generate] canvas closed after {} carves", carved);
            return Progress::Aborted;
        }

        grid[neighbor].set_visited(true);
        stack.push(neighbor);
    }

    tracing::debug!("[generate] done, {} passages carved", carved);
    Progress::Complete
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, time::Duration};

    use super::*;
    use crate::{
        generators::get_rng,
        maze::{
            canvas::{Headless, Layout, ScriptedCanvas},
            cell::Direction,
        },
    };

    const LAYOUT: Layout = Layout {
        origin_x: 0,
        origin_y: 0,
        cell_width: 4,
        cell_height: 2,
    };

    fn carve(num_cols: usize, num_rows: usize, seed: u64) -> (Grid, Progress) {
        let mut grid = Grid::new(num_cols, num_rows);
        let mut canvas = Headless;
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let progress = recursive_backtrack(&mut grid, (0, 0), &mut get_rng(Some(seed)), &mut animator);
        (grid, progress)
    }

    fn reachable_from_origin(grid: &Grid) -> usize {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::from([(0, 0)]);
        seen[0] = true;
        let mut count = 0;
        while let Some(coord) = queue.pop_front() {
            count += 1;
            for (_, next) in grid.open_neighbors(coord) {
                let idx = next.0 * grid.num_rows() + next.1;
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        count
    }

    #[test]
    fn test_recursive_backtrack_spans_grid() {
        let (grid, progress) = carve(12, 10, 0);
        assert_eq!(progress, Progress::Complete);
        assert!(grid.columns().flatten().all(|cell| cell.is_visited()));
        assert_eq!(grid.passage_count(), 12 * 10 - 1);
        assert_eq!(reachable_from_origin(&grid), 12 * 10);
    }

    #[test]
    fn test_walls_stay_symmetric() {
        let (grid, _) = carve(9, 7, 42);
        for coord in grid.coords() {
            for (dir, next) in grid.neighbors(coord) {
                assert_eq!(
                    grid[coord].has_wall(dir),
                    grid[next].has_wall(dir.opposite()),
                    "wall mismatch between {:?} and {:?}",
                    coord,
                    next
                );
            }
        }
    }

    #[test]
    fn test_boundary_walls_untouched() {
        let (grid, _) = carve(6, 5, 7);
        for col in 0..6 {
            assert!(grid[(col, 0)].has_top_wall());
            assert!(grid[(col, 4)].has_bottom_wall());
        }
        for row in 0..5 {
            assert!(grid[(0, row)].has_left_wall());
            assert!(grid[(5, row)].has_right_wall());
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let (a, _) = carve(15, 5, 1234);
        let (b, _) = carve(15, 5, 1234);
        assert!(a.columns().flatten().eq(b.columns().flatten()));
    }

    #[test]
    fn test_empty_grid_is_a_noop() {
        let (grid, progress) = carve(0, 0, 0);
        assert_eq!(progress, Progress::Complete);
        assert!(grid.is_empty());
        let (grid, progress) = carve(4, 0, 0);
        assert_eq!(progress, Progress::Complete);
        assert_eq!(grid.columns().count(), 4);
    }

    #[test]
    fn test_each_carve_draws_two_cells_and_pumps_once() {
        let mut grid = Grid::new(5, 4);
        let mut canvas = ScriptedCanvas::default();
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::from_millis(3));
        let progress = recursive_backtrack(&mut grid, (0, 0), &mut get_rng(Some(9)), &mut animator);
        assert_eq!(progress, Progress::Complete);
        assert_eq!(canvas.pumps, 5 * 4 - 1);
        assert_eq!(canvas.cells_drawn, 2 * (5 * 4 - 1));
        assert!(canvas.moves.is_empty());
        assert!(canvas.pacings.iter().all(|&p| p == Duration::from_millis(3)));
    }

    #[test]
    fn test_abort_leaves_partial_maze() {
        let mut grid = Grid::new(10, 10);
        let mut canvas = ScriptedCanvas::dying_after(5);
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let progress = recursive_backtrack(&mut grid, (0, 0), &mut get_rng(Some(3)), &mut animator);
        assert_eq!(progress, Progress::Aborted);
        // The sixth carve happened before the canvas reported itself dead
        assert_eq!(grid.passage_count(), 6);
        // Start plus the five cells pushed before the abort
        let visited = grid.columns().flatten().filter(|c| c.is_visited()).count();
        assert_eq!(visited, 6);
        assert!(grid[(0, 0)].has_wall(Direction::North));
    }
}
