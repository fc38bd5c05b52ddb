use rand::Rng;

use crate::{
    maze::{
        canvas::{Animator, Canvas},
        grid::Grid,
    },
    solvers::SolveOutcome,
};

/// Depth-first search from `start` to `goal` through open walls.
///
/// Expects every visited flag to be cleared. Among the unvisited cells
/// reachable from the top of the stack one is picked at random, which only
/// changes the order the maze is explored in. Forward steps are drawn as moves,
/// dead ends are drawn as undo moves back to the new top of the stack.
pub fn solve_dfs<R, C>(
    grid: &mut Grid,
    start: (usize, usize),
    goal: (usize, usize),
    rng: &mut R,
    animator: &mut Animator<'_, C>,
) -> SolveOutcome
where
    R: Rng,
    C: Canvas + ?Sized,
{
    if !grid.is_in_bounds(start) || !grid.is_in_bounds(goal) {
        return SolveOutcome::Exhausted;
    }

    tracing::debug!("[solve] searching from {:?} to {:?}", start, goal);

    grid[start].set_visited(true);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        if !animator.is_live() {
            return aborted(stack.len());
        }

        if current == goal {
            tracing::debug!("[solve] goal reached, path length {}", stack.len());
            return SolveOutcome::Reached(stack);
        }

        if !animator.pump() {
            return aborted(stack.len());
        }

        let reachable = grid
            .open_neighbors(current)
            .map(|(_, c)| c)
            .filter(|&c| !grid[c].is_visited())
            .collect::<Vec<_>>();

        if !reachable.is_empty() {
            let next = reachable[rng.random_range(0..reachable.len())];
            grid[next].set_visited(true);
            animator.draw_move(current, next, false);
            if !animator.pump() {
                return aborted(stack.len());
            }
            stack.push(next);
        } else {
            // Dead end, step back
            stack.pop();
            if let Some(&previous) = stack.last() {
                animator.draw_move(current, previous, true);
                if !animator.pump() {
                    return aborted(stack.len());
                }
            }
        }
    }

    tracing::warn!("[solve] explored everything reachable from {:?}, goal not found", start);
    SolveOutcome::Exhausted
}

fn aborted(depth: usize) -> SolveOutcome {
    tracing::warn!("[solve] canvas closed at depth {}", depth);
    SolveOutcome::Aborted
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        generators::{get_rng, recursive_backtrack},
        maze::canvas::{Headless, Layout, ScriptedCanvas},
        maze::cell::Direction,
    };

    const LAYOUT: Layout = Layout {
        origin_x: 0,
        origin_y: 0,
        cell_width: 4,
        cell_height: 2,
    };

    fn carved(num_cols: usize, num_rows: usize, seed: u64) -> Grid {
        let mut grid = Grid::new(num_cols, num_rows);
        let mut canvas = Headless;
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        recursive_backtrack(&mut grid, (0, 0), &mut get_rng(Some(seed)), &mut animator);
        grid.reset_visited();
        grid
    }

    fn assert_valid_path(grid: &Grid, path: &[(usize, usize)], start: (usize, usize), goal: (usize, usize)) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert!(
                grid.open_neighbors(pair[0]).any(|(_, c)| c == pair[1]),
                "no passage between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_solve_dfs_reaches_goal() {
        let mut grid = carved(12, 10, 0);
        let mut canvas = Headless;
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let outcome = solve_dfs(&mut grid, (0, 0), (11, 9), &mut get_rng(Some(0)), &mut animator);
        let path = outcome.path().expect("maze should be solvable");
        assert_valid_path(&grid, path, (0, 0), (11, 9));
        let visited = grid.columns().flatten().filter(|c| c.is_visited()).count();
        assert!(visited <= 12 * 10);
        assert!(visited >= path.len());
    }

    #[test]
    fn test_path_is_the_unique_one() {
        // The maze is a tree, so every search order lands on the same path
        let grid = carved(8, 8, 5);
        let mut paths = (0..5).map(|seed| {
            let mut grid = carved(8, 8, 5);
            let mut canvas = Headless;
            let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
            solve_dfs(&mut grid, (0, 0), (7, 7), &mut get_rng(Some(seed)), &mut animator)
        });
        let first = paths.next().expect("at least one run");
        assert!(first.is_reached());
        assert!(paths.all(|p| p == first));
        assert_valid_path(&grid, first.path().unwrap_or_default(), (0, 0), (7, 7));
    }

    #[test]
    fn test_start_is_goal() {
        let mut grid = carved(1, 1, 0);
        let mut canvas = ScriptedCanvas::default();
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let outcome = solve_dfs(&mut grid, (0, 0), (0, 0), &mut get_rng(Some(0)), &mut animator);
        assert_eq!(outcome, SolveOutcome::Reached(vec![(0, 0)]));
        assert_eq!(canvas.pumps, 0);
    }

    #[test]
    fn test_walled_off_goal_is_exhausted() {
        let mut grid = Grid::new(3, 1);
        grid.carve((0, 0), Direction::East);
        let mut canvas = ScriptedCanvas::default();
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let outcome = solve_dfs(&mut grid, (0, 0), (2, 0), &mut get_rng(Some(0)), &mut animator);
        assert_eq!(outcome, SolveOutcome::Exhausted);
        // One step forward, one step back
        assert_eq!(canvas.moves.len(), 2);
        assert!(!canvas.moves[0].2);
        assert!(canvas.moves[1].2);
        // The undo starts where the forward move ended
        assert_eq!(canvas.moves[0].1, canvas.moves[1].0);
        assert_eq!(canvas.moves[0].0, canvas.moves[1].1);
    }

    #[test]
    fn test_out_of_bounds_is_exhausted() {
        let mut grid = Grid::new(0, 0);
        let mut canvas = ScriptedCanvas::default();
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let outcome = solve_dfs(&mut grid, (0, 0), (0, 0), &mut get_rng(None), &mut animator);
        assert_eq!(outcome, SolveOutcome::Exhausted);
        assert_eq!(canvas.pumps, 0);
        assert_eq!(canvas.cells_drawn, 0);
    }

    #[test]
    fn test_abort_stops_search() {
        let mut grid = carved(10, 10, 1);
        let mut canvas = ScriptedCanvas::dying_after(3);
        let mut animator = Animator::new(&mut canvas, LAYOUT, Duration::ZERO);
        let outcome = solve_dfs(&mut grid, (0, 0), (9, 9), &mut get_rng(Some(1)), &mut animator);
        assert_eq!(outcome, SolveOutcome::Aborted);
        assert!(canvas.dead);
        assert!(canvas.moves.len() <= 2);
    }
}
