pub mod canvas;
pub mod cell;
mod error;
pub mod grid;

use std::time::Duration;

use rand::rngs::StdRng;

pub use canvas::{Canvas, CellRect, Headless, Layout};
pub use cell::{Cell, CellFill, Direction};
pub use error::MazeError;
pub use grid::Grid;

use crate::{
    generators::{Progress, get_rng, recursive_backtrack},
    solvers::{SolveOutcome, solve_dfs},
};
use canvas::Animator;

/// Everything needed to build a [`Maze`].
#[derive(Debug, Clone)]
pub struct MazeConfig {
    /// Canvas position of the top-left corner of cell (0, 0).
    pub origin: (u32, u32),
    pub num_rows: i64,
    pub num_cols: i64,
    pub cell_width: u32,
    pub cell_height: u32,
    /// `None` seeds from the OS, so every maze is different.
    pub seed: Option<u64>,
    /// Pause after each carving step.
    pub generation_pacing: Duration,
    /// Pause after each solving step.
    pub solving_pacing: Duration,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            origin: (0, 0),
            num_rows: 0,
            num_cols: 0,
            cell_width: 4,
            cell_height: 2,
            seed: None,
            generation_pacing: Duration::ZERO,
            solving_pacing: Duration::from_millis(10),
        }
    }
}

/// A rectangular maze together with the canvas it animates on.
///
/// Cell `(0, 0)` is the entrance (its top wall is opened) and the bottom-right
/// cell is the exit (its bottom wall is opened).
pub struct Maze<C: Canvas = Headless> {
    grid: Grid,
    layout: Layout,
    rng: StdRng,
    canvas: C,
    generation_pacing: Duration,
    solving_pacing: Duration,
    generation: Progress,
    last_solve: Option<SolveOutcome>,
}

impl Maze<Headless> {
    /// Build and carve a maze with nothing to draw on.
    pub fn new(config: MazeConfig) -> Result<Self, MazeError> {
        Maze::with_canvas(config, Headless)
    }
}

impl<C: Canvas> Maze<C> {
    /// Build a maze on `canvas`: allocate the grid, open the entrance and exit,
    /// carve the passages and clear the visit marks, ready for [`Maze::solve`].
    pub fn with_canvas(config: MazeConfig, canvas: C) -> Result<Self, MazeError> {
        let mut maze = Maze::blank(config, canvas)?;
        if maze.open_entrance_and_exit() {
            maze.generate();
        } else {
            tracing::warn!("[maze] canvas closed before carving started");
            maze.generation = Progress::Aborted;
        }
        maze.reset_visited();
        Ok(maze)
    }

    /// Validate the dimensions, allocate a fully walled grid and paint it once.
    /// Nothing is carved yet.
    pub fn blank(config: MazeConfig, mut canvas: C) -> Result<Self, MazeError> {
        let (num_cols, num_rows) = match (
            usize::try_from(config.num_cols),
            usize::try_from(config.num_rows),
        ) {
            (Ok(cols), Ok(rows)) => (cols, rows),
            _ => {
                return Err(MazeError::InvalidDimension {
                    num_rows: config.num_rows,
                    num_cols: config.num_cols,
                });
            }
        };
        if Grid::cell_count(num_cols, num_rows).is_none() {
            return Err(MazeError::TooLarge {
                num_rows: config.num_rows,
                num_cols: config.num_cols,
            });
        }

        tracing::info!(
            "[maze] creating {}x{} maze (seed {:?})",
            num_cols,
            num_rows,
            config.seed
        );

        let grid = Grid::new(num_cols, num_rows);
        let layout = Layout {
            origin_x: config.origin.0,
            origin_y: config.origin.1,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
        };

        let mut animator = Animator::new(&mut canvas, layout, config.generation_pacing);
        grid.coords().for_each(|coord| animator.draw_cell(&grid, coord));
        animator.pump();

        Ok(Maze {
            grid,
            layout,
            rng: get_rng(config.seed),
            canvas,
            generation_pacing: config.generation_pacing,
            solving_pacing: config.solving_pacing,
            generation: Progress::Complete,
            last_solve: None,
        })
    }

    /// Open the top wall of the entrance and the bottom wall of the exit.
    /// Returns `false` if the canvas closed while drawing them.
    pub fn open_entrance_and_exit(&mut self) -> bool {
        if self.grid.is_empty() {
            return true;
        }
        let entrance = (0, 0);
        let exit = self.goal();
        let mut animator = Animator::new(&mut self.canvas, self.layout, self.generation_pacing);

        let entrance_cell = &mut self.grid[entrance];
        entrance_cell.remove_wall(Direction::North);
        entrance_cell.set_fill(CellFill::Entrance);
        animator.draw_cell(&self.grid, entrance);
        let entrance_live = animator.pump();

        let exit_cell = &mut self.grid[exit];
        exit_cell.remove_wall(Direction::South);
        exit_cell.set_fill(CellFill::Exit);
        animator.draw_cell(&self.grid, exit);
        let exit_live = animator.pump();

        entrance_live && exit_live
    }

    /// Carve the passages starting from the entrance.
    pub fn generate(&mut self) -> Progress {
        let mut animator = Animator::new(&mut self.canvas, self.layout, self.generation_pacing);
        self.generation = recursive_backtrack(&mut self.grid, (0, 0), &mut self.rng, &mut animator);
        tracing::info!("[maze] generation {}", self.generation);
        self.generation
    }

    /// Clear every visit mark left behind by the previous phase.
    pub fn reset_visited(&mut self) {
        self.grid.reset_visited();
    }

    /// Search for the exit from the entrance. Returns whether it was reached.
    ///
    /// A zero-sized maze has neither entrance nor exit and always returns `false`.
    pub fn solve(&mut self) -> bool {
        self.reset_visited();
        let goal = self.goal();
        let mut animator = Animator::new(&mut self.canvas, self.layout, self.solving_pacing);
        let outcome = solve_dfs(&mut self.grid, (0, 0), goal, &mut self.rng, &mut animator);
        match &outcome {
            SolveOutcome::Reached(_) | SolveOutcome::Aborted => {
                tracing::info!("[maze] solve {}", outcome)
            }
            SolveOutcome::Exhausted if !self.grid.is_empty() => {
                tracing::warn!("[maze] solve {}", outcome)
            }
            SolveOutcome::Exhausted => {}
        }
        let reached = outcome.is_reached();
        self.last_solve = Some(outcome);
        reached
    }

    /// Bottom-right cell. Meaningless (and out of bounds) for an empty maze.
    fn goal(&self) -> (usize, usize) {
        (
            self.grid.num_cols().saturating_sub(1),
            self.grid.num_rows().saturating_sub(1),
        )
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn num_rows(&self) -> usize {
        self.grid.num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.grid.num_cols()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// How the most recent carving run ended.
    pub fn generation(&self) -> Progress {
        self.generation
    }

    /// Outcome of the most recent [`Maze::solve`], if any.
    pub fn last_solve(&self) -> Option<&SolveOutcome> {
        self.last_solve.as_ref()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}
