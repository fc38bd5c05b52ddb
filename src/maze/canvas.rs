use std::time::Duration;

use super::{cell::Cell, grid::Grid};

/// Screen-space corners of one cell. `x2 = x1 + cell width`, so neighbors share an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

impl CellRect {
    pub fn center(&self) -> (u32, u32) {
        // The midpoint of two u32 values always fits back into a u32
        let mid = |a: u32, b: u32| ((u64::from(a) + u64::from(b)) / 2) as u32;
        (mid(self.x1, self.x2), mid(self.y1, self.y2))
    }
}

/// Where the maze sits on the canvas and how large each cell is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub origin_x: u32,
    pub origin_y: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Layout {
    /// Corners of the cell at `(col, row)`. Coordinates past `u32::MAX` clamp to it,
    /// which puts them off any real screen.
    pub fn rect(&self, (col, row): (usize, usize)) -> CellRect {
        let offset = |origin: u32, index: usize, size: u32| {
            u32::try_from(index)
                .unwrap_or(u32::MAX)
                .saturating_mul(size)
                .saturating_add(origin)
        };
        let x1 = offset(self.origin_x, col, self.cell_width);
        let y1 = offset(self.origin_y, row, self.cell_height);
        CellRect {
            x1,
            x2: x1.saturating_add(self.cell_width),
            y1,
            y2: y1.saturating_add(self.cell_height),
        }
    }
}

/// Sink the maze algorithms report into after each mutation.
///
/// Drawing must never influence maze state. `pump` is the only place an
/// implementation may block; returning `false` from it (or from `is_live`)
/// asks the running algorithm to stop where it is.
pub trait Canvas {
    /// Redraw one cell: background and whichever walls are standing.
    fn draw_cell(&mut self, rect: CellRect, cell: &Cell);

    /// Draw a line between two cell centers. `undo` marks a backtracking step.
    fn draw_move(&mut self, from: CellRect, to: CellRect, undo: bool);

    /// Flush pending drawing, wait `pacing`, and report whether to keep going.
    fn pump(&mut self, pacing: Duration) -> bool;

    /// Whether the environment behind the canvas is still around.
    fn is_live(&self) -> bool;
}

/// A canvas with no surface: draws nothing, never waits, never dies.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Canvas for Headless {
    fn draw_cell(&mut self, _rect: CellRect, _cell: &Cell) {}

    fn draw_move(&mut self, _from: CellRect, _to: CellRect, _undo: bool) {}

    fn pump(&mut self, _pacing: Duration) -> bool {
        true
    }

    fn is_live(&self) -> bool {
        true
    }
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn draw_cell(&mut self, rect: CellRect, cell: &Cell) {
        (**self).draw_cell(rect, cell)
    }

    fn draw_move(&mut self, from: CellRect, to: CellRect, undo: bool) {
        (**self).draw_move(from, to, undo)
    }

    fn pump(&mut self, pacing: Duration) -> bool {
        (**self).pump(pacing)
    }

    fn is_live(&self) -> bool {
        (**self).is_live()
    }
}

/// A canvas bound to a layout and a pacing, so the algorithms can talk in grid
/// coordinates.
pub struct Animator<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    layout: Layout,
    pacing: Duration,
}

impl<'a, C: Canvas + ?Sized> Animator<'a, C> {
    pub fn new(canvas: &'a mut C, layout: Layout, pacing: Duration) -> Self {
        Animator {
            canvas,
            layout,
            pacing,
        }
    }

    pub fn draw_cell(&mut self, grid: &Grid, coord: (usize, usize)) {
        self.canvas.draw_cell(self.layout.rect(coord), &grid[coord]);
    }

    pub fn draw_move(&mut self, from: (usize, usize), to: (usize, usize), undo: bool) {
        self.canvas
            .draw_move(self.layout.rect(from), self.layout.rect(to), undo);
    }

    pub fn pump(&mut self) -> bool {
        self.canvas.pump(self.pacing)
    }

    pub fn is_live(&self) -> bool {
        self.canvas.is_live()
    }
}

/// Canvas that records what it was asked to do, and can be told to die after
/// a number of pumps.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedCanvas {
    pub cells_drawn: usize,
    pub moves: Vec<(CellRect, CellRect, bool)>,
    pub pumps: usize,
    pub pacings: Vec<Duration>,
    /// Once this many pumps have happened, every further pump reports a dead environment.
    pub die_after: Option<usize>,
    pub dead: bool,
}

#[cfg(test)]
impl ScriptedCanvas {
    pub fn dying_after(pumps: usize) -> Self {
        ScriptedCanvas {
            die_after: Some(pumps),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl Canvas for ScriptedCanvas {
    fn draw_cell(&mut self, _rect: CellRect, _cell: &Cell) {
        self.cells_drawn += 1;
    }

    fn draw_move(&mut self, from: CellRect, to: CellRect, undo: bool) {
        self.moves.push((from, to, undo));
    }

    fn pump(&mut self, pacing: Duration) -> bool {
        if self.die_after.is_some_and(|limit| self.pumps >= limit) {
            self.dead = true;
            return false;
        }
        self.pumps += 1;
        self.pacings.push(pacing);
        true
    }

    fn is_live(&self) -> bool {
        !self.dead
    }
}
