use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
};

use crate::maze::{Canvas, Cell, CellFill, CellRect, Direction};

/// Glyph for a standing wall and for the corners where walls meet.
const WALL: &str = "█";
/// Glyph for an open wall or a cell interior.
const OPEN: &str = " ";
const MOVE_HORIZONTAL: &str = "─";
const MOVE_VERTICAL: &str = "│";

/// One past the last terminal coordinate crossterm can address.
const SCREEN_END: u32 = u16::MAX as u32 + 1;

const WALL_COLOR: Color = Color::White;
const PATH_COLOR: Color = Color::Yellow;
const UNDO_COLOR: Color = Color::Red;

fn fill_color(fill: CellFill) -> Color {
    match fill {
        CellFill::Empty => Color::Black,
        CellFill::Entrance => Color::Red,
        CellFill::Exit => Color::Green,
    }
}

/// Every glyph must occupy exactly one terminal column, otherwise the cell
/// edges drift apart.
fn check_glyph(glyph: &str) -> &str {
    #[cfg(debug_assertions)]
    {
        use unicode_width::UnicodeWidthStr;
        assert_eq!(glyph.width(), 1, "glyph {:?} must be one column wide", glyph);
    }
    glyph
}

/// Terminal coordinates are `u16`; anything further out is off screen.
fn to_screen(x: u32, y: u32) -> Option<(u16, u16)> {
    Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
}

/// Draws the maze into a terminal with queued `crossterm` commands.
///
/// A cell's rect is taken inclusively, so neighboring cells share their
/// border column or row. Liveness is an external stop flag, flipped by the
/// input thread when the user presses Esc.
pub struct TerminalCanvas<W: Write> {
    out: W,
    should_stop: Arc<AtomicBool>,
    error: Option<std::io::Error>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, should_stop: Arc<AtomicBool>) -> Self {
        Self {
            out,
            should_stop,
            error: None,
        }
    }

    /// Take the first I/O error hit while drawing, if any. Drawing stops being
    /// live after an error so the running algorithm winds down.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn record(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result {
            if self.error.is_none() {
                tracing::warn!("[render] terminal write failed: {}", e);
                self.error = Some(e);
            }
        }
    }

    fn put(&mut self, x: u32, y: u32, glyph: &str, fg: Color, bg: Color) -> std::io::Result<()> {
        let Some((x, y)) = to_screen(x, y) else {
            return Ok(());
        };
        queue!(
            self.out,
            cursor::MoveTo(x, y),
            style::PrintStyledContent(check_glyph(glyph).with(fg).on(bg))
        )
    }

    fn put_cell(&mut self, rect: CellRect, cell: &Cell) -> std::io::Result<()> {
        let bg = fill_color(cell.fill());
        let wall_or_open = |side: Direction| if cell.has_wall(side) { WALL } else { OPEN };

        // Only the part of a cell that can land on screen is walked
        let inner_x = rect.x1.saturating_add(1)..rect.x2.min(SCREEN_END);
        let inner_y = rect.y1.saturating_add(1)..rect.y2.min(SCREEN_END);

        for y in inner_y.clone() {
            for x in inner_x.clone() {
                self.put(x, y, OPEN, WALL_COLOR, bg)?;
            }
        }
        for x in inner_x {
            self.put(x, rect.y1, wall_or_open(Direction::North), WALL_COLOR, bg)?;
            self.put(x, rect.y2, wall_or_open(Direction::South), WALL_COLOR, bg)?;
        }
        for y in inner_y {
            self.put(rect.x1, y, wall_or_open(Direction::West), WALL_COLOR, bg)?;
            self.put(rect.x2, y, wall_or_open(Direction::East), WALL_COLOR, bg)?;
        }
        for (x, y) in [
            (rect.x1, rect.y1),
            (rect.x2, rect.y1),
            (rect.x1, rect.y2),
            (rect.x2, rect.y2),
        ] {
            self.put(x, y, WALL, WALL_COLOR, Color::Black)?;
        }
        Ok(())
    }

    fn put_move(&mut self, from: CellRect, to: CellRect, undo: bool) -> std::io::Result<()> {
        let fg = if undo { UNDO_COLOR } else { PATH_COLOR };
        let (fx, fy) = from.center();
        let (tx, ty) = to.center();
        if fy == ty {
            for x in fx.min(tx)..=fx.max(tx).min(SCREEN_END - 1) {
                self.put(x, fy, MOVE_HORIZONTAL, fg, Color::Black)?;
            }
        } else {
            for y in fy.min(ty)..=fy.max(ty).min(SCREEN_END - 1) {
                self.put(fx, y, MOVE_VERTICAL, fg, Color::Black)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn draw_cell(&mut self, rect: CellRect, cell: &Cell) {
        let result = self.put_cell(rect, cell);
        self.record(result);
    }

    fn draw_move(&mut self, from: CellRect, to: CellRect, undo: bool) {
        let result = self.put_move(from, to, undo);
        self.record(result);
    }

    fn pump(&mut self, pacing: Duration) -> bool {
        let result = self.out.flush();
        self.record(result);
        if !pacing.is_zero() {
            std::thread::sleep(pacing);
        }
        self.is_live()
    }

    fn is_live(&self) -> bool {
        self.error.is_none() && !self.should_stop.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Layout;

    const LAYOUT: Layout = Layout {
        origin_x: 0,
        origin_y: 0,
        cell_width: 4,
        cell_height: 2,
    };

    fn canvas() -> (TerminalCanvas<Vec<u8>>, Arc<AtomicBool>) {
        let stop = Arc::new(AtomicBool::new(false));
        (TerminalCanvas::new(Vec::new(), stop.clone()), stop)
    }

    #[test]
    fn test_draw_cell_writes_walls() {
        let (mut canvas, _) = canvas();
        canvas.draw_cell(LAYOUT.rect((0, 0)), &Cell::new());
        assert!(canvas.pump(Duration::ZERO));
        let out = String::from_utf8(canvas.into_inner()).expect("utf-8 output");
        // 3 top, 3 bottom, 1 left, 1 right, 4 corners
        assert_eq!(out.matches(WALL).count(), 12);
    }

    #[test]
    fn test_open_walls_are_blank() {
        let (mut canvas, _) = canvas();
        let mut cell = Cell::new();
        cell.remove_wall(Direction::North);
        cell.remove_wall(Direction::East);
        canvas.draw_cell(LAYOUT.rect((0, 0)), &cell);
        let out = String::from_utf8(canvas.into_inner()).expect("utf-8 output");
        assert_eq!(out.matches(WALL).count(), 12 - 3 - 1);
    }

    #[test]
    fn test_moves_follow_the_axis() {
        let (mut canvas, _) = canvas();
        canvas.draw_move(LAYOUT.rect((0, 0)), LAYOUT.rect((1, 0)), false);
        canvas.draw_move(LAYOUT.rect((1, 1)), LAYOUT.rect((1, 0)), true);
        let out = String::from_utf8(canvas.into_inner()).expect("utf-8 output");
        // Centers are 4 columns apart horizontally, 2 rows apart vertically
        assert_eq!(out.matches(MOVE_HORIZONTAL).count(), 5);
        assert_eq!(out.matches(MOVE_VERTICAL).count(), 3);
    }

    #[test]
    fn test_off_screen_cells_are_skipped() {
        let (mut canvas, _) = canvas();
        let far = Layout {
            origin_x: u32::from(u16::MAX),
            ..LAYOUT
        };
        canvas.draw_cell(far.rect((1, 0)), &Cell::new());
        assert!(canvas.is_live());
        assert!(canvas.into_inner().is_empty());
    }

    #[test]
    fn test_move_colors() {
        let fg = |color| format!("\x1b[{}m", style::Colored::ForegroundColor(color));
        let (mut forward_canvas, _) = canvas();
        forward_canvas.draw_move(LAYOUT.rect((0, 0)), LAYOUT.rect((1, 0)), false);
        let forward = String::from_utf8(forward_canvas.into_inner()).expect("utf-8 output");
        assert!(forward.contains(&fg(Color::Yellow)));
        assert!(!forward.contains(&fg(Color::Red)));

        let (mut undo_canvas, _) = canvas();
        undo_canvas.draw_move(LAYOUT.rect((1, 0)), LAYOUT.rect((0, 0)), true);
        let undo = String::from_utf8(undo_canvas.into_inner()).expect("utf-8 output");
        assert!(undo.contains(&fg(Color::Red)));
        assert!(!undo.contains(&fg(Color::Yellow)));
    }

    #[test]
    fn test_huge_cells_draw_only_what_fits() {
        let (mut canvas, _) = canvas();
        let huge = Layout {
            cell_width: u32::MAX / 2,
            ..LAYOUT
        };
        canvas.draw_cell(huge.rect((0, 0)), &Cell::new());
        canvas.draw_cell(huge.rect((2, 0)), &Cell::new());
        canvas.draw_move(huge.rect((0, 0)), huge.rect((1, 0)), false);
        assert!(canvas.pump(Duration::ZERO));
        assert!(!canvas.into_inner().is_empty());
    }

    #[test]
    fn test_stop_flag_ends_liveness() {
        let (mut canvas, stop) = canvas();
        assert!(canvas.is_live());
        stop.store(true, Ordering::Release);
        assert!(!canvas.is_live());
        assert!(!canvas.pump(Duration::ZERO));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_write_error_ends_liveness() {
        let mut canvas = TerminalCanvas::new(BrokenPipe, Arc::new(AtomicBool::new(false)));
        assert!(!canvas.pump(Duration::ZERO));
        assert!(!canvas.is_live());
        let err = canvas.take_error().expect("error recorded");
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
