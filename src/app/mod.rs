pub mod config;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

pub use config::AppConfig;
pub use renderer::TerminalCanvas;

use crate::maze::Maze;

/// How often the input thread wakes up to check whether the maze is done.
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Install a file logger. Raw mode owns the terminal, so logs go to `logs/<file_name>`.
/// `DEBUG=1` lowers the level to debug. Keep the returned guard alive until exit.
pub fn init_tracing(file_name: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never("logs", file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let level = match std::env::var("DEBUG") {
        Ok(val) if val == "1" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .try_init();
    guard
}

/// Draw a maze that fills the terminal, solve it, and wait for Esc.
///
/// Esc at any point stops the animation; the program then exits without
/// waiting for another key.
pub fn run(stdout: &mut Stdout, config: &AppConfig) -> std::io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let maze_config = config.maze_config(term_width, term_height);
    tracing::info!(
        "Terminal is {}x{}, maze is {}x{} cells",
        term_width,
        term_height,
        maze_config.num_cols,
        maze_config.num_rows
    );

    // Flag set by the input thread on Esc. Doubles as the canvas liveness signal.
    let should_stop = Arc::new(AtomicBool::new(false));
    // Flag set by this thread once solving is over, so the input thread lets go of the terminal.
    let done = Arc::new(AtomicBool::new(false));

    let should_stop_for_input = should_stop.clone();
    let done_for_input = done.clone();
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(
            USER_INPUT_EVENT_POLL_TIMEOUT,
            &should_stop_for_input,
            &done_for_input,
        )
    });

    let canvas = TerminalCanvas::new(&mut *stdout, should_stop.clone());
    let outcome = Maze::with_canvas(maze_config, canvas).map(|mut maze| {
        let goal_reached = maze.solve();
        let status_row = maze.num_rows() as u32 * maze.layout().cell_height;
        (goal_reached, status_row, maze.canvas_mut().take_error())
    });

    done.store(true, Ordering::Release);
    input_thread_handle
        .join()
        .map_err(|_| std::io::Error::other("input thread panicked"))??;

    let (goal_reached, status_row, render_error) = outcome?;
    if let Some(e) = render_error {
        return Err(e);
    }

    if should_stop.load(Ordering::Acquire) {
        tracing::info!("Animation was cancelled by user.");
        return Ok(());
    }

    let msg = if goal_reached {
        "Path found! "
    } else {
        "No path found. "
    };
    queue!(
        stdout,
        cursor::MoveTo(0, u16::try_from(status_row + 1).unwrap_or(u16::MAX)),
        style::PrintStyledContent(msg.with(Color::Green).attribute(Attribute::Bold)),
        style::PrintStyledContent(
            "Press Esc to exit..."
                .with(Color::Blue)
                .attribute(Attribute::Bold)
        ),
    )?;
    stdout.flush()?;

    wait_for_keypress(KeyCode::Esc)
}

/// Poll for key presses until Esc is pressed or `done` is set.
/// Esc sets `should_stop`, which the canvas reports as the environment closing.
fn listen_to_user_input(
    poll_timeout: Duration,
    should_stop: &AtomicBool,
    done: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        if done.load(Ordering::Acquire) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(poll_timeout)? {
            // No event available, continue loop to check the done flag again
            continue;
        }

        if let event::Event::Key(event::KeyEvent {
            code: KeyCode::Esc,
            kind: event::KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            tracing::debug!("[input loop] Esc key pressed, exiting");
            should_stop.store(true, Ordering::Release);
            return Ok(());
        }
    }
}

/// Block until the user presses `key`.
fn wait_for_keypress(key: KeyCode) -> std::io::Result<()> {
    loop {
        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if code == key && kind == event::KeyEventKind::Press {
                break;
            }
        }
    }
    Ok(())
}
