use std::time::{Duration, Instant};

use mazecarve::{
    app,
    maze::{Maze, MazeConfig},
};

const SIZE: i64 = 200;

fn main() -> std::io::Result<()> {
    let _guard = app::init_tracing("profile.log");

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(10);

    let mut generation_total = Duration::ZERO;
    let mut solving_total = Duration::ZERO;
    for seed in 0..num_iters {
        let config = MazeConfig {
            num_rows: SIZE,
            num_cols: SIZE,
            seed: Some(seed),
            solving_pacing: Duration::ZERO,
            ..Default::default()
        };

        let started = Instant::now();
        let mut maze = Maze::new(config)?;
        let generated = started.elapsed();

        let started = Instant::now();
        let goal_reached = maze.solve();
        let solved = started.elapsed();

        tracing::info!(
            "[profile] seed {}: generation {:?}, solving {:?}, goal reached: {}",
            seed,
            generated,
            solved,
            goal_reached
        );
        if !goal_reached {
            return Err(std::io::Error::other(format!(
                "seed {} produced an unsolvable maze",
                seed
            )));
        }
        generation_total += generated;
        solving_total += solved;
    }

    if num_iters > 0 {
        println!(
            "{} mazes of {}x{}: mean generation {:?}, mean solving {:?}",
            num_iters,
            SIZE,
            SIZE,
            generation_total / num_iters as u32,
            solving_total / num_iters as u32
        );
    }
    Ok(())
}
