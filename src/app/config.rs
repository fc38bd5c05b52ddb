use std::{str::FromStr, time::Duration};

use clap::Parser;

use crate::maze::MazeConfig;

/// Carve a maze that fills the terminal, then watch a depth-first search solve it.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(version, about, long_about = None)]
pub struct AppConfig {
    /// Seed for the maze generator. A fresh maze is carved every run without one.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Terminal columns and rows per cell, borders included (for example 4x2).
    #[arg(
        long = "cell",
        value_name = "WIDTHxHEIGHT",
        default_value = "4x2",
        value_parser = CellSize::from_str
    )]
    pub cell_size: CellSize,

    /// Milliseconds to wait after each carving step.
    #[arg(
        long = "generation-ms",
        value_name = "MILLISECONDS",
        default_value_t = 0,
        value_parser = clap::value_parser!(u64).range(0..=60_000)
    )]
    pub generation_ms: u64,

    /// Milliseconds to wait after each solver step.
    #[arg(
        long = "solving-ms",
        value_name = "MILLISECONDS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(0..=60_000)
    )]
    pub solving_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            cell_size: CellSize {
                width: 4,
                height: 2,
            },
            generation_ms: 0,
            solving_ms: 10,
        }
    }
}

/// Size of one cell on screen, parsed from `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for CellSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
        let parse = |value: &str| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid cell size {:?}: {}", s, e))
        };
        let size = CellSize {
            width: parse(width)?,
            height: parse(height)?,
        };
        // A cell needs room for its two borders
        if size.width < 2 || size.height < 2 {
            return Err(format!("cell width and height must be at least 2, got {:?}", s));
        }
        Ok(size)
    }
}

impl AppConfig {
    pub fn generation_pacing(&self) -> Duration {
        Duration::from_millis(self.generation_ms)
    }

    pub fn solving_pacing(&self) -> Duration {
        Duration::from_millis(self.solving_ms)
    }

    /// Size the maze to fill a `term_width` x `term_height` terminal, keeping the
    /// last row free for the status line.
    pub fn maze_config(&self, term_width: u16, term_height: u16) -> MazeConfig {
        let CellSize { width, height } = self.cell_size;
        // A row of n cells needs n * width + 1 columns, since borders are shared
        let fit = |space: u16, size: u32| (u32::from(space).saturating_sub(1) / size) as i64;
        MazeConfig {
            origin: (0, 0),
            num_cols: fit(term_width, width),
            num_rows: fit(term_height.saturating_sub(1), height),
            cell_width: width,
            cell_height: height,
            seed: self.seed,
            generation_pacing: self.generation_pacing(),
            solving_pacing: self.solving_pacing(),
        }
    }
}
