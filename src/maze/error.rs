use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// A row or column count below zero was requested.
    InvalidDimension { num_rows: i64, num_cols: i64 },
    /// The requested grid has more cells than can be held in memory.
    TooLarge { num_rows: i64, num_cols: i64 },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimension { num_rows, num_cols } => write!(
                f,
                "number of rows and columns must be non-negative (got {} rows, {} columns)",
                num_rows, num_cols
            ),
            MazeError::TooLarge { num_rows, num_cols } => write!(
                f,
                "a maze of {} rows and {} columns is too large to allocate",
                num_rows, num_cols
            ),
        }
    }
}

impl std::error::Error for MazeError {}

impl From<MazeError> for std::io::Error {
    fn from(err: MazeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}
