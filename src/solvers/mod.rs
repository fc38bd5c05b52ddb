mod dfs;

pub use dfs::solve_dfs;

/// Result of a solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The goal was reached. Holds the path from start to goal, both included.
    Reached(Vec<(usize, usize)>),
    /// Every reachable cell was explored without meeting the goal.
    Exhausted,
    /// The canvas went away before the search finished.
    Aborted,
}

impl SolveOutcome {
    pub fn is_reached(&self) -> bool {
        matches!(self, SolveOutcome::Reached(_))
    }

    /// The start-to-goal path, if one was found.
    pub fn path(&self) -> Option<&[(usize, usize)]> {
        match self {
            SolveOutcome::Reached(path) => Some(path),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveOutcome::Reached(path) => write!(f, "reached goal in {} steps", path.len() - 1),
            SolveOutcome::Exhausted => write!(f, "no path to goal"),
            SolveOutcome::Aborted => write!(f, "aborted"),
        }
    }
}
