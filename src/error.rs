//! Error types for board notation and search configuration.
//!
//! Running out of legal moves is not an error: the enumerator returns an empty list and the agents
//! return `None`.

/// Errors produced while parsing the board text notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBoardError {
    #[error("expected 8 rows, found {found}")]
    RowCount { found: usize },

    #[error("row {row}: expected 8 cells, found {found}")]
    RowWidth { row: usize, found: usize },

    #[error("unknown cell {ch:?} at ({row}, {col})")]
    UnknownCell { ch: char, row: usize, col: usize },

    #[error("piece on non-playable cell ({row}, {col})")]
    NonPlayableCell { row: usize, col: usize },

    /// a man standing on the row it gets crowned on can't be reached by legal play
    #[error("uncrowned man on its promotion row at ({row}, {col})")]
    ManOnPromotionRow { row: usize, col: usize },
}

/// Errors produced when validating a search configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("search depth must be at least 1 ply")]
    ZeroDepth,

    #[error("worker thread count must be at least 1")]
    ZeroThreads,

    #[error("piece weights must be positive and finite, got man {man} and king {king}")]
    InvalidWeights { man: f64, king: f64 },

    #[error("simulation budget must be at least 1 iteration")]
    ZeroIterations,

    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("draw rule needs at least 1 ply without capture")]
    ZeroDrawPlies,
}
