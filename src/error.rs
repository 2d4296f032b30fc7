//! Error types for tournament simulation.

use thiserror::Error;

/// Errors raised before or during a tournament run.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Roster failed validation (empty group, duplicate name, bad rank...).
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    /// Not enough teams to fill the knockout bracket.
    #[error("Insufficient qualifiers: bracket needs {required} teams, only {available} available")]
    InsufficientQualifiers { required: usize, available: usize },

    /// A team's running score total no longer fits the table.
    #[error("Score overflow: totals for team {team} exceed {max}")]
    ScoreOverflow { team: String, max: u32 },

    /// Pot or bracket configuration is inconsistent.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Roster or config JSON could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TournamentError>;
