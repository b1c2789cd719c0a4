//! Run configuration read from the environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use shelfscore_core::{env_parse_with_default, DEFAULT_INGEST_PACING_MS};

/// How a run replaces table contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IngestMode {
    /// Clear and insert inside one transaction, savepoint per record.
    #[default]
    Atomic,
    /// Clear, then insert record by record with pacing between book inserts.
    Sequential,
}

impl IngestMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Sequential => "sequential",
        }
    }
}

impl fmt::Display for IngestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!("unknown ingest mode: {other}")),
        }
    }
}

/// Where critic scores are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreMode {
    /// Fetch the review set and apply the rule in process.
    #[default]
    Local,
    /// Call the store's `recompute_critic_score` procedure.
    Store,
}

impl ScoreMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "store" | "procedure" => Ok(Self::Store),
            other => Err(format!("unknown score mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    pub mode: IngestMode,
    /// Delay between successive book inserts in sequential mode.
    pub pacing: Duration,
    pub score_mode: ScoreMode,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: IngestMode::default(),
            pacing: Duration::from_millis(DEFAULT_INGEST_PACING_MS),
            score_mode: ScoreMode::default(),
        }
    }
}

impl IngestConfig {
    /// `SHELFSCORE_INGEST_MODE`, `SHELFSCORE_INGEST_PACING_MS`, `SHELFSCORE_SCORE_MODE`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            mode: env_parse_with_default("SHELFSCORE_INGEST_MODE", IngestMode::default()),
            pacing: Duration::from_millis(env_parse_with_default(
                "SHELFSCORE_INGEST_PACING_MS",
                DEFAULT_INGEST_PACING_MS,
            )),
            score_mode: env_parse_with_default("SHELFSCORE_SCORE_MODE", ScoreMode::default()),
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: IngestMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub const fn with_score_mode(mut self, score_mode: ScoreMode) -> Self {
        self.score_mode = score_mode;
        self
    }
}
