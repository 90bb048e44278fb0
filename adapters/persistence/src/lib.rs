#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! High-score storage for Delve sessions.
//!
//! The score is read once before a session starts and written at most once
//! after it ends. Failures never abort a session: reads fall back to zero and
//! write errors are reported to the caller, which surfaces them as warnings.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::warn;
use thiserror::Error;

/// File name used when no explicit location is configured.
pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

/// Errors raised while reading or writing the high score.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing file could not be read.
    #[error("could not read high score from {path}")]
    Read {
        /// Location that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backing file could not be written.
    #[error("could not write high score to {path}")]
    Write {
        /// Location that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The stored value is not a non-negative integer.
    #[error("high score file {path} does not start with an integer (found {found:?})")]
    Malformed {
        /// Location that held the value.
        path: PathBuf,
        /// First token found in the file.
        found: String,
    },
}

/// Storage for the best score achieved across sessions.
pub trait HighScoreStore {
    /// Reads the stored high score.
    fn load(&self) -> Result<u32, PersistenceError>;

    /// Replaces the stored high score.
    fn save(&mut self, score: u32) -> Result<(), PersistenceError>;
}

/// Stores the high score as a single decimal integer in a text file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    /// Creates a store backed by `path`. The file is not touched until used.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.clone(),
            source,
        })?;

        let token = contents.split_whitespace().next().unwrap_or_default();
        token.parse().map_err(|_| PersistenceError::Malformed {
            path: self.path.clone(),
            found: token.to_owned(),
        })
    }

    fn save(&mut self, score: u32) -> Result<(), PersistenceError> {
        fs::write(&self.path, format!("{score}\n")).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Loads the high score, treating any failure as a score of zero.
///
/// A missing file is the normal first-run state and is not logged; every
/// other failure is logged at `warn`.
pub fn load_or_default(store: &dyn HighScoreStore) -> u32 {
    match store.load() {
        Ok(score) => score,
        Err(PersistenceError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            0
        }
        Err(error) => {
            warn!("{error}; starting from a high score of 0");
            0
        }
    }
}
