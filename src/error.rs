use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the fault scene library.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Grdecl(#[from] GrdeclError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to grid construction and lookup.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid dimensions {ni} x {nj} x {nk}")]
    InvalidDimensions { ni: usize, nj: usize, nk: usize },

    #[error("{keyword} has {actual} values, expected {expected}")]
    SizeMismatch {
        keyword: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cell index {0} is out of range")]
    CellOutOfRange(usize),
}

/// Errors related to scene parts and transforms.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("triangle {triangle} is out of range for part {part}")]
    TriangleOutOfRange { part: String, triangle: usize },
}

/// Errors raised while reading or writing GRDECL text files.
#[derive(Debug, Error)]
pub enum GrdeclError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("keyword {0} not found")]
    MissingKeyword(String),

    #[error("keyword {keyword}: cannot parse '{token}'")]
    BadValue { keyword: String, token: String },

    #[error("result {0} not found")]
    UnknownResult(String),

    #[error("time step {time_step} out of range for result {result}")]
    TimeStepOutOfRange { result: String, time_step: usize },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
