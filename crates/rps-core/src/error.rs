//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid bounds: max_x={max_x}, max_y={max_y}")]
    InvalidBounds { max_x: i32, max_y: i32 },

    #[error("Board full: requested {requested} players but only {capacity} cells")]
    BoardFull { requested: usize, capacity: usize },

    #[error("Viewport too small: {max_x}x{max_y} (minimum {min})")]
    ViewportTooSmall { max_x: i32, max_y: i32, min: i32 },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
