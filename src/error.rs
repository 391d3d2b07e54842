//! Crate error type
//!
//! Precondition violations and configuration problems. A collision is not an
//! error: it is the designed end of a run.

use std::{fmt, io, result};

use crate::sim::LoopPhase;

#[derive(Debug)]
pub enum Error {
    /// The controller has no run (Idle)
    RunNotStarted,
    /// The request is not valid in the current phase
    InvalidPhase {
        action: &'static str,
        phase: LoopPhase,
    },
    /// Horizontal coordinate outside the playable strip
    PositionOutOfBounds { x: f32, min: f32, max: f32 },
    InvalidTuning(String),
    InvalidSettings(String),
    Io(io::Error),
    Json(serde_json::Error),
}

pub type Result<T> = result::Result<T, Error>;

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::RunNotStarted => write!(f, "no run has been started"),
            Error::InvalidPhase { action, phase } => {
                write!(f, "cannot {} while {:?}", action, phase)
            }
            Error::PositionOutOfBounds { x, min, max } => {
                write!(f, "position {} is outside [{}, {}]", x, min, max)
            }
            Error::InvalidTuning(msg) => write!(f, "invalid tuning: {}", msg),
            Error::InvalidSettings(msg) => write!(f, "invalid settings: {}", msg),
            Error::Io(err) => write!(f, "{}", err),
            Error::Json(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
