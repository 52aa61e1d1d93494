//! Error types for the engine and the score/settings files

use core::fmt;

use crate::sim::GamePhase;

/// Engine actions that can be refused by the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Click,
    Expire,
    Resize,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Click => write!(f, "click"),
            Self::Expire => write!(f, "expire"),
            Self::Resize => write!(f, "resize"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// Surface cannot hold even the smallest target
    InvalidGeometry { width: u32, height: u32, radius: u32 },
    /// Action is not supported in the current phase
    IllegalTransition { action: Action, phase: GamePhase },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry {
                width,
                height,
                radius,
            } => write!(
                f,
                "invalid geometry: {width}x{height} surface cannot hold a target of radius {radius}"
            ),
            Self::IllegalTransition { action, phase } => {
                write!(f, "illegal transition: {action} while {phase:?}")
            }
        }
    }
}

impl std::error::Error for GameError {}

/// Failure reading or writing a settings or score file
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Json(err) => write!(f, "malformed json: {err}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GameError::InvalidGeometry {
            width: 1,
            height: 40,
            radius: 1,
        };
        assert_eq!(
            err.to_string(),
            "invalid geometry: 1x40 surface cannot hold a target of radius 1"
        );

        let err = GameError::IllegalTransition {
            action: Action::Start,
            phase: GamePhase::Stopped,
        };
        assert_eq!(err.to_string(), "illegal transition: start while Stopped");
    }

    #[test]
    fn test_persist_error_source() {
        use std::error::Error;
        let err = PersistError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("i/o error"));
    }
}
