//! Click-a-Dot - a reflex game engine
//!
//! Core modules:
//! - `sim`: Target lifecycle, expiration timer, hit detection and scoring
//! - `settings`: Persisted game configuration
//! - `persistence`: Score file append/read
//! - `highscores`: Leaderboard built from a score file

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{GameError, PersistError};
pub use highscores::HighScores;
pub use settings::{MissPolicy, Settings};
pub use sim::{
    ClickOutcome, EngineConfig, GameEngine, GamePhase, HostSurface, ScoreListener, SharedSurface,
    SurfaceSize, Target,
};

/// Game configuration constants
pub mod consts {
    /// Smallest allowed target radius (pixels)
    pub const MIN_TARGET_RADIUS: u32 = 1;
    /// Largest allowed target radius (pixels)
    pub const MAX_TARGET_RADIUS: u32 = 50;
    /// Radius used when nothing else is configured
    pub const DEFAULT_TARGET_RADIUS: u32 = 20;

    /// Shortest allowed target lifetime (ms)
    pub const MIN_TARGET_TIME_MILLIS: u32 = 250;
    /// Longest allowed target lifetime (ms)
    pub const MAX_TARGET_TIME_MILLIS: u32 = 2000;
    /// Lifetime used when nothing else is configured
    pub const DEFAULT_TARGET_TIME_MILLIS: u32 = 1000;

    /// Default playing surface size (pixels)
    pub const DEFAULT_SURFACE_WIDTH: u32 = 400;
    pub const DEFAULT_SURFACE_HEIGHT: u32 = 400;
}

/// Clamp a radius into the allowed range
#[inline]
pub fn clamp_radius(radius: u32) -> u32 {
    radius.clamp(consts::MIN_TARGET_RADIUS, consts::MAX_TARGET_RADIUS)
}

/// Clamp a target lifetime into the allowed range
#[inline]
pub fn clamp_time_millis(millis: u32) -> u32 {
    millis.clamp(consts::MIN_TARGET_TIME_MILLIS, consts::MAX_TARGET_TIME_MILLIS)
}
