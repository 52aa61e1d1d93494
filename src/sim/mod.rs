//! Game simulation module
//!
//! Target lifecycle, expiration timing, hit detection and scoring. No
//! rendering or platform dependencies:
//! - Surface bounds come from the host through `HostSurface`
//! - Placement draws from a seeded RNG only
//! - Every state transition runs under the engine lock

pub mod engine;
pub mod placement;
pub mod scheduler;
pub mod state;
pub mod target;

pub use engine::{ClickOutcome, GameEngine, ListenerId, ScoreListener};
pub use placement::{Placement, place};
pub use scheduler::{ExpirationScheduler, TimerHandle};
pub use state::{EngineConfig, GamePhase};
pub use target::{HostSurface, SharedSurface, SurfaceSize, Target};
