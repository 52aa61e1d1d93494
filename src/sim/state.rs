//! Engine phase, configuration and the mutable state guarded by the engine lock

use rand_pcg::Pcg32;

use super::scheduler::TimerHandle;
use super::target::Target;
use crate::consts::*;
use crate::settings::{MissPolicy, Settings};
use crate::{clamp_radius, clamp_time_millis};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Constructed, never started
    Idle,
    /// Targets spawn and clicks count
    Running,
    /// Terminal; a stopped game cannot be restarted
    Stopped,
}

/// Knobs applied to every spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub target_radius: u32,
    pub target_time_millis: u32,
    pub miss_policy: MissPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_radius: DEFAULT_TARGET_RADIUS,
            target_time_millis: DEFAULT_TARGET_TIME_MILLIS,
            miss_policy: MissPolicy::Ignore,
        }
    }
}

impl EngineConfig {
    /// Build a config with both ranges clamped
    pub fn new(target_radius: u32, target_time_millis: u32, miss_policy: MissPolicy) -> Self {
        Self {
            target_radius: clamp_radius(target_radius),
            target_time_millis: clamp_time_millis(target_time_millis),
            miss_policy,
        }
    }
}

impl From<&Settings> for EngineConfig {
    fn from(settings: &Settings) -> Self {
        Self::new(
            settings.target_radius,
            settings.target_time_millis,
            settings.miss_policy,
        )
    }
}

/// Everything a transition reads-then-writes. Only touched under the engine lock.
#[derive(Debug)]
pub(crate) struct EngineState {
    pub phase: GamePhase,
    pub config: EngineConfig,
    pub target: Option<Target>,
    /// Bumped on every spawn attempt; stale expirations compare against it
    pub generation: u64,
    pub timer: Option<TimerHandle>,
    pub rng: Pcg32,
    /// Bumped on every score change; orders listener notifications
    pub score_seq: u64,
}

impl EngineState {
    pub fn new(config: EngineConfig, rng: Pcg32) -> Self {
        Self {
            phase: GamePhase::Idle,
            config,
            target: None,
            generation: 0,
            timer: None,
            rng,
            score_seq: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_clamps() {
        let config = EngineConfig::new(0, 5000, MissPolicy::Penalize);
        assert_eq!(config.target_radius, MIN_TARGET_RADIUS);
        assert_eq!(config.target_time_millis, MAX_TARGET_TIME_MILLIS);
        assert_eq!(config.miss_policy, MissPolicy::Penalize);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            target_radius: 75,
            target_time_millis: 600,
            ..Default::default()
        };
        let config = EngineConfig::from(&settings);
        assert_eq!(config.target_radius, 50);
        assert_eq!(config.target_time_millis, 600);
        assert_eq!(config.miss_policy, MissPolicy::Ignore);
    }
}
