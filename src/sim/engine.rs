//! The game engine: phase machine, spawning, hit testing and scoring
//!
//! Two actors drive the engine: the host (clicks, config, stop) and the
//! expiration worker. Every transition runs under one lock and each spawn bumps
//! a generation counter, so when a click and an expiration race for the same
//! target, whichever takes the lock first wins and the other finds a newer
//! generation and does nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::placement::place;
use super::scheduler::ExpirationScheduler;
use super::state::{EngineConfig, EngineState, GamePhase};
use super::target::{HostSurface, Target};
use crate::error::{Action, GameError};
use crate::settings::MissPolicy;
use crate::{clamp_radius, clamp_time_millis};

/// Receives the new score after every score change.
///
/// Called synchronously on whichever thread changed the score, after the
/// engine lock is released. Listeners see scores in mutation order; a change
/// overtaken by a newer one before it could be delivered is skipped. A
/// listener may call any getter, but not a mutating operation.
pub trait ScoreListener: Send + Sync {
    fn on_score_changed(&self, score: u64);
}

impl<F> ScoreListener for F
where
    F: Fn(u64) + Send + Sync,
{
    fn on_score_changed(&self, score: u64) {
        self(score)
    }
}

/// Returned by [`GameEngine::add_score_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Target of `generation` was hit; `score` is the new score
    Hit { generation: u64, score: u64 },
    /// Outside the current target, or no target on screen
    Miss,
    /// Game is not running
    Ignored,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Arc<dyn ScoreListener>)>,
}

struct Shared {
    state: Mutex<EngineState>,
    /// Written only while `state` is held; read lock-free
    score: AtomicU64,
    listeners: Mutex<Listeners>,
    /// `score_seq` of the last notification handed to listeners
    delivered: Mutex<u64>,
    scheduler: ExpirationScheduler,
    surface: Arc<dyn HostSurface>,
}

pub struct GameEngine {
    shared: Arc<Shared>,
}

impl GameEngine {
    /// Engine with a randomly seeded placement RNG
    pub fn new<S: HostSurface + 'static>(surface: Arc<S>, config: EngineConfig) -> Self {
        Self::with_seed(surface, config, rand::rng().random())
    }

    /// Engine whose target positions are reproducible for a given seed
    pub fn with_seed<S: HostSurface + 'static>(
        surface: Arc<S>,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        let config = EngineConfig::new(
            config.target_radius,
            config.target_time_millis,
            config.miss_policy,
        );
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(EngineState::new(config, Pcg32::seed_from_u64(seed))),
                score: AtomicU64::new(0),
                listeners: Mutex::new(Listeners::default()),
                delivered: Mutex::new(0),
                scheduler: ExpirationScheduler::new(),
                surface,
            }),
        }
    }

    /// `Idle -> Running`: spawn the first target and arm its timer
    pub fn start_game(&self) {
        let mut state = self.shared.lock_state();
        if state.phase != GamePhase::Idle {
            log_ignored(Action::Start, state.phase);
            return;
        }
        state.phase = GamePhase::Running;
        log::info!(
            "game started (radius {}, {} ms)",
            state.config.target_radius,
            state.config.target_time_millis
        );
        self.shared.spawn(&mut state);
    }

    /// Stop for good. Once this returns nothing spawns and the score is frozen.
    pub fn stop_game(&self) {
        let mut state = self.shared.lock_state();
        if state.phase == GamePhase::Stopped {
            return;
        }
        if let Some(handle) = state.timer.take() {
            self.shared.scheduler.cancel(handle);
        }
        state.target = None;
        state.phase = GamePhase::Stopped;
        log::info!("game stopped with score {}", self.score());
    }

    /// Hit-test a pointer press in surface coordinates
    pub fn register_click(&self, x: f32, y: f32) -> ClickOutcome {
        let mut state = self.shared.lock_state();
        if state.phase != GamePhase::Running {
            log_ignored(Action::Click, state.phase);
            return ClickOutcome::Ignored;
        }
        let Some(target) = state.target else {
            return ClickOutcome::Miss;
        };
        if !target.contains(Vec2::new(x, y)) {
            return ClickOutcome::Miss;
        }

        let score = self.shared.score.load(Ordering::SeqCst) + 1;
        self.shared.score.store(score, Ordering::SeqCst);
        log::debug!("hit target {} -> score {score}", target.generation);
        self.shared.spawn(&mut state);
        let notice = self.shared.notice(&mut state, score);
        drop(state);
        self.shared.deliver(notice);

        ClickOutcome::Hit {
            generation: target.generation,
            score,
        }
    }

    /// Re-check the current target against the host's bounds after a resize.
    /// Returns `true` if a new target is now on screen.
    pub fn surface_resized(&self) -> bool {
        let mut state = self.shared.lock_state();
        if state.phase != GamePhase::Running {
            log_ignored(Action::Resize, state.phase);
            return false;
        }
        let size = self.shared.surface.size();
        match state.target {
            Some(target) if target.fits(size) => false,
            _ => {
                log::debug!("respawning after resize to {}x{}", size.width, size.height);
                self.shared.spawn(&mut state);
                state.target.is_some()
            }
        }
    }

    pub fn score(&self) -> u64 {
        self.shared.score.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> GamePhase {
        self.shared.lock_state().phase
    }

    /// Snapshot of the target on screen
    pub fn current_target(&self) -> Option<Target> {
        self.shared.lock_state().target
    }

    /// Generation of the latest spawn attempt (0 before the first)
    pub fn generation(&self) -> u64 {
        self.shared.lock_state().generation
    }

    pub fn config(&self) -> EngineConfig {
        self.shared.lock_state().config
    }

    pub fn target_radius(&self) -> u32 {
        self.shared.lock_state().config.target_radius
    }

    /// Radius for the next spawn; clamped to 1..=50
    pub fn set_target_radius(&self, radius: u32) {
        let clamped = clamp_radius(radius);
        if clamped != radius {
            log::debug!("target radius {radius} clamped to {clamped}");
        }
        self.shared.lock_state().config.target_radius = clamped;
    }

    pub fn target_time_millis(&self) -> u32 {
        self.shared.lock_state().config.target_time_millis
    }

    /// Lifetime for the next spawn; clamped to 250..=2000 ms
    pub fn set_target_time_millis(&self, millis: u32) {
        let clamped = clamp_time_millis(millis);
        if clamped != millis {
            log::debug!("target time {millis} ms clamped to {clamped}");
        }
        self.shared.lock_state().config.target_time_millis = clamped;
    }

    pub fn set_miss_policy(&self, policy: MissPolicy) {
        self.shared.lock_state().config.miss_policy = policy;
    }

    pub fn add_score_listener<L: ScoreListener + 'static>(&self, listener: L) -> ListenerId {
        let mut listeners = self.shared.lock_listeners();
        listeners.next_id += 1;
        let id = ListenerId(listeners.next_id);
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if `id` was not registered
    pub fn remove_score_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.lock_listeners();
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        self.stop_game();
        self.shared.scheduler.shutdown();
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the current target and re-arm the timer. Caller holds the lock.
    ///
    /// A surface too small for any target leaves the screen empty, but the
    /// timer is still armed so the next expiration tries again.
    fn spawn(self: &Arc<Self>, state: &mut EngineState) {
        if let Some(handle) = state.timer.take() {
            self.scheduler.cancel(handle);
        }
        state.generation += 1;
        let generation = state.generation;
        let size = self.surface.size();

        state.target = match place(size, state.config.target_radius, &mut state.rng) {
            Ok(placement) => {
                if placement.radius != state.config.target_radius {
                    log::debug!(
                        "radius {} does not fit {}x{}, using {}",
                        state.config.target_radius,
                        size.width,
                        size.height,
                        placement.radius
                    );
                }
                log::debug!(
                    "spawned target {generation} at ({:.1}, {:.1}) r={}",
                    placement.center.x,
                    placement.center.y,
                    placement.radius
                );
                Some(Target {
                    center: placement.center,
                    radius: placement.radius,
                    created_at: Instant::now(),
                    generation,
                })
            }
            Err(err) => {
                log::warn!("spawn {generation} skipped: {err}");
                None
            }
        };

        let weak = Arc::downgrade(self);
        let delay = Duration::from_millis(u64::from(state.config.target_time_millis));
        state.timer = Some(self.scheduler.arm(delay, move |_| {
            if let Some(shared) = weak.upgrade() {
                shared.expire(generation);
            }
        }));
    }

    /// Timeout for the target of `generation`. Returns `true` if it was still
    /// current and got replaced.
    fn expire(self: &Arc<Self>, generation: u64) -> bool {
        let mut state = self.lock_state();
        if state.phase != GamePhase::Running {
            log_ignored(Action::Expire, state.phase);
            return false;
        }
        if state.generation != generation {
            log::trace!(
                "stale expiration {generation} (current {})",
                state.generation
            );
            return false;
        }
        // The timer that brought us here has already fired
        state.timer = None;
        log::debug!("target {generation} expired");

        let score = self.score.load(Ordering::SeqCst);
        let penalized = match state.config.miss_policy {
            MissPolicy::Penalize if score > 0 => {
                self.score.store(score - 1, Ordering::SeqCst);
                true
            }
            _ => false,
        };

        self.spawn(&mut state);
        if penalized {
            let notice = self.notice(&mut state, score - 1);
            drop(state);
            self.deliver(notice);
        }
        true
    }

    /// Stamp a score change and snapshot the listeners. Caller holds the lock.
    fn notice(&self, state: &mut EngineState, score: u64) -> Notice {
        state.score_seq += 1;
        let listeners = self
            .lock_listeners()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        Notice {
            seq: state.score_seq,
            score,
            listeners,
        }
    }

    /// Hand a score change to listeners. Must be called without the state lock.
    ///
    /// Deliveries are serialized; one that lost the race to a newer change is
    /// dropped so listeners never see the score go back in time.
    fn deliver(&self, notice: Notice) {
        let mut delivered = self.delivered.lock().unwrap_or_else(|e| e.into_inner());
        if notice.seq <= *delivered {
            log::trace!("dropping stale score notice {}", notice.seq);
            return;
        }
        *delivered = notice.seq;
        for listener in &notice.listeners {
            listener.on_score_changed(notice.score);
        }
    }
}

/// A score change waiting to be delivered
struct Notice {
    seq: u64,
    score: u64,
    listeners: Vec<Arc<dyn ScoreListener>>,
}

fn log_ignored(action: Action, phase: GamePhase) {
    log::debug!("ignored: {}", GameError::IllegalTransition { action, phase });
}
