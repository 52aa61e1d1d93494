//! Target value type and the playing surface it lives on

use std::sync::Mutex;
use std::time::Instant;

use glam::Vec2;

/// Playing surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Radius of the largest circle that fits
    pub fn max_radius(&self) -> u32 {
        self.width.min(self.height) / 2
    }
}

/// Host surface the engine reads its bounds from on every spawn
pub trait HostSurface: Send + Sync {
    fn size(&self) -> SurfaceSize;
}

/// Resizable surface for hosts that push their size instead of being queried
#[derive(Debug)]
pub struct SharedSurface {
    size: Mutex<SurfaceSize>,
}

impl SharedSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Mutex::new(SurfaceSize::new(width, height)),
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut size = self.size.lock().unwrap_or_else(|e| e.into_inner());
        *size = SurfaceSize::new(width, height);
    }
}

impl HostSurface for SharedSurface {
    fn size(&self) -> SurfaceSize {
        *self.size.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HostSurface for SurfaceSize {
    fn size(&self) -> SurfaceSize {
        *self
    }
}

/// One spawned target. Never mutated; a spawn replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub center: Vec2,
    pub radius: u32,
    pub created_at: Instant,
    /// Spawn counter value this target was created under
    pub generation: u64,
}

impl Target {
    /// Whether a point lies on or inside the circle
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= (self.radius as f32).powi(2)
    }

    /// Whether the whole circle lies within `size`
    pub fn fits(&self, size: SurfaceSize) -> bool {
        let r = self.radius as f32;
        let (w, h) = (size.width as f32, size.height as f32);
        self.center.x - r >= 0.0
            && self.center.y - r >= 0.0
            && self.center.x + r <= w
            && self.center.y + r <= h
    }
}
