// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

/// Tuning parameters for a [`Rope`](crate::Rope).
///
/// Units are pixels and seconds. The defaults give a fairly stiff rope
/// sampled every 5 px and stepped at 60 Hz.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RopeConfig {
    /// Rest distance between neighbouring points; also the sampling step used
    /// to choose the point count when the chain is generated.
    pub resolution: f64,
    /// Acceleration applied to every free point, in px/s².
    pub gravity: Vec2,
    /// Per-point mass, added to the downward acceleration.
    pub mass: f64,
    /// Velocity retention per step, in `(0, 1]`.
    pub damping: f64,
    /// Constraint relaxation sweeps per step. More sweeps make a stiffer rope.
    pub iterations: usize,
    /// Target fixed timestep in seconds.
    pub frame_interval: f64,
    /// Upper bound on whole frames folded into a single catch-up step.
    pub max_catch_up_frames: u32,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            resolution: 5.0,
            gravity: Vec2::new(0.0, 3000.0),
            mass: 1.0,
            damping: 0.99,
            iterations: 100,
            frame_interval: 1.0 / 60.0,
            max_catch_up_frames: 4,
        }
    }
}

impl RopeConfig {
    /// Sets [`RopeConfig::resolution`].
    #[must_use]
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets [`RopeConfig::gravity`].
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets [`RopeConfig::mass`].
    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Sets [`RopeConfig::damping`], clamped into `(0, 1]`.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.clamp(f64::MIN_POSITIVE, 1.0);
        self
    }

    /// Sets [`RopeConfig::iterations`].
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets [`RopeConfig::frame_interval`].
    #[must_use]
    pub fn with_frame_interval(mut self, seconds: f64) -> Self {
        self.frame_interval = seconds;
        self
    }

    /// Sets [`RopeConfig::max_catch_up_frames`].
    #[must_use]
    pub fn with_max_catch_up_frames(mut self, frames: u32) -> Self {
        self.max_catch_up_frames = frames.max(1);
        self
    }
}
