// Copyright 2025 the Spatia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Vec2};
use spatia_geom::{RectGeometry, vector};

use crate::config::RopeConfig;

/// Upper bound on the number of points in a generated chain.
pub const MAX_POINTS: usize = 4096;

/// Error returned by link edits on a [`Rope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RopeError {
    /// The chain has not been generated yet (no anchors were supplied).
    NotGenerated,
    /// The link index does not name a link between two existing points.
    IndexOutOfRange {
        /// The requested link index.
        index: usize,
        /// Number of links in the chain (`points - 1`).
        links: usize,
    },
}

impl fmt::Display for RopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotGenerated => write!(f, "rope has not been generated"),
            Self::IndexOutOfRange { index, links } => {
                write!(f, "link {index} out of range for rope with {links} links")
            }
        }
    }
}

impl core::error::Error for RopeError {}

/// Lifecycle of a [`Rope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RopeState {
    /// No anchors seen yet; there are no points.
    #[default]
    Uninitialized,
    /// The chain exists but has not been stepped.
    Generated,
    /// At least one simulation step has run.
    Running,
}

/// A simulated mass point in the chain.
///
/// Neighbours are referenced by index into the rope's point array; a missing
/// neighbour means the chain ends (or was cut) there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopePoint {
    /// Current position.
    pub pos: Point,
    /// Position at the previous step.
    pub old_pos: Point,
    /// Displacement over the previous step.
    pub velocity: Vec2,
    /// Mass, added to the downward acceleration.
    pub mass: f64,
    /// Velocity retention in `(0, 1]`.
    pub damping: f64,
    /// Rest length of the link to the next point.
    pub distance_to_next: f64,
    /// Pinned points are never moved by the simulation.
    pub is_fixed: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

impl RopePoint {
    /// Index of the previous linked point, if any.
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    /// Index of the next linked point, if any.
    pub fn next(&self) -> Option<usize> {
        self.next
    }
}

/// A chain of point masses hanging between two externally driven anchors.
///
/// The chain is generated the first time both anchors are known, with one
/// point every [`RopeConfig::resolution`] pixels and both ends pinned. Later
/// anchor updates only move the two end points; the interior evolves through
/// Störmer–Verlet integration followed by iterative distance-constraint
/// relaxation.
///
/// ```
/// use kurbo::Point;
/// use spatia_rope::{Rope, RopeConfig, RopeState};
///
/// let mut rope = Rope::new(RopeConfig::default());
/// rope.set_anchors(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
/// assert_eq!(rope.len(), 20);
///
/// // Feed wall-clock time; a step runs once a full frame has accumulated.
/// assert!(rope.advance(1.0 / 30.0));
/// assert_eq!(rope.state(), RopeState::Running);
/// assert_eq!(rope.points()[0].pos, Point::new(0.0, 0.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Rope {
    config: RopeConfig,
    points: Vec<RopePoint>,
    state: RopeState,
    accumulator: f64,
    previous_dt: f64,
}

impl Rope {
    /// Creates an empty rope; the chain is generated on the first anchor update.
    pub fn new(config: RopeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    /// Replaces the configuration. Existing points keep their rest lengths.
    pub fn set_config(&mut self, config: RopeConfig) {
        self.config = config;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RopeState {
        self.state
    }

    /// All points, in chain order.
    pub fn points(&self) -> &[RopePoint] {
        &self.points
    }

    /// Mutable access to the points, for external perturbation or pinning.
    pub fn points_mut(&mut self) -> &mut [RopePoint] {
        &mut self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` before the chain has been generated.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Wall-clock time carried over towards the next step.
    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    /// Supplies this frame's anchor positions.
    ///
    /// The first call generates the chain; subsequent calls only move the two
    /// end points.
    pub fn set_anchors(&mut self, start: Point, end: Point) {
        if self.state == RopeState::Uninitialized {
            self.generate(start, end);
            return;
        }
        if let Some(first) = self.points.first_mut() {
            first.pos = start;
            first.old_pos = start;
        }
        if let Some(last) = self.points.last_mut() {
            last.pos = end;
            last.old_pos = end;
        }
    }

    /// Anchors the rope between the centres of two rectangles.
    pub fn set_anchor_rects(&mut self, start: &impl RectGeometry, end: &impl RectGeometry) {
        self.set_anchors(start.center(), end.center());
    }

    /// Discards the chain; the next anchor update regenerates it.
    pub fn reset(&mut self) {
        self.points.clear();
        self.state = RopeState::Uninitialized;
        self.accumulator = 0.0;
        self.previous_dt = 0.0;
    }

    /// Builds a fresh chain from `start` to `end`.
    ///
    /// The point count is `floor(distance / resolution)`, clamped to
    /// `2..=MAX_POINTS`. A non-finite span gets two points and diverges through
    /// integration. Points are spread evenly along the segment and both ends
    /// are pinned.
    pub fn generate(&mut self, start: Point, end: Point) {
        let resolution = self.config.resolution;
        let distance = vector::distance(start, end);
        let count = if resolution > 0.0 && distance.is_finite() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "floor of a finite, non-negative ratio; saturates before the clamp"
            )]
            let n = (distance / resolution).floor() as usize;
            n.clamp(2, MAX_POINTS)
        } else {
            2
        };

        self.points.clear();
        self.points.reserve(count);
        let last = count - 1;
        for i in 0..count {
            let t = i as f64 / last as f64;
            let pos = vector::lerp(start, end, t);
            self.points.push(RopePoint {
                pos,
                old_pos: pos,
                velocity: Vec2::ZERO,
                mass: self.config.mass,
                damping: self.config.damping,
                distance_to_next: if i < last { resolution } else { 0.0 },
                is_fixed: i == 0 || i == last,
                prev: i.checked_sub(1),
                next: (i < last).then_some(i + 1),
            });
        }
        self.state = RopeState::Generated;
        self.accumulator = 0.0;
        self.previous_dt = 0.0;
        log::debug!(
            "generated rope with {count} points over {distance:.1}px (resolution {resolution})"
        );
    }

    /// Feeds elapsed wall-clock seconds into the fixed-timestep accumulator.
    ///
    /// Once at least one [`RopeConfig::frame_interval`] has accumulated, a single
    /// step runs covering every whole frame (capped at
    /// [`RopeConfig::max_catch_up_frames`]); the fractional remainder carries
    /// over. Returns `true` if a step ran.
    pub fn advance(&mut self, elapsed: f64) -> bool {
        if self.state == RopeState::Uninitialized || !elapsed.is_finite() || elapsed <= 0.0 {
            return false;
        }
        let interval = self.config.frame_interval;
        if interval.is_nan() || interval <= 0.0 {
            return false;
        }
        self.accumulator += elapsed;
        if self.accumulator < interval {
            return false;
        }
        let frames = (self.accumulator / interval).floor();
        self.accumulator -= frames * interval;
        let frames = frames.min(f64::from(self.config.max_catch_up_frames.max(1)));
        self.step(frames * interval);
        true
    }

    /// Runs one integration step of `dt` seconds followed by full constraint relaxation.
    ///
    /// Relaxation for this step always completes before the next integration.
    pub fn step(&mut self, dt: f64) {
        if self.points.is_empty() {
            return;
        }
        self.integrate(dt);
        self.relax();
        self.previous_dt = dt;
        self.state = RopeState::Running;
    }

    /// Störmer–Verlet integration of every free point.
    ///
    /// The carried velocity is scaled by `dt / previous_dt` (zero on the first
    /// step), which damps the effect of a sudden long frame.
    pub fn integrate(&mut self, dt: f64) {
        let time_correction = if self.previous_dt > 0.0 {
            dt / self.previous_dt
        } else {
            0.0
        };
        let gravity = self.config.gravity;
        let dt2 = dt * dt;
        for p in &mut self.points {
            if p.is_fixed {
                p.velocity = Vec2::ZERO;
                p.old_pos = p.pos;
                continue;
            }
            let velocity = p.pos - p.old_pos;
            p.velocity = velocity;
            p.old_pos = p.pos;
            let accel = gravity + Vec2::new(0.0, p.mass);
            p.pos += velocity * (time_correction * p.damping) + accel * dt2;
        }
    }

    /// Runs [`RopeConfig::iterations`] relaxation sweeps.
    pub fn relax(&mut self) {
        for _ in 0..self.config.iterations {
            self.relax_once();
        }
    }

    /// One Gauss–Seidel sweep over every link.
    ///
    /// Each point relaxes towards its `next` neighbour and then its `prev`
    /// neighbour, so corrections travel along the chain in both directions
    /// within a single sweep.
    pub fn relax_once(&mut self) {
        for i in 0..self.points.len() {
            if let Some(next) = self.points[i].next {
                self.satisfy(i, next);
            }
            if let Some(prev) = self.points[i].prev {
                self.satisfy(prev, i);
            }
        }
    }

    /// Pushes `a` and `b` (where `b` follows `a`) towards their rest distance.
    ///
    /// Each free end moves a quarter of the length error.
    fn satisfy(&mut self, a: usize, b: usize) {
        let rest = self.points[a].distance_to_next;
        let delta = self.points[b].pos - self.points[a].pos;
        let length = delta.hypot();
        if !length.is_finite() || length <= 0.0 {
            return;
        }
        let offset = delta * ((length - rest) * 0.25 / length);
        if !self.points[a].is_fixed {
            self.points[a].pos += offset;
        }
        if !self.points[b].is_fixed {
            self.points[b].pos -= offset;
        }
    }

    /// Sum of squared deviations from rest length over every intact link.
    pub fn total_constraint_error(&self) -> f64 {
        self.points
            .iter()
            .filter_map(|p| {
                let next = &self.points[p.next?];
                let err = (next.pos - p.pos).hypot() - p.distance_to_next;
                Some(err * err)
            })
            .sum()
    }

    fn check_link(&self, index: usize) -> Result<(), RopeError> {
        if self.points.is_empty() {
            return Err(RopeError::NotGenerated);
        }
        let links = self.points.len() - 1;
        if index >= links {
            return Err(RopeError::IndexOutOfRange { index, links });
        }
        Ok(())
    }

    /// Severs the link between point `index` and point `index + 1`.
    ///
    /// Both halves keep simulating; a half whose end is not pinned hangs free.
    pub fn cut(&mut self, index: usize) -> Result<(), RopeError> {
        self.check_link(index)?;
        self.points[index].next = None;
        self.points[index + 1].prev = None;
        Ok(())
    }

    /// Restores the link between point `index` and point `index + 1`.
    pub fn mend(&mut self, index: usize) -> Result<(), RopeError> {
        self.check_link(index)?;
        self.points[index].next = Some(index + 1);
        self.points[index + 1].prev = Some(index);
        Ok(())
    }

    /// Returns `true` if the link after point `index` is currently severed.
    pub fn is_cut(&self, index: usize) -> Result<bool, RopeError> {
        self.check_link(index)?;
        Ok(self.points[index].next.is_none())
    }

    /// Positions of all points, in chain order.
    pub fn polyline(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(|p| p.pos)
    }

    /// Positions grouped into connected runs, split wherever the chain is cut.
    pub fn segments(&self) -> Vec<Vec<Point>> {
        let mut segments = Vec::new();
        for (start, p) in self.points.iter().enumerate() {
            if p.prev.is_some() {
                continue;
            }
            let mut run = Vec::new();
            let mut cursor = Some(start);
            while let Some(i) = cursor {
                run.push(self.points[i].pos);
                cursor = self.points[i].next;
            }
            segments.push(run);
        }
        segments
    }

    /// Polyline path through every connected run, for rendering.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for run in self.segments() {
            let mut iter = run.into_iter();
            if let Some(first) = iter.next() {
                path.move_to(first);
                for p in iter {
                    path.line_to(p);
                }
            }
        }
        path
    }
}
