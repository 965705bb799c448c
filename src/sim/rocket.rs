//! Rocket entities: ascent, apex detection and the particle cluster left behind

use glam::Vec2;
use rand::Rng;

use super::burst::BurstKind;
use super::particle::Particle;
use super::trail::Trail;
use crate::consts::*;
use crate::palette::{Rgb, random_color};

/// Drawable area in pixels, origin top-left, y pointing down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero-sized surface cannot host a show
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Rocket lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Rising, leaving a trail
    Ascending,
    /// Burst into particles; dead once they have all faded
    Exploded,
}

/// Emitted once per rocket, on the frame it bursts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub kind: BurstKind,
    pub pos: Vec2,
    /// Relative loudness for the explosion sound, before the show's
    /// loudness scale is applied
    pub loudness: f32,
    pub particles: usize,
}

#[derive(Debug, Clone)]
pub struct Rocket {
    pub kind: BurstKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Burst height (smaller y is higher)
    pub target_y: f32,
    pub color: Rgb,
    phase: Phase,
    trail: Trail<TRAIL_LENGTH>,
    particles: Vec<Particle>,
}

impl Rocket {
    pub fn new(kind: BurstKind, pos: Vec2, vel: Vec2, target_y: f32, color: Rgb) -> Self {
        Self {
            kind,
            pos,
            vel,
            target_y,
            color,
            phase: Phase::Ascending,
            trail: Trail::new(),
            particles: Vec::new(),
        }
    }

    /// Launch from a random point along the bottom edge
    pub fn launch<R: Rng + ?Sized>(kind: BurstKind, viewport: Viewport, rng: &mut R) -> Self {
        let h = viewport.height;
        let x = rng.random_range(0.0..viewport.width);
        let target_y = rng.random_range(h * APEX_BAND_TOP..h * APEX_BAND_BOTTOM);
        let vel = Vec2::new(
            rng.random_range(-ROCKET_DRIFT..ROCKET_DRIFT),
            -rng.random_range(ROCKET_LAUNCH_SPEED_MIN..ROCKET_LAUNCH_SPEED_MAX),
        );
        let color = random_color(rng);
        Self::new(kind, Vec2::new(x, h), vel, target_y, color)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_exploded(&self) -> bool {
        self.phase == Phase::Exploded
    }

    pub fn is_dead(&self) -> bool {
        self.is_exploded() && self.particles.is_empty()
    }

    pub fn trail(&self) -> &Trail<TRAIL_LENGTH> {
        &self.trail
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance one frame; returns the detonation on the frame the rocket bursts
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Detonation> {
        match self.phase {
            Phase::Ascending => {
                self.vel.y += ROCKET_GRAVITY;
                self.vel.x *= ROCKET_DRAG;
                self.pos += self.vel;
                self.trail.push(self.pos);

                // Either condition alone is enough; a slow rocket stalls
                // before its target, a fast one can overshoot it in one frame.
                if self.vel.y >= 0.0 || self.pos.y <= self.target_y {
                    Some(self.explode(rng))
                } else {
                    None
                }
            }
            Phase::Exploded => {
                self.particles.retain_mut(|p| {
                    p.update();
                    !p.is_dead()
                });
                None
            }
        }
    }

    fn explode<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Detonation {
        self.phase = Phase::Exploded;
        self.kind
            .compose(self.pos, self.color, rng, &mut self.particles);

        let loudness = rng.random_range(self.kind.loudness_range());
        log::debug!(
            "{:?} burst at ({:.0}, {:.0}): {} particles, loudness {:.2}",
            self.kind,
            self.pos.x,
            self.pos.y,
            self.particles.len(),
            loudness
        );

        Detonation {
            kind: self.kind,
            pos: self.pos,
            loudness,
            particles: self.particles.len(),
        }
    }
}
