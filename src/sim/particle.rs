//! Decaying burst particles

use glam::Vec2;
use rand::Rng;

use crate::consts::{PARTICLE_RADIUS_MAX, PARTICLE_RADIUS_MIN};
use crate::palette::Rgb;

/// Per-step physics applied to a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Added to vertical velocity each step
    pub gravity: f32,
    /// Multiplies both velocity components each step, in (0, 1]
    pub friction: f32,
    /// Subtracted from opacity each step
    pub fade: f32,
}

/// A single point of light after an explosion
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub motion: Motion,
    /// 1.0 at birth, dead at or below zero
    pub opacity: f32,
    pub radius: f32,
}

impl Particle {
    /// Particle at `pos` with a random base radius
    pub fn new<R: Rng + ?Sized>(
        pos: Vec2,
        vel: Vec2,
        color: Rgb,
        motion: Motion,
        rng: &mut R,
    ) -> Self {
        Self {
            pos,
            vel,
            color,
            motion,
            opacity: 1.0,
            radius: rng.random_range(PARTICLE_RADIUS_MIN..PARTICLE_RADIUS_MAX),
        }
    }

    /// Advance one frame (explicit Euler, unit timestep)
    pub fn update(&mut self) {
        self.vel.y += self.motion.gravity;
        self.vel *= self.motion.friction;
        self.pos += self.vel;
        self.opacity -= self.motion.fade;
    }

    pub fn is_dead(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Opacity clamped for drawing
    pub fn alpha(&self) -> f32 {
        self.opacity.max(0.0)
    }
}
