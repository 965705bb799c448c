//! Burst composition
//!
//! Each rocket carries a [`BurstKind`] that decides which particle groups are
//! emitted when it detonates. The group parameters are data ([`BurstProfile`])
//! so both variants share one emission routine.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{Motion, Particle};
use crate::palette::{Rgb, random_color};

/// Which explosion a rocket produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    /// Single ring in the rocket's own color
    Ring,
    /// Large shell: slow bloom layer plus a fast sparkle layer
    Shell,
}

/// How emission angles are chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spread {
    /// Evenly spaced around the circle, each offset by `U[0, jitter)`
    Even { jitter: f32 },
    /// Uniform over the full circle
    Uniform,
}

/// Where each particle's color comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Inherit,
    Palette,
}

/// Parameters for one particle group
#[derive(Debug, Clone, PartialEq)]
pub struct BurstProfile {
    pub count: Range<usize>,
    pub speed: Range<f32>,
    pub spread: Spread,
    pub gravity: f32,
    pub friction: f32,
    pub fade: Range<f32>,
    /// Multiplier applied to the base particle radius; `None` keeps it
    pub radius_scale: Option<Range<f32>>,
    pub tint: Tint,
}

pub const RING: BurstProfile = BurstProfile {
    count: 60..100,
    speed: 2.0..8.0,
    spread: Spread::Even { jitter: 0.5 },
    gravity: 0.08,
    friction: 0.98,
    fade: 0.015..0.025,
    radius_scale: None,
    tint: Tint::Inherit,
};

/// Shell group A: fewer, larger, slower and longer lived
pub const SHELL_BLOOM: BurstProfile = BurstProfile {
    count: 40..80,
    speed: 1.0..4.0,
    spread: Spread::Uniform,
    gravity: 0.04,
    friction: 0.995,
    fade: 0.006..0.012,
    radius_scale: Some(1.4..2.6),
    tint: Tint::Palette,
};

/// Shell group B: many small fast sparks
pub const SHELL_SPARKLE: BurstProfile = BurstProfile {
    count: 80..160,
    speed: 3.0..9.0,
    spread: Spread::Uniform,
    gravity: 0.06,
    friction: 0.985,
    fade: 0.01..0.03,
    radius_scale: Some(0.6..1.5),
    tint: Tint::Palette,
};

impl BurstKind {
    /// Particle groups emitted by this kind, in emission order
    pub fn profiles(self) -> &'static [BurstProfile] {
        static RING_GROUPS: [BurstProfile; 1] = [RING];
        static SHELL_GROUPS: [BurstProfile; 2] = [SHELL_BLOOM, SHELL_SPARKLE];
        match self {
            BurstKind::Ring => &RING_GROUPS,
            BurstKind::Shell => &SHELL_GROUPS,
        }
    }

    /// Relative loudness of the detonation, before the global scale
    pub fn loudness_range(self) -> Range<f32> {
        match self {
            BurstKind::Ring => 0.8..1.4,
            BurstKind::Shell => 1.2..1.8,
        }
    }

    /// Emit every group at `origin` into `out`
    pub fn compose<R: Rng + ?Sized>(
        self,
        origin: Vec2,
        color: Rgb,
        rng: &mut R,
        out: &mut Vec<Particle>,
    ) {
        for profile in self.profiles() {
            profile.emit(origin, color, rng, out);
        }
    }
}

impl BurstProfile {
    /// Append one group of particles, returns how many were emitted
    pub fn emit<R: Rng + ?Sized>(
        &self,
        origin: Vec2,
        color: Rgb,
        rng: &mut R,
        out: &mut Vec<Particle>,
    ) -> usize {
        let count = rng.random_range(self.count.clone());
        out.reserve(count);

        for i in 0..count {
            let angle = match self.spread {
                Spread::Even { jitter } => {
                    TAU * i as f32 / count as f32 + rng.random_range(0.0..jitter)
                }
                Spread::Uniform => rng.random_range(0.0..TAU),
            };
            let speed = rng.random_range(self.speed.clone());
            let vel = Vec2::from_angle(angle) * speed;
            let tint = match self.tint {
                Tint::Inherit => color,
                Tint::Palette => random_color(rng),
            };
            let motion = Motion {
                gravity: self.gravity,
                friction: self.friction,
                fade: rng.random_range(self.fade.clone()),
            };

            let mut particle = Particle::new(origin, vel, tint, motion, rng);
            if let Some(scale) = &self.radius_scale {
                particle.radius *= rng.random_range(scale.clone());
            }
            out.push(particle);
        }

        count
    }
}
