//! Fireworks simulation
//!
//! Everything here is platform independent and steps once per animation
//! frame:
//! - No rendering or audio calls; detonations are reported as values
//! - Randomness comes from the show's own RNG
//! - The caller supplies a monotonic clock in milliseconds

pub mod burst;
pub mod particle;
pub mod rocket;
pub mod scheduler;
pub mod show;
pub mod trail;

pub use burst::{BurstKind, BurstProfile};
pub use particle::{Motion, Particle};
pub use rocket::{Detonation, Phase, Rocket, Viewport};
pub use scheduler::{CycleSlot, Scheduler, SchedulerConfig, SpawnAction};
pub use show::{Show, ShowStats};
pub use trail::Trail;
