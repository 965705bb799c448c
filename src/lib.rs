//! Skyburst - a procedurally generated fireworks show
//!
//! Core modules:
//! - `sim`: Rockets, particles, burst composition and the spawn scheduler
//! - `audio`: Synthesized explosion sounds behind a pluggable output sink
//! - `renderer`: Canvas abstraction and the WebGPU pipeline behind it
//! - `app`: Per-frame driver tying the show, audio and drawing together
//! - `settings` / `config`: User preferences and show tuning

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod palette;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::ShowApp;
pub use config::ShowConfig;
pub use error::{AudioError, ConfigError, RenderError};
pub use settings::{QualityPreset, Settings};

/// Physics and composition constants
///
/// Units are pixels and frames: the simulation advances one explicit Euler
/// step per animation frame, so velocities are pixels/frame.
pub mod consts {
    /// Gravity added to an ascending rocket's vertical velocity each frame
    pub const ROCKET_GRAVITY: f32 = 0.25;
    /// Horizontal drag applied to an ascending rocket each frame
    pub const ROCKET_DRAG: f32 = 0.98;
    /// Launch speed range (upward, so negated at spawn)
    pub const ROCKET_LAUNCH_SPEED_MIN: f32 = 12.0;
    pub const ROCKET_LAUNCH_SPEED_MAX: f32 = 16.0;
    /// Max horizontal drift at launch (either direction)
    pub const ROCKET_DRIFT: f32 = 1.0;
    /// Apex band as fractions of surface height, measured from the top
    pub const APEX_BAND_TOP: f32 = 0.05;
    pub const APEX_BAND_BOTTOM: f32 = 0.30;

    /// Trail points kept per rocket
    pub const TRAIL_LENGTH: usize = 30;
    /// Trail stroke width in pixels
    pub const TRAIL_WIDTH: f32 = 2.0;
    /// Peak trail alpha (newest segment)
    pub const TRAIL_ALPHA: f32 = 0.8;
    /// Radius of the rocket head while ascending
    pub const ROCKET_HEAD_RADIUS: f32 = 3.0;

    /// Base particle radius range before burst scaling
    pub const PARTICLE_RADIUS_MIN: f32 = 0.5;
    pub const PARTICLE_RADIUS_MAX: f32 = 2.0;

    /// Loudness multiplier applied to every detonation
    pub const LOUDNESS_SCALE: f32 = 0.25;

    /// Cycle timing (milliseconds)
    pub const CYCLE_LENGTH_MS: f64 = 16_000.0;
    pub const SHELL_INTERVAL_MS: f64 = 15_000.0;
    /// Elapsed cycles after which the scheduler resynchronizes instead of catching up
    pub const RESYNC_CYCLES: u32 = 4;

    /// Background fill (rgb 13, 13, 26) and the alpha of the per-frame fade
    pub const BACKGROUND_RGB: [u8; 3] = [13, 13, 26];
    pub const BACKGROUND_FADE: f32 = 0.15;
}
