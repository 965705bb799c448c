//! Firework colors

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An sRGB color as stored in the palette and config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Normalized RGBA for vertex colors
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }
}

/// Warm reds, golds and pinks
pub const FIREWORK_COLORS: [Rgb; 13] = [
    Rgb(0xff, 0x1a, 0x1a),
    Rgb(0xff, 0x4d, 0x4d),
    Rgb(0xff, 0x8c, 0x00),
    Rgb(0xff, 0xd7, 0x00),
    Rgb(0xff, 0x66, 0xb2),
    Rgb(0xff, 0x66, 0xcc),
    Rgb(0xff, 0xcc, 0x66),
    Rgb(0xff, 0x33, 0x66),
    Rgb(0xff, 0x00, 0x77),
    Rgb(0xff, 0xb6, 0xc1),
    Rgb(0xff, 0x45, 0x00),
    Rgb(0xff, 0x2d, 0x2d),
    Rgb(0xff, 0x8d, 0xa1),
];

/// Uniformly random palette entry
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    FIREWORK_COLORS[rng.random_range(0..FIREWORK_COLORS.len())]
}
