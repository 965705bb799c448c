//! Explosion sound design
//!
//! An explosion is three independent voices: a sizzling noise burst, a
//! short rising whistle and a sub-bass thump. This module only decides what
//! each voice sounds like; an [`super::AudioSink`] turns them into sound.
//! All times are seconds relative to the moment the voice starts.

use rand::Rng;

/// Floor used for exponential gain ramps, which cannot reach zero
pub const SILENCE: f32 = 0.0001;

/// Decaying white noise through a high-pass filter
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBurst {
    pub sample_rate: f32,
    /// Mono samples, already shaped by the decay envelope
    pub samples: Vec<f32>,
    pub duration: f32,
    pub highpass_hz: f32,
    pub gain: f32,
}

/// Sawtooth chirp through a band-pass filter
#[derive(Debug, Clone, PartialEq)]
pub struct Whistle {
    pub start_hz: f32,
    pub end_hz: f32,
    /// Time to sweep from `start_hz` to `end_hz`
    pub sweep: f32,
    pub peak_gain: f32,
    pub attack: f32,
    /// When the exponential release reaches [`SILENCE`]
    pub release_end: f32,
    pub stop: f32,
    pub band_hz: f32,
    pub q: f32,
}

/// Low sine pulse
#[derive(Debug, Clone, PartialEq)]
pub struct Thump {
    pub freq_hz: f32,
    pub start_gain: f32,
    pub peak_gain: f32,
    pub attack: f32,
    pub floor_gain: f32,
    /// When the exponential decay reaches `floor_gain`
    pub decay_end: f32,
    pub stop: f32,
}

/// One self-terminating sound
#[derive(Debug, Clone, PartialEq)]
pub enum Voice {
    Noise(NoiseBurst),
    Whistle(Whistle),
    Thump(Thump),
}

impl Voice {
    pub fn name(&self) -> &'static str {
        match self {
            Voice::Noise(_) => "noise",
            Voice::Whistle(_) => "whistle",
            Voice::Thump(_) => "thump",
        }
    }
}

/// Value of an exponential ramp from `from` at `t0` to `to` at `t1`
fn exp_ramp(from: f32, to: f32, t0: f32, t1: f32, t: f32) -> f32 {
    if t <= t0 {
        return from;
    }
    if t >= t1 {
        return to;
    }
    from * (to / from).powf((t - t0) / (t1 - t0))
}

/// Value of a linear ramp from `from` at `t0` to `to` at `t1`
fn lin_ramp(from: f32, to: f32, t0: f32, t1: f32, t: f32) -> f32 {
    if t <= t0 {
        return from;
    }
    if t >= t1 {
        return to;
    }
    from + (to - from) * (t - t0) / (t1 - t0)
}

impl NoiseBurst {
    /// Noise amplitude envelope: `(1 - t/d)^2.5`
    pub fn envelope(t: f32, duration: f32) -> f32 {
        (1.0 - t / duration).clamp(0.0, 1.0).powf(2.5)
    }

    pub fn new<R: Rng + ?Sized>(volume: f32, sample_rate: f32, rng: &mut R) -> Self {
        let duration = rng.random_range(1.0..1.6);
        let len = (sample_rate * duration) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate;
                let white = rng.random_range(-1.0f32..1.0);
                white * Self::envelope(t, duration) * rng.random_range(0.6..1.0)
            })
            .collect();

        Self {
            sample_rate,
            samples,
            duration,
            highpass_hz: rng.random_range(1200.0..2400.0),
            gain: volume * 0.6,
        }
    }
}

impl Whistle {
    pub fn new<R: Rng + ?Sized>(volume: f32, rng: &mut R) -> Self {
        let start_hz = rng.random_range(800.0..1200.0);
        let end_hz = rng.random_range(3000.0..6000.0);
        Self {
            start_hz,
            end_hz,
            sweep: 0.08,
            peak_gain: volume * 0.06,
            attack: 0.01,
            release_end: rng.random_range(0.18..0.26),
            stop: rng.random_range(0.22..0.28),
            band_hz: (start_hz + end_hz) / 2.0,
            q: 6.0,
        }
    }

    /// Instantaneous pitch, holding at `end_hz` after the sweep
    pub fn frequency_at(&self, t: f32) -> f32 {
        exp_ramp(self.start_hz, self.end_hz, 0.0, self.sweep, t)
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        if t <= self.attack {
            lin_ramp(SILENCE, self.peak_gain, 0.0, self.attack, t)
        } else {
            exp_ramp(self.peak_gain, SILENCE, self.attack, self.release_end, t)
        }
    }
}

impl Thump {
    pub fn new<R: Rng + ?Sized>(volume: f32, rng: &mut R) -> Self {
        Self {
            freq_hz: rng.random_range(60.0..120.0),
            start_gain: volume * 0.001,
            peak_gain: volume * 0.9,
            attack: 0.02,
            floor_gain: 0.001,
            decay_end: rng.random_range(0.6..0.9),
            stop: 0.8,
        }
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        if t <= self.attack {
            lin_ramp(self.start_gain, self.peak_gain, 0.0, self.attack, t)
        } else {
            exp_ramp(self.peak_gain, self.floor_gain, self.attack, self.decay_end, t)
        }
    }
}

/// The three voices of one explosion at `volume`
pub fn explosion<R: Rng + ?Sized>(volume: f32, sample_rate: f32, rng: &mut R) -> [Voice; 3] {
    [
        Voice::Noise(NoiseBurst::new(volume, sample_rate, rng)),
        Voice::Whistle(Whistle::new(volume, rng)),
        Voice::Thump(Thump::new(volume, rng)),
    ]
}
