//! Explosion audio
//!
//! Sounds are synthesized per burst; no external files needed. The engine
//! decides what to play and hands finished [`Voice`] descriptions to an
//! [`AudioSink`]. Sinks:
//! - `WebAudioSink` (wasm32): Web Audio API nodes on the browser audio clock
//! - [`MemorySink`]: records voices, for tests and the headless driver
//! - [`NullSink`]: no output device

pub mod synth;
#[cfg(target_arch = "wasm32")]
pub mod web;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::AudioError;
use crate::settings::Settings;
pub use synth::Voice;
#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

/// Audio output device
///
/// Voices are fire-and-forget: once played, a voice schedules its own stop
/// and the sink keeps no handle to it.
pub trait AudioSink {
    /// Output sample rate, opening the device on first use; `None` when
    /// there is no device
    fn sample_rate(&mut self) -> Option<f32>;

    /// Resume a suspended device; browsers only allow this from a user
    /// gesture
    fn resume(&mut self) -> Result<(), AudioError>;

    fn play(&mut self, voice: &Voice) -> Result<(), AudioError>;
}

/// Sink for environments without audio output
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn sample_rate(&mut self) -> Option<f32> {
        None
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn play(&mut self, _voice: &Voice) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Sink that keeps every voice it is given
#[derive(Debug, Clone)]
pub struct MemorySink {
    sample_rate: f32,
    pub voices: Vec<Voice>,
    pub resumes: u32,
}

impl MemorySink {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            voices: Vec::new(),
            resumes: 0,
        }
    }

    /// Number of explosions heard (three voices each)
    pub fn explosions(&self) -> usize {
        self.voices
            .iter()
            .filter(|v| matches!(v, Voice::Thump(_)))
            .count()
    }
}

impl AudioSink for MemorySink {
    fn sample_rate(&mut self) -> Option<f32> {
        Some(self.sample_rate)
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.resumes += 1;
        Ok(())
    }

    fn play(&mut self, voice: &Voice) -> Result<(), AudioError> {
        self.voices.push(voice.clone());
        Ok(())
    }
}

/// Turns burst loudness into explosion sounds on a sink
pub struct AudioEngine<S: AudioSink> {
    sink: S,
    rng: Pcg32,
    volume: f32,
    loudness_scale: f32,
    hidden_mute: bool,
    warned: bool,
}

impl<S: AudioSink> AudioEngine<S> {
    pub fn new(sink: S, settings: &Settings, loudness_scale: f32, seed: u64) -> Self {
        Self {
            sink,
            rng: Pcg32::seed_from_u64(seed),
            volume: settings.effective_volume(),
            loudness_scale,
            hidden_mute: false,
            warned: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Silence output while the page is hidden
    pub fn set_hidden_mute(&mut self, muted: bool) {
        self.hidden_mute = muted;
    }

    /// Volume a burst of `loudness` would play at right now
    pub fn volume_for(&self, loudness: f32) -> f32 {
        if self.hidden_mute {
            0.0
        } else {
            loudness * self.loudness_scale * self.volume
        }
    }

    /// Open the output device after a user gesture
    pub fn unlock(&mut self) {
        match self.sink.resume() {
            Ok(()) => log::info!("Audio unlocked"),
            Err(e) => self.degrade("unlock", &e),
        }
    }

    /// Play one explosion; failures are logged, never returned
    pub fn detonate(&mut self, loudness: f32) {
        let volume = self.volume_for(loudness);
        if volume <= 0.0 {
            return;
        }
        let Some(sample_rate) = self.sink.sample_rate() else {
            return;
        };

        // Voices are independent; one failing does not silence the others
        for voice in synth::explosion(volume, sample_rate, &mut self.rng) {
            if let Err(e) = self.sink.play(&voice) {
                self.degrade(voice.name(), &e);
            }
        }
    }

    fn degrade(&mut self, what: &str, e: &AudioError) {
        if self.warned {
            log::debug!("{}: {}", what, e);
        } else {
            log::warn!("{}: {} - explosions may be silent", what, e);
            self.warned = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(settings: &Settings) -> AudioEngine<MemorySink> {
        AudioEngine::new(MemorySink::new(8000.0), settings, 0.25, 5)
    }

    #[test]
    fn test_detonation_plays_three_voices() {
        let mut audio = engine(&Settings::default());
        audio.detonate(1.2);
        let names: Vec<_> = audio.sink().voices.iter().map(Voice::name).collect();
        assert_eq!(names, ["noise", "whistle", "thump"]);
        assert_eq!(audio.sink().explosions(), 1);
    }

    #[test]
    fn test_volume_chain() {
        let settings = Settings {
            master_volume: 0.5,
            ..Settings::default()
        };
        let mut audio = engine(&settings);
        assert!((audio.volume_for(1.6) - 0.2).abs() < 1e-6);
        audio.detonate(1.6);
        let Voice::Thump(thump) = &audio.sink().voices[2] else {
            panic!("expected thump");
        };
        assert!((thump.peak_gain - 0.9 * 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_muted_or_hidden_is_silent() {
        let mut audio = engine(&Settings {
            muted: true,
            ..Settings::default()
        });
        audio.detonate(1.0);
        assert!(audio.sink().voices.is_empty());

        audio.apply_settings(&Settings::default());
        audio.set_hidden_mute(true);
        audio.detonate(1.0);
        assert!(audio.sink().voices.is_empty());

        audio.set_hidden_mute(false);
        audio.detonate(1.0);
        assert_eq!(audio.sink().explosions(), 1);
    }

    #[test]
    fn test_unavailable_device_is_silent() {
        let mut audio = AudioEngine::new(NullSink, &Settings::default(), 0.25, 1);
        audio.unlock();
        audio.detonate(1.0);
        audio.detonate(1.0);
        assert!(audio.warned);
    }

    /// Rejects whistles, records everything else
    struct NoWhistleSink(MemorySink);

    impl AudioSink for NoWhistleSink {
        fn sample_rate(&mut self) -> Option<f32> {
            self.0.sample_rate()
        }

        fn resume(&mut self) -> Result<(), AudioError> {
            self.0.resume()
        }

        fn play(&mut self, voice: &Voice) -> Result<(), AudioError> {
            match voice {
                Voice::Whistle(_) => Err(AudioError::Backend("oscillator failed".into())),
                _ => self.0.play(voice),
            }
        }
    }

    #[test]
    fn test_failed_voice_does_not_drop_the_rest() {
        let sink = NoWhistleSink(MemorySink::new(8000.0));
        let mut audio = AudioEngine::new(sink, &Settings::default(), 0.25, 3);
        audio.detonate(1.0);
        let names: Vec<_> = audio.sink().0.voices.iter().map(Voice::name).collect();
        assert_eq!(names, ["noise", "thump"]);
        assert!(audio.warned);
    }

    #[test]
    fn test_unlock_resumes_sink() {
        let mut audio = engine(&Settings::default());
        audio.unlock();
        audio.unlock();
        assert_eq!(audio.sink().resumes, 2);
    }
}
