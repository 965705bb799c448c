//! Web Audio API output

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, BiquadFilterType, OscillatorType};

use super::AudioSink;
use super::synth::{NoiseBurst, SILENCE, Thump, Voice, Whistle};
use crate::error::AudioError;

fn js_err(e: JsValue) -> AudioError {
    AudioError::Backend(format!("{:?}", e))
}

/// Plays voices through an `AudioContext`
///
/// The context is created on first use. Browsers keep it suspended until a
/// user gesture resumes it; voices played before that are silent.
#[derive(Default)]
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
    /// Creation failed once; do not retry every burst
    unsupported: bool,
}

impl WebAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Result<&AudioContext, AudioError> {
        if self.ctx.is_none() {
            if self.unsupported {
                return Err(AudioError::Unavailable);
            }
            // May fail outside a secure context
            match AudioContext::new() {
                Ok(ctx) => {
                    log::info!("AudioContext created at {} Hz", ctx.sample_rate());
                    self.ctx = Some(ctx);
                }
                Err(e) => {
                    self.unsupported = true;
                    return Err(js_err(e));
                }
            }
        }
        self.ctx.as_ref().ok_or(AudioError::Unavailable)
    }

    /// Resume a suspended context (browsers suspend until a user gesture)
    fn wake(ctx: &AudioContext) -> Result<(), AudioError> {
        if ctx.state() != AudioContextState::Suspended {
            return Ok(());
        }
        let promise = ctx.resume().map_err(js_err)?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::warn!("AudioContext resume rejected: {:?}", e);
            }
        });
        Ok(())
    }

    fn play_noise(ctx: &AudioContext, noise: &NoiseBurst) -> Result<(), AudioError> {
        let t = ctx.current_time();
        let buffer = ctx
            .create_buffer(1, noise.samples.len() as u32, noise.sample_rate)
            .map_err(js_err)?;
        let mut samples = noise.samples.clone();
        buffer.copy_to_channel(&mut samples, 0).map_err(js_err)?;

        let source = ctx.create_buffer_source().map_err(js_err)?;
        source.set_buffer(Some(&buffer));

        let filter = ctx.create_biquad_filter().map_err(js_err)?;
        filter.set_type(BiquadFilterType::Highpass);
        filter.frequency().set_value(noise.highpass_hz);

        let gain = ctx.create_gain().map_err(js_err)?;
        gain.gain().set_value(noise.gain);

        source.connect_with_audio_node(&filter).map_err(js_err)?;
        filter.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        source.start().map_err(js_err)?;
        source
            .stop_with_when(t + noise.duration as f64)
            .map_err(js_err)?;
        Ok(())
    }

    fn play_whistle(ctx: &AudioContext, whistle: &Whistle) -> Result<(), AudioError> {
        let t = ctx.current_time();
        let osc = ctx.create_oscillator().map_err(js_err)?;
        osc.set_type(OscillatorType::Sawtooth);
        let freq = osc.frequency();
        freq.set_value_at_time(whistle.start_hz, t).map_err(js_err)?;
        freq.exponential_ramp_to_value_at_time(whistle.end_hz, t + whistle.sweep as f64)
            .map_err(js_err)?;

        let filter = ctx.create_biquad_filter().map_err(js_err)?;
        filter.set_type(BiquadFilterType::Bandpass);
        filter.frequency().set_value(whistle.band_hz);
        filter.q().set_value(whistle.q);

        let gain = ctx.create_gain().map_err(js_err)?;
        let level = gain.gain();
        level.set_value_at_time(SILENCE, t).map_err(js_err)?;
        level
            .linear_ramp_to_value_at_time(whistle.peak_gain, t + whistle.attack as f64)
            .map_err(js_err)?;
        level
            .exponential_ramp_to_value_at_time(SILENCE, t + whistle.release_end as f64)
            .map_err(js_err)?;

        osc.connect_with_audio_node(&filter).map_err(js_err)?;
        filter.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        osc.start().map_err(js_err)?;
        osc.stop_with_when(t + whistle.stop as f64).map_err(js_err)?;
        Ok(())
    }

    fn play_thump(ctx: &AudioContext, thump: &Thump) -> Result<(), AudioError> {
        let t = ctx.current_time();
        let osc = ctx.create_oscillator().map_err(js_err)?;
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(thump.freq_hz);

        let gain = ctx.create_gain().map_err(js_err)?;
        let level = gain.gain();
        level.set_value_at_time(thump.start_gain, t).map_err(js_err)?;
        level
            .linear_ramp_to_value_at_time(thump.peak_gain, t + thump.attack as f64)
            .map_err(js_err)?;
        level
            .exponential_ramp_to_value_at_time(thump.floor_gain, t + thump.decay_end as f64)
            .map_err(js_err)?;

        osc.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        osc.start().map_err(js_err)?;
        osc.stop_with_when(t + thump.stop as f64).map_err(js_err)?;
        Ok(())
    }
}

impl AudioSink for WebAudioSink {
    fn sample_rate(&mut self) -> Option<f32> {
        self.context().ok().map(|ctx| ctx.sample_rate())
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        Self::wake(self.context()?)
    }

    fn play(&mut self, voice: &Voice) -> Result<(), AudioError> {
        let ctx = self.context()?;
        Self::wake(ctx)?;
        match voice {
            Voice::Noise(noise) => Self::play_noise(ctx, noise),
            Voice::Whistle(whistle) => Self::play_whistle(ctx, whistle),
            Voice::Thump(thump) => Self::play_thump(ctx, thump),
        }
    }
}
