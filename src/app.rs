//! Per-frame driver
//!
//! Ties the show, its audio and drawing together. Platform code owns the
//! clock, the canvas and the event wiring; everything else happens here.

use crate::audio::{AudioEngine, AudioSink};
use crate::config::ShowConfig;
use crate::error::ConfigError;
use crate::renderer::{Canvas, draw_show};
use crate::settings::Settings;
use crate::sim::{Show, Viewport};

pub struct ShowApp<S: AudioSink> {
    show: Show,
    audio: AudioEngine<S>,
    settings: Settings,
    config: ShowConfig,
    page_hidden: bool,
}

impl<S: AudioSink> ShowApp<S> {
    pub fn new(
        config: ShowConfig,
        settings: Settings,
        sink: S,
        viewport: Viewport,
        now: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let show = Show::new(config.scheduler.clone(), viewport, now, seed)?;
        let audio = AudioEngine::new(
            sink,
            &settings,
            config.loudness_scale,
            seed.wrapping_add(1),
        );
        log::info!(
            "Show started: {}x{}, cycle {} ms, shell every {} ms",
            viewport.width,
            viewport.height,
            config.scheduler.cycle_length_ms,
            config.scheduler.shell_interval_ms
        );
        Ok(Self {
            show,
            audio,
            settings,
            config,
            page_hidden: false,
        })
    }

    pub fn show(&self) -> &Show {
        &self.show
    }

    pub fn audio(&self) -> &AudioEngine<S> {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Step the show, sound this frame's bursts and draw the result
    pub fn frame<C: Canvas>(&mut self, now: f64, canvas: &mut C) {
        self.show.step(now);
        for detonation in self.show.drain_detonations() {
            self.audio.detonate(detonation.loudness);
        }
        draw_show(&self.show, &self.config, self.settings.quality, canvas);
    }

    /// Queue an off-schedule rocket for the next frame
    pub fn launch(&mut self) {
        self.show.request_launch();
    }

    /// A user gesture happened; audio may start now
    pub fn unlock_audio(&mut self) {
        self.audio.unlock();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.show.viewport() {
            log::info!("Resized to {}x{}", viewport.width, viewport.height);
            self.show.resize(viewport);
        }
    }

    pub fn set_page_hidden(&mut self, hidden: bool) {
        self.page_hidden = hidden;
        self.audio
            .set_hidden_mute(hidden && self.settings.mute_on_blur);
    }

    /// Replace the viewer settings and persist them
    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        settings.save();
        self.settings = settings;
        self.set_page_hidden(self.page_hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MemorySink;
    use crate::renderer::VertexCanvas;
    use crate::settings::QualityPreset;

    const VIEW: Viewport = Viewport::new(1024.0, 768.0);
    const FRAME: f64 = 1000.0 / 60.0;

    fn app(settings: Settings) -> ShowApp<MemorySink> {
        ShowApp::new(
            ShowConfig::default(),
            settings,
            MemorySink::new(8000.0),
            VIEW,
            0.0,
            99,
        )
        .unwrap()
    }

    fn run(app: &mut ShowApp<MemorySink>, until: f64) {
        let mut canvas = VertexCanvas::new(VIEW, 6);
        let mut t = 0.0;
        while t < until {
            canvas.clear();
            app.frame(t, &mut canvas);
            t += FRAME;
        }
    }

    #[test]
    fn test_every_detonation_is_heard() {
        let mut app = app(Settings::default());
        run(&mut app, 8_000.0);
        let stats = app.show().stats();
        assert_eq!(stats.rockets_launched, 3);
        assert_eq!(stats.detonations, 3);
        assert_eq!(app.audio().sink().explosions(), 3);
    }

    #[test]
    fn test_frame_draws_fade_first() {
        let mut app = app(Settings::default());
        let mut canvas = VertexCanvas::new(VIEW, 6);
        app.frame(0.0, &mut canvas);
        let first = canvas.vertices()[0];
        assert!((first.color[3] - 0.15).abs() < 1e-6);
        // Fade quad plus the rocket head
        assert_eq!(canvas.vertices().len(), 6 + 18);
    }

    #[test]
    fn test_hidden_page_mutes_when_enabled() {
        let mut app = app(Settings::default());
        app.set_page_hidden(true);
        run(&mut app, 4_000.0);
        assert_eq!(app.show().stats().detonations, 1);
        assert!(app.audio().sink().voices.is_empty());

        app.apply_settings(Settings {
            mute_on_blur: false,
            ..Settings::default()
        });
        assert_eq!(app.audio().volume_for(1.0), 0.25);
    }

    #[test]
    fn test_apply_settings_replaces_quality_and_volume() {
        let mut app = app(Settings::default());
        app.apply_settings(Settings {
            quality: QualityPreset::Low,
            master_volume: 0.5,
            ..Settings::default()
        });
        assert_eq!(app.settings().quality, QualityPreset::Low);
        assert_eq!(app.audio().volume_for(1.0), 0.125);

        app.apply_settings(Settings {
            muted: true,
            ..Settings::default()
        });
        run(&mut app, 4_000.0);
        assert_eq!(app.show().stats().detonations, 1);
        assert!(app.audio().sink().voices.is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ShowConfig {
            background_fade: -1.0,
            ..ShowConfig::default()
        };
        let result = ShowApp::new(
            config,
            Settings::default(),
            MemorySink::new(8000.0),
            VIEW,
            0.0,
            1,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_launch_and_resize() {
        let mut app = app(Settings::default());
        let mut canvas = VertexCanvas::new(VIEW, 6);
        app.frame(0.0, &mut canvas);
        app.launch();
        app.resize(Viewport::new(640.0, 480.0));
        app.frame(FRAME, &mut canvas);
        assert_eq!(app.show().rockets().len(), 2);
        assert_eq!(app.show().viewport(), Viewport::new(640.0, 480.0));
    }
}
