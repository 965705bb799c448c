//! The live show: owns every rocket and advances them once per frame

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::burst::BurstKind;
use super::rocket::{Detonation, Rocket, Viewport};
use super::scheduler::{Scheduler, SchedulerConfig, SpawnAction};
use crate::error::ConfigError;

/// Running totals since the show started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShowStats {
    pub rockets_launched: u64,
    pub shells_launched: u64,
    pub detonations: u64,
    pub frames: u64,
}

/// Frame-stepped fireworks show
///
/// Only [`Show::step`] mutates the rocket list. Requests from outside (an
/// instant launch, a resize) are recorded and applied on the next step.
pub struct Show {
    rockets: Vec<Rocket>,
    scheduler: Scheduler,
    viewport: Viewport,
    rng: Pcg32,
    pending_launches: u32,
    detonations: Vec<Detonation>,
    stats: ShowStats,
}

impl Show {
    /// Show starting its first cycle at `now` (ms)
    pub fn new(
        config: SchedulerConfig,
        viewport: Viewport,
        now: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            rockets: Vec::new(),
            scheduler: Scheduler::new(config, now)?,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            pending_launches: 0,
            detonations: Vec::new(),
            stats: ShowStats::default(),
        })
    }

    /// Live rockets, in launch order
    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> ShowStats {
        self.stats
    }

    pub fn particle_count(&self) -> usize {
        self.rockets.iter().map(|r| r.particles().len()).sum()
    }

    /// Launch one ordinary rocket on the next frame, outside the schedule
    pub fn request_launch(&mut self) {
        self.pending_launches = self.pending_launches.saturating_add(1);
    }

    /// Surface size changed; rockets already in flight keep their positions
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Advance one frame at time `now` (ms, monotonic)
    ///
    /// Detonations from this frame are available from
    /// [`Show::drain_detonations`] until the next step.
    pub fn step(&mut self, now: f64) {
        self.detonations.clear();

        self.stats.frames += 1;

        // No surface to launch into; queued launches wait, rockets in flight keep moving
        if !self.viewport.is_empty() {
            for action in self.scheduler.poll(now) {
                match action {
                    SpawnAction::Salvo(count) => {
                        for _ in 0..count {
                            self.launch(BurstKind::Ring);
                        }
                    }
                    SpawnAction::Shell => self.launch(BurstKind::Shell),
                }
            }
            for _ in 0..std::mem::take(&mut self.pending_launches) {
                self.launch(BurstKind::Ring);
            }
        }

        for rocket in &mut self.rockets {
            if let Some(detonation) = rocket.update(&mut self.rng) {
                self.stats.detonations += 1;
                self.detonations.push(detonation);
            }
        }
        self.rockets.retain(|r| !r.is_dead());
    }

    /// Detonations from the most recent step
    pub fn drain_detonations(&mut self) -> std::vec::Drain<'_, Detonation> {
        self.detonations.drain(..)
    }

    fn launch(&mut self, kind: BurstKind) {
        self.rockets
            .push(Rocket::launch(kind, self.viewport, &mut self.rng));
        match kind {
            BurstKind::Ring => self.stats.rockets_launched += 1,
            BurstKind::Shell => self.stats.shells_launched += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CYCLE_LENGTH_MS, SHELL_INTERVAL_MS};

    const VIEW: Viewport = Viewport::new(1280.0, 720.0);
    const FRAME: f64 = 1000.0 / 60.0;

    fn show(config: SchedulerConfig) -> Show {
        Show::new(config, VIEW, 0.0, 1234).unwrap()
    }

    fn shells_alive(show: &Show) -> usize {
        show.rockets()
            .iter()
            .filter(|r| r.kind == BurstKind::Shell)
            .count()
    }

    #[test]
    fn test_first_frame_launches_single_rocket() {
        let mut show = show(SchedulerConfig::default());
        show.step(0.0);
        assert_eq!(show.rockets().len(), 1);
        assert_eq!(show.rockets()[0].kind, BurstKind::Ring);
        assert_eq!(show.stats().rockets_launched, 1);
    }

    #[test]
    fn test_shell_interval_yields_exactly_one_shell() {
        let mut show = show(SchedulerConfig::default());
        let mut t = 0.0;
        while t < SHELL_INTERVAL_MS {
            show.step(t);
            t += FRAME;
        }
        assert_eq!(show.stats().shells_launched, 0);
        show.step(SHELL_INTERVAL_MS);
        assert_eq!(show.stats().shells_launched, 1);
        assert_eq!(shells_alive(&show), 1);
        show.step(SHELL_INTERVAL_MS + FRAME);
        assert_eq!(show.stats().shells_launched, 1);
    }

    #[test]
    fn test_full_cycle_launch_counts() {
        let config = SchedulerConfig {
            shell_interval_ms: 1.0e12,
            ..Default::default()
        };
        let mut show = show(config);
        let mut t = 0.0;
        while t < CYCLE_LENGTH_MS {
            show.step(t);
            t += FRAME;
        }
        assert_eq!(show.stats().rockets_launched, 6);
    }

    #[test]
    fn test_request_launch_applies_on_next_step() {
        let mut show = show(SchedulerConfig::default());
        show.step(0.0);
        show.request_launch();
        show.request_launch();
        assert_eq!(show.rockets().len(), 1);
        show.step(FRAME);
        assert_eq!(show.rockets().len(), 3);
        assert_eq!(show.stats().rockets_launched, 3);
    }

    #[test]
    fn test_detonations_are_reported_for_their_frame() {
        let mut show = show(SchedulerConfig::default());
        let mut t = 0.0;
        let mut seen = 0;
        // A rocket reaches its apex within a couple of seconds
        while t < 3_000.0 {
            show.step(t);
            let n = show.drain_detonations().count();
            if n > 0 {
                assert!(show.particle_count() >= 60);
            }
            seen += n;
            t += FRAME;
        }
        assert_eq!(seen, 1);
        assert_eq!(show.stats().detonations, 1);
    }

    #[test]
    fn test_dead_rockets_are_pruned() {
        let config = SchedulerConfig {
            shell_interval_ms: 1.0e12,
            ..Default::default()
        };
        let mut show = show(config);
        let mut t = 0.0;
        // Past the first rocket's burst and fade, before the second slot
        while t < 4_900.0 {
            show.step(t);
            t += FRAME;
        }
        assert!(show.rockets().is_empty());
        assert_eq!(show.particle_count(), 0);
    }

    #[test]
    fn test_empty_viewport_launches_nothing() {
        let mut show = Show::new(
            SchedulerConfig::default(),
            Viewport::new(0.0, 0.0),
            0.0,
            1,
        )
        .unwrap();
        show.request_launch();
        show.step(0.0);
        assert!(show.rockets().is_empty());
        assert_eq!(show.stats().rockets_launched, 0);

        show.resize(VIEW);
        show.step(FRAME);
        // Offset-0 salvo plus the queued request
        assert_eq!(show.rockets().len(), 2);
    }

    #[test]
    fn test_rockets_in_flight_keep_moving_without_surface() {
        let mut show = show(SchedulerConfig::default());
        show.step(0.0);
        let start = show.rockets()[0].pos;

        show.resize(Viewport::new(0.0, 0.0));
        show.request_launch();
        show.step(FRAME);
        assert_eq!(show.rockets().len(), 1);
        assert!(show.rockets()[0].pos.y < start.y);

        let mut t = 2.0 * FRAME;
        while show.stats().detonations == 0 && t < 3_000.0 {
            show.step(t);
            t += FRAME;
        }
        assert_eq!(show.stats().detonations, 1);
        assert_eq!(show.stats().rockets_launched, 1);
    }

    #[test]
    fn test_background_gap_does_not_burst_backlog() {
        let mut show = show(SchedulerConfig::default());
        show.step(0.0);
        let launched = show.stats().rockets_launched;
        // Tab hidden for ten cycles
        show.step(10.0 * CYCLE_LENGTH_MS);
        assert_eq!(show.stats().rockets_launched - launched, 1);
        assert_eq!(show.stats().shells_launched, 1);
    }
}
