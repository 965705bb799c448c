//! Cycle-based spawn scheduling
//!
//! Ordinary salvos fire at fixed offsets inside a repeating cycle, at most
//! once per offset per cycle. Shells run on their own independent interval.
//! Times are milliseconds from a monotonic clock (the animation-frame
//! timestamp in the browser).

use serde::{Deserialize, Serialize};

use crate::consts::{CYCLE_LENGTH_MS, RESYNC_CYCLES, SHELL_INTERVAL_MS};
use crate::error::ConfigError;

/// One salvo inside the cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleSlot {
    /// Offset from the start of the cycle
    pub offset_ms: f64,
    /// Rockets launched together when the slot fires
    pub rockets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub cycle_length_ms: f64,
    /// Ascending by offset, each offset inside the cycle
    pub slots: Vec<CycleSlot>,
    pub shell_interval_ms: f64,
    /// A gap longer than this many cycles drops the backlog and restarts the cycle
    pub resync_cycles: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycle_length_ms: CYCLE_LENGTH_MS,
            slots: vec![
                CycleSlot {
                    offset_ms: 0.0,
                    rockets: 1,
                },
                CycleSlot {
                    offset_ms: 5_000.0,
                    rockets: 2,
                },
                CycleSlot {
                    offset_ms: 15_000.0,
                    rockets: 3,
                },
            ],
            shell_interval_ms: SHELL_INTERVAL_MS,
            resync_cycles: RESYNC_CYCLES,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cycle_length_ms > 0.0) {
            return Err(ConfigError::invalid("cycle_length_ms must be positive"));
        }
        if !(self.shell_interval_ms > 0.0) {
            return Err(ConfigError::invalid("shell_interval_ms must be positive"));
        }
        if self.resync_cycles == 0 {
            return Err(ConfigError::invalid("resync_cycles must be at least 1"));
        }
        let mut previous = f64::NEG_INFINITY;
        for slot in &self.slots {
            if !(slot.offset_ms >= 0.0 && slot.offset_ms < self.cycle_length_ms) {
                return Err(ConfigError::invalid(format!(
                    "slot offset {} ms is outside the {} ms cycle",
                    slot.offset_ms, self.cycle_length_ms
                )));
            }
            if slot.offset_ms < previous {
                return Err(ConfigError::invalid("slot offsets must be ascending"));
            }
            previous = slot.offset_ms;
        }
        Ok(())
    }
}

/// What the show should launch this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnAction {
    /// Ordinary rockets launched together
    Salvo(u32),
    Shell,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    cycle_start: f64,
    fired: Vec<bool>,
    last_shell: f64,
}

impl Scheduler {
    /// Start a cycle at `now`; the first shell is due one interval later
    pub fn new(config: SchedulerConfig, now: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let fired = vec![false; config.slots.len()];
        Ok(Self {
            config,
            cycle_start: now,
            fired,
            last_shell: now,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn cycle_start(&self) -> f64 {
        self.cycle_start
    }

    /// Spawns due at `now`, in slot order with any shell last
    pub fn poll(&mut self, now: f64) -> Vec<SpawnAction> {
        let cycle = self.config.cycle_length_ms;
        let mut actions = Vec::new();

        if now - self.cycle_start > cycle * self.config.resync_cycles as f64 {
            log::debug!(
                "Scheduler resync after {:.0} ms gap",
                now - self.cycle_start
            );
            self.restart_cycle(now);
        }

        let elapsed = now - self.cycle_start;
        if elapsed >= cycle {
            let whole_cycles = (elapsed / cycle).floor();
            self.restart_cycle(self.cycle_start + cycle * whole_cycles);
        }

        let elapsed = now - self.cycle_start;
        for (slot, fired) in self.config.slots.iter().zip(self.fired.iter_mut()) {
            if !*fired && elapsed >= slot.offset_ms {
                *fired = true;
                actions.push(SpawnAction::Salvo(slot.rockets));
            }
        }

        if now - self.last_shell >= self.config.shell_interval_ms {
            self.last_shell = now;
            actions.push(SpawnAction::Shell);
        }

        actions
    }

    fn restart_cycle(&mut self, start: f64) {
        self.cycle_start = start;
        self.fired.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: f64 = 1000.0 / 60.0;

    fn salvos(actions: &[SpawnAction]) -> Vec<u32> {
        actions
            .iter()
            .filter_map(|a| match a {
                SpawnAction::Salvo(n) => Some(*n),
                SpawnAction::Shell => None,
            })
            .collect()
    }

    fn shells(actions: &[SpawnAction]) -> usize {
        actions.iter().filter(|a| **a == SpawnAction::Shell).count()
    }

    /// Scheduler whose shells never interfere
    fn salvo_only(start: f64) -> Scheduler {
        let config = SchedulerConfig {
            shell_interval_ms: 1.0e12,
            ..Default::default()
        };
        Scheduler::new(config, start).unwrap()
    }

    #[test]
    fn test_one_cycle_fires_each_slot_once_in_order() {
        let mut scheduler = salvo_only(1000.0);
        let mut fired = Vec::new();
        let mut t = 1000.0;
        while t < 1000.0 + CYCLE_LENGTH_MS {
            fired.extend(salvos(&scheduler.poll(t)));
            t += FRAME;
        }
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_next_cycle_fires_again() {
        let mut scheduler = salvo_only(0.0);
        let mut fired = Vec::new();
        let mut t = 0.0;
        while t < 2.0 * CYCLE_LENGTH_MS {
            fired.extend(salvos(&scheduler.poll(t)));
            t += FRAME;
        }
        assert_eq!(fired, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_late_frame_fires_all_due_slots() {
        let mut scheduler = salvo_only(0.0);
        assert_eq!(salvos(&scheduler.poll(0.0)), vec![1]);
        // A single frame landing past both remaining offsets
        assert_eq!(salvos(&scheduler.poll(15_500.0)), vec![2, 3]);
        assert!(scheduler.poll(15_600.0).is_empty());
    }

    #[test]
    fn test_catch_up_advances_by_whole_cycles() {
        let mut scheduler = salvo_only(0.0);
        scheduler.poll(0.0);
        // 3.5 cycles later: below the resync threshold, so the anchor
        // moves forward by exactly three cycles.
        let now = 3.5 * CYCLE_LENGTH_MS;
        let fired = salvos(&scheduler.poll(now));
        assert_eq!(scheduler.cycle_start(), 3.0 * CYCLE_LENGTH_MS);
        // 8 s into the new cycle: the first two slots are due
        assert_eq!(fired, vec![1, 2]);
    }

    #[test]
    fn test_resync_after_long_gap_drops_backlog() {
        let mut scheduler = salvo_only(0.0);
        scheduler.poll(0.0);
        let now = 4.0 * CYCLE_LENGTH_MS + 7_777.0;
        let fired = salvos(&scheduler.poll(now));
        assert_eq!(scheduler.cycle_start(), now);
        // Only the slot at offset 0 is due right after the resync
        assert_eq!(fired, vec![1]);
        assert!(scheduler.poll(now + FRAME).is_empty());
    }

    #[test]
    fn test_huge_clock_jump_is_constant_time() {
        let mut scheduler = salvo_only(0.0);
        let fired = salvos(&scheduler.poll(1.0e15));
        assert_eq!(fired, vec![1]);
        assert_eq!(scheduler.cycle_start(), 1.0e15);
    }

    #[test]
    fn test_shell_fires_once_per_interval() {
        let mut scheduler = Scheduler::new(SchedulerConfig::default(), 0.0).unwrap();
        let mut shell_times = Vec::new();
        let mut t = 0.0;
        while t < 3.5 * SHELL_INTERVAL_MS {
            if shells(&scheduler.poll(t)) > 0 {
                shell_times.push(t);
            }
            t += FRAME;
        }
        assert_eq!(shell_times.len(), 3);
        assert!(shell_times[0] >= SHELL_INTERVAL_MS);
    }

    #[test]
    fn test_shell_timing_survives_resync() {
        let mut scheduler = Scheduler::new(SchedulerConfig::default(), 0.0).unwrap();
        scheduler.poll(0.0);
        // Long background gap: cycle resyncs, one shell fires (no backlog)
        let now = 10.0 * CYCLE_LENGTH_MS;
        assert_eq!(shells(&scheduler.poll(now)), 1);
        assert_eq!(shells(&scheduler.poll(now + SHELL_INTERVAL_MS - 1.0)), 0);
        assert_eq!(shells(&scheduler.poll(now + SHELL_INTERVAL_MS)), 1);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let bad_cycle = SchedulerConfig {
            cycle_length_ms: 0.0,
            ..Default::default()
        };
        assert!(bad_cycle.validate().is_err());

        let mut unordered = SchedulerConfig::default();
        unordered.slots.swap(0, 2);
        assert!(unordered.validate().is_err());

        let mut outside = SchedulerConfig::default();
        outside.slots[2].offset_ms = CYCLE_LENGTH_MS;
        assert!(outside.validate().is_err());

        let no_resync = SchedulerConfig {
            resync_cycles: 0,
            ..Default::default()
        };
        assert!(Scheduler::new(no_resync, 0.0).is_err());

        assert!(SchedulerConfig::default().validate().is_ok());
    }

    proptest! {
        /// However the frames are spaced, no slot fires twice within one cycle
        #[test]
        fn prop_at_most_once_per_slot_per_cycle(
            steps in prop::collection::vec(1.0f64..2_500.0, 1..400)
        ) {
            let mut scheduler = salvo_only(0.0);
            let mut counts = std::collections::HashMap::<(u64, u32), u32>::new();
            let mut t = 0.0;
            for dt in steps {
                let cycle_before = scheduler.cycle_start();
                let actions = scheduler.poll(t);
                let cycle = scheduler.cycle_start();
                prop_assert!(cycle >= cycle_before);
                for n in salvos(&actions) {
                    let entry = counts.entry((cycle.to_bits(), n)).or_default();
                    *entry += 1;
                    prop_assert_eq!(*entry, 1);
                }
                t += dt;
            }
        }

        /// Shells never fire closer together than the interval
        #[test]
        fn prop_shell_spacing(
            steps in prop::collection::vec(1.0f64..5_000.0, 1..200)
        ) {
            let mut scheduler = Scheduler::new(SchedulerConfig::default(), 0.0).unwrap();
            let mut last: Option<f64> = None;
            let mut t = 0.0;
            for dt in steps {
                if shells(&scheduler.poll(t)) > 0 {
                    if let Some(prev) = last {
                        prop_assert!(t - prev >= SHELL_INTERVAL_MS);
                    }
                    last = Some(t);
                }
                t += dt;
            }
        }
    }
}
