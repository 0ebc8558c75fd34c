//! Pomodoro focus timer state machine.
//!
//! # Responsibility
//! - Track work/break phases driven by one-second ticks.
//! - Report phase transitions so callers can notify the user.
//!
//! # Invariants
//! - `remaining_secs` is always within `1..=phase duration` for a valid config.
//! - Ticks are ignored while the timer is paused.
//! - A pomodoro counts as completed when its break phase ends.

use log::info;
use serde::{Deserialize, Serialize};

/// Default work phase length (25 minutes).
pub const DEFAULT_WORK_SECS: u32 = 25 * 60;
/// Default break phase length (5 minutes).
pub const DEFAULT_BREAK_SECS: u32 = 5 * 60;

/// Timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    Break,
}

impl TimerMode {
    fn next(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }
}

/// Phase lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    pub work_secs: u32,
    pub break_secs: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_secs: DEFAULT_WORK_SECS,
            break_secs: DEFAULT_BREAK_SECS,
        }
    }
}

impl PomodoroConfig {
    fn duration(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_secs.max(1),
            TimerMode::Break => self.break_secs.max(1),
        }
    }
}

/// Transition reported by [`PomodoroTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    PhaseCompleted { finished: TimerMode, next: TimerMode },
}

/// Work/break countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    mode: TimerMode,
    remaining_secs: u32,
    active: bool,
    completed_cycles: u32,
}

impl PomodoroTimer {
    /// Creates a paused timer at the start of a work phase.
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            config,
            mode: TimerMode::Work,
            remaining_secs: config.duration(TimerMode::Work),
            active: false,
            completed_cycles: 0,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of work+break cycles finished since the last reset.
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Starts or pauses the countdown. Returns `true` when it started.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        if self.active {
            info!(
                "event=pomodoro_start module=pomodoro status=ok mode={:?} remaining_secs={}",
                self.mode, self.remaining_secs
            );
        }
        self.active
    }

    /// Stops the timer and returns to a full work phase.
    pub fn reset(&mut self) {
        self.active = false;
        self.mode = TimerMode::Work;
        self.remaining_secs = self.config.duration(TimerMode::Work);
        self.completed_cycles = 0;
    }

    /// Advances the countdown by one second.
    ///
    /// When the current phase runs out, switches to the next phase with a
    /// full duration and returns the transition. The timer keeps running.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.active {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }

        let finished = self.mode;
        let next = finished.next();
        self.mode = next;
        self.remaining_secs = self.config.duration(next);
        if finished == TimerMode::Break {
            self.completed_cycles += 1;
        }
        info!(
            "event=pomodoro_phase module=pomodoro status=ok finished={:?} next={:?} cycles={}",
            finished, next, self.completed_cycles
        );
        Some(TimerEvent::PhaseCompleted { finished, next })
    }

    /// Percentage of the current phase still remaining.
    pub fn progress(&self) -> f64 {
        f64::from(self.remaining_secs) / f64::from(self.config.duration(self.mode)) * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}

/// Formats seconds as zero-padded `MM:SS`.
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::{format_mm_ss, PomodoroConfig, PomodoroTimer, TimerEvent, TimerMode};

    fn short_timer() -> PomodoroTimer {
        PomodoroTimer::new(PomodoroConfig {
            work_secs: 3,
            break_secs: 2,
        })
    }

    #[test]
    fn default_timer_starts_paused_in_full_work_phase() {
        let timer = PomodoroTimer::default();
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.remaining_secs(), 25 * 60);
        assert!(!timer.is_active());
        assert_eq!(timer.format_remaining(), "25:00");
        assert_eq!(timer.progress(), 100.0);
    }

    #[test]
    fn ticks_are_ignored_while_paused() {
        let mut timer = short_timer();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 3);
    }

    #[test]
    fn work_phase_rolls_into_break_and_keeps_running() {
        let mut timer = short_timer();
        assert!(timer.toggle());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(
            timer.tick(),
            Some(TimerEvent::PhaseCompleted {
                finished: TimerMode::Work,
                next: TimerMode::Break,
            })
        );
        assert_eq!(timer.mode(), TimerMode::Break);
        assert_eq!(timer.remaining_secs(), 2);
        assert!(timer.is_active());
        assert_eq!(timer.completed_cycles(), 0);
    }

    #[test]
    fn finished_break_counts_a_cycle() {
        let mut timer = short_timer();
        timer.toggle();
        let events = (0..5).filter_map(|_| timer.tick()).collect::<Vec<_>>();
        assert_eq!(events.len(), 2);
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.completed_cycles(), 1);
    }

    #[test]
    fn reset_returns_to_paused_work_phase() {
        let mut timer = short_timer();
        timer.toggle();
        timer.tick();
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.remaining_secs(), 3);
        assert!(!timer.is_active());
    }

    #[test]
    fn toggle_pauses_running_timer() {
        let mut timer = short_timer();
        assert!(timer.toggle());
        assert!(!timer.toggle());
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(61), "01:01");
        assert_eq!(format_mm_ss(299), "04:59");
    }
}
