//! Timer kinds and pomodoro phases

use serde::{Deserialize, Serialize};

/// Timing behavior family of a logical timer.
///
/// `Unknown` absorbs unrecognized kind strings arriving over the wire; the
/// engine rejects it at start time instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Stopwatch,
    Countdown,
    Pomodoro,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerKind {
    /// Tick cadence in milliseconds: stopwatch ticks fine-grained for
    /// hundredths-of-second display, the countdown kinds at second resolution.
    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            TimerKind::Stopwatch => 10,
            TimerKind::Countdown | TimerKind::Pomodoro => 1000,
            TimerKind::Unknown => 0,
        }
    }

    /// Whether this kind counts down and completes at zero.
    pub fn counts_down(&self) -> bool {
        matches!(self, TimerKind::Countdown | TimerKind::Pomodoro)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "stopwatch",
            TimerKind::Countdown => "countdown",
            TimerKind::Pomodoro => "pomodoro",
            TimerKind::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for TimerKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopwatch" => Ok(TimerKind::Stopwatch),
            "countdown" => Ok(TimerKind::Countdown),
            "pomodoro" => Ok(TimerKind::Pomodoro),
            other => Err(crate::Error::InvalidData(format!(
                "Unknown timer kind: {}",
                other
            ))),
        }
    }
}

impl PomodoroPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Work",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, PomodoroPhase::Work)
    }

    pub fn is_break(&self) -> bool {
        !self.is_work()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tick_cadence_by_kind() {
        assert_eq!(TimerKind::Stopwatch.tick_interval_ms(), 10);
        assert_eq!(TimerKind::Countdown.tick_interval_ms(), 1000);
        assert_eq!(TimerKind::Pomodoro.tick_interval_ms(), 1000);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            TimerKind::from_str("stopwatch").unwrap(),
            TimerKind::Stopwatch
        );
        assert_eq!(
            TimerKind::from_str("countdown").unwrap(),
            TimerKind::Countdown
        );
        assert!(TimerKind::from_str("hourglass").is_err());
    }

    #[test]
    fn test_unknown_kind_from_wire() {
        let kind: TimerKind = serde_json::from_str("\"hourglass\"").unwrap();
        assert_eq!(kind, TimerKind::Unknown);
    }

    #[test]
    fn test_counts_down() {
        assert!(!TimerKind::Stopwatch.counts_down());
        assert!(TimerKind::Countdown.counts_down());
        assert!(TimerKind::Pomodoro.counts_down());
    }

    #[test]
    fn test_phase_strings() {
        assert_eq!(PomodoroPhase::Work.as_str(), "Work");
        assert!(PomodoroPhase::Work.is_work());
        assert!(PomodoroPhase::ShortBreak.is_break());
        assert!(PomodoroPhase::LongBreak.is_break());
    }
}
