//! Per-timer configuration and update payloads

use serde::{Deserialize, Serialize};

use super::PomodoroPhase;

/// Options supplied with a start command.
///
/// `phase` and `cycle_count` are only meaningful for pomodoro timers; the
/// engine echoes them back on every tick so subscribers can tell work and
/// break segments apart without tracking state of their own.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimerConfig {
    /// Starting value in milliseconds. Counts up from here for stopwatches,
    /// down to zero for countdown and pomodoro timers.
    #[serde(default)]
    pub initial_value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<PomodoroPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<u32>,
}

/// Fields shallow-merged into a running timer by an update command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<TimerConfig>,
}

impl TimerConfig {
    pub fn with_initial_value(initial_value: u64) -> Self {
        Self {
            initial_value,
            ..Self::default()
        }
    }

    pub fn pomodoro(initial_value: u64, phase: PomodoroPhase, cycle_count: u32) -> Self {
        Self {
            initial_value,
            phase: Some(phase),
            cycle_count: Some(cycle_count),
        }
    }
}

impl TimerUpdate {
    pub fn value(value: u64) -> Self {
        Self {
            value: Some(value),
            config: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TimerConfig::default();
        assert_eq!(config.initial_value, 0);
        assert!(config.phase.is_none());
        assert!(config.cycle_count.is_none());
    }

    #[test]
    fn test_initial_value_defaults_on_wire() {
        let config: TimerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.initial_value, 0);
    }

    #[test]
    fn test_pomodoro_config() {
        let config = TimerConfig::pomodoro(1500_000, PomodoroPhase::Work, 2);
        assert_eq!(config.initial_value, 1500_000);
        assert_eq!(config.phase, Some(PomodoroPhase::Work));
        assert_eq!(config.cycle_count, Some(2));
    }
}
