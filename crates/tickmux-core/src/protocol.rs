//! Command and event vocabulary between UI consumers and the timer engine
//!
//! Commands travel one way into the engine, events come back tagged with the
//! timer id they concern. There is no request/response correlation: a caller
//! observes a `Started` event (or its absence) rather than awaiting an ack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PomodoroPhase, TimerConfig, TimerKind, TimerUpdate};

/// Command sent from a UI consumer to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerCommand {
    /// Start (or restart, if the id is already taken) a logical timer.
    Start {
        id: String,
        kind: TimerKind,
        #[serde(default)]
        config: TimerConfig,
    },
    /// Cancel the timer's schedule, keeping its accumulated value.
    Stop { id: String },
    /// Shallow-merge fields into an existing timer.
    Update { id: String, updates: TimerUpdate },
    /// Stop and zero the timer's value.
    Reset { id: String },
    /// Liveness probe; answered with `Pong` immediately.
    Ping,
}

/// Event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    pub timestamp: DateTime<Utc>,
}

/// Types of engine events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// Schedule created
    Started { id: String, kind: TimerKind },
    /// Schedule cancelled
    Stopped { id: String },
    /// Periodic value report from a running timer
    Tick {
        id: String,
        value: u64,
        kind: TimerKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        phase: Option<PomodoroPhase>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cycle_count: Option<u32>,
    },
    /// Countdown or pomodoro reached zero
    Complete {
        id: String,
        kind: TimerKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        phase: Option<PomodoroPhase>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cycle_count: Option<u32>,
    },
    /// Value zeroed
    Reset { id: String, value: u64 },
    /// External value/config write echoed back for display consistency
    Updated {
        id: String,
        value: u64,
        config: TimerConfig,
    },
    /// Liveness reply
    Pong,
}

impl TimerEvent {
    pub fn new(event_type: TimerEventType) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
        }
    }

    pub fn started(id: String, kind: TimerKind) -> Self {
        Self::new(TimerEventType::Started { id, kind })
    }

    pub fn stopped(id: String) -> Self {
        Self::new(TimerEventType::Stopped { id })
    }

    pub fn tick(
        id: String,
        value: u64,
        kind: TimerKind,
        phase: Option<PomodoroPhase>,
        cycle_count: Option<u32>,
    ) -> Self {
        Self::new(TimerEventType::Tick {
            id,
            value,
            kind,
            phase,
            cycle_count,
        })
    }

    pub fn complete(
        id: String,
        kind: TimerKind,
        phase: Option<PomodoroPhase>,
        cycle_count: Option<u32>,
    ) -> Self {
        Self::new(TimerEventType::Complete {
            id,
            kind,
            phase,
            cycle_count,
        })
    }

    pub fn reset(id: String, value: u64) -> Self {
        Self::new(TimerEventType::Reset { id, value })
    }

    pub fn updated(id: String, value: u64, config: TimerConfig) -> Self {
        Self::new(TimerEventType::Updated { id, value, config })
    }

    pub fn pong() -> Self {
        Self::new(TimerEventType::Pong)
    }

    /// The id this event is tagged with; `Pong` carries none.
    pub fn timer_id(&self) -> Option<&str> {
        match &self.event_type {
            TimerEventType::Started { id, .. }
            | TimerEventType::Stopped { id }
            | TimerEventType::Tick { id, .. }
            | TimerEventType::Complete { id, .. }
            | TimerEventType::Reset { id, .. }
            | TimerEventType::Updated { id, .. } => Some(id),
            TimerEventType::Pong => None,
        }
    }
}

impl TimerCommand {
    /// The id this command targets; `Ping` carries none.
    pub fn timer_id(&self) -> Option<&str> {
        match self {
            TimerCommand::Start { id, .. }
            | TimerCommand::Stop { id }
            | TimerCommand::Update { id, .. }
            | TimerCommand::Reset { id } => Some(id),
            TimerCommand::Ping => None,
        }
    }
}
