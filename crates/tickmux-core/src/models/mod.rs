pub mod config;
pub mod kind;

pub use config::{TimerConfig, TimerUpdate};
pub use kind::{PomodoroPhase, TimerKind};
