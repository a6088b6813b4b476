pub mod error;
pub mod models;
pub mod protocol;

pub use error::{Error, Result};
pub use models::{PomodoroPhase, TimerConfig, TimerKind, TimerUpdate};
pub use protocol::{TimerCommand, TimerEvent, TimerEventType};
