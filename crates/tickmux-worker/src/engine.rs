//! Background timer engine
//!
//! A dedicated task that owns the registry of logical timers and keeps
//! ground-truth time for them independent of whatever the UI side is doing.
//! All registry mutation happens on the engine task; per-timer schedules are
//! spawned interval tasks that feed tick messages back into the engine's
//! inbox, so no locking is needed anywhere.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use tickmux_core::{TimerCommand, TimerConfig, TimerEvent, TimerKind, TimerUpdate};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine channel closed")]
    ChannelClosed,
}

/// One entry in the engine's registry.
///
/// Stopwatches accumulate wall-clock deltas between ticks, so a stalled or
/// throttled scheduler cannot desynchronize the reported value from real
/// elapsed time. Countdown and pomodoro timers decrement a fixed second per
/// tick, accepting minor drift at their 1 Hz granularity.
#[derive(Debug)]
pub struct LogicalTimer {
    pub kind: TimerKind,
    pub config: TimerConfig,
    pub current_value: u64,
    pub started_at: Instant,
    pub last_tick: Instant,
    pub is_running: bool,
    pub schedule: Option<JoinHandle<()>>,
    /// Which schedule this entry belongs to. A restart on the same id bumps
    /// the generation, so a tick from the replaced schedule that was already
    /// queued in the inbox cannot land on the new timer.
    pub generation: u64,
}

/// Messages processed on the engine task.
#[derive(Debug)]
enum EngineMessage {
    Command(TimerCommand),
    TickFired { id: String, generation: u64 },
}

/// Handle to a spawned engine: a command sender plus the task itself.
///
/// Commands are fire-and-forget; outcomes are observed as events on the
/// channel passed to [`TimerEngine::spawn`].
pub struct EngineHandle {
    msg_tx: mpsc::UnboundedSender<EngineMessage>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    pub fn send(&self, command: TimerCommand) -> Result<(), EngineError> {
        self.msg_tx
            .send(EngineMessage::Command(command))
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Discard the engine context. Remaining schedules are abandoned; their
    /// tasks wind down on their own once the engine inbox is gone.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

pub struct TimerEngine {
    timers: HashMap<String, LogicalTimer>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    msg_tx: mpsc::UnboundedSender<EngineMessage>,
    generations: u64,
}

impl TimerEngine {
    /// Spawn the engine on its own task, emitting events into `event_tx`.
    pub fn spawn(event_tx: mpsc::UnboundedSender<TimerEvent>) -> EngineHandle {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let engine = TimerEngine {
            timers: HashMap::new(),
            event_tx,
            msg_tx: msg_tx.clone(),
            generations: 0,
        };

        let task = tokio::spawn(engine.run(msg_rx));

        EngineHandle { msg_tx, task }
    }

    async fn run(mut self, mut msg_rx: mpsc::UnboundedReceiver<EngineMessage>) {
        while let Some(message) = msg_rx.recv().await {
            match message {
                EngineMessage::Command(command) => self.handle_command(command),
                EngineMessage::TickFired { id, generation } => self.handle_tick(&id, generation),
            }
        }
    }

    fn handle_command(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Start { id, kind, config } => self.start(id, kind, config),
            TimerCommand::Stop { id } => self.stop(&id),
            TimerCommand::Update { id, updates } => self.update(&id, updates),
            TimerCommand::Reset { id } => self.reset(&id),
            TimerCommand::Ping => self.emit(TimerEvent::pong()),
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Event channel closed, dropping event");
        }
    }

    fn start(&mut self, id: String, kind: TimerKind, config: TimerConfig) {
        if kind == TimerKind::Unknown {
            tracing::warn!(id = %id, "Ignoring start for unknown timer kind");
            return;
        }

        // Restart semantics: at most one active schedule per id.
        self.stop(&id);

        self.generations += 1;
        let generation = self.generations;
        let now = Instant::now();
        let cadence = Duration::from_millis(kind.tick_interval_ms());
        let schedule = self.spawn_schedule(id.clone(), cadence, generation);

        self.timers.insert(
            id.clone(),
            LogicalTimer {
                kind,
                current_value: config.initial_value,
                config,
                started_at: now,
                last_tick: now,
                is_running: true,
                schedule: Some(schedule),
                generation,
            },
        );

        self.emit(TimerEvent::started(id, kind));
    }

    fn spawn_schedule(&self, id: String, cadence: Duration, generation: u64) -> JoinHandle<()> {
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + cadence, cadence);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let fired = EngineMessage::TickFired {
                    id: id.clone(),
                    generation,
                };
                if msg_tx.send(fired).is_err() {
                    // Engine context discarded, wind down with it.
                    break;
                }
            }
        })
    }

    fn stop(&mut self, id: &str) {
        let Some(timer) = self.timers.get_mut(id) else {
            return;
        };
        if !timer.is_running {
            return;
        }

        if let Some(schedule) = timer.schedule.take() {
            schedule.abort();
        }
        timer.is_running = false;

        self.emit(TimerEvent::stopped(id.to_string()));
    }

    fn update(&mut self, id: &str, updates: TimerUpdate) {
        let Some(timer) = self.timers.get_mut(id) else {
            tracing::debug!(id, "Update for unknown timer, ignoring");
            return;
        };

        if let Some(config) = updates.config {
            timer.config = config;
        }
        if let Some(value) = updates.value {
            timer.current_value = value;
            let event = TimerEvent::updated(id.to_string(), value, timer.config.clone());
            self.emit(event);
        }
    }

    /// Reset zeroes the value rather than restoring `config.initial_value`;
    /// callers wanting "back to the configured duration" issue an update
    /// afterward.
    fn reset(&mut self, id: &str) {
        if !self.timers.contains_key(id) {
            return;
        }

        self.stop(id);

        let now = Instant::now();
        let Some(timer) = self.timers.get_mut(id) else {
            return;
        };
        timer.current_value = 0;
        timer.started_at = now;
        timer.last_tick = now;

        self.emit(TimerEvent::reset(id.to_string(), 0));
    }

    fn handle_tick(&mut self, id: &str, generation: u64) {
        // A stop may race with a tick already queued in the inbox.
        let Some(timer) = self.timers.get_mut(id) else {
            return;
        };
        if !timer.is_running {
            return;
        }
        // A restart reuses the id but not the generation; a tick the replaced
        // schedule managed to queue before its abort must not touch the new
        // timer.
        if timer.generation != generation {
            return;
        }

        match timer.kind {
            TimerKind::Stopwatch => {
                let now = Instant::now();
                let elapsed = now.duration_since(timer.last_tick).as_millis() as u64;
                timer.current_value += elapsed;
                timer.last_tick = now;
                let event = TimerEvent::tick(
                    id.to_string(),
                    timer.current_value,
                    TimerKind::Stopwatch,
                    None,
                    None,
                );
                self.emit(event);
            }
            TimerKind::Countdown | TimerKind::Pomodoro => {
                timer.current_value = timer.current_value.saturating_sub(1000);
                timer.last_tick = Instant::now();

                let value = timer.current_value;
                let kind = timer.kind;
                let phase = timer.config.phase;
                let cycle_count = timer.config.cycle_count;

                self.emit(TimerEvent::tick(id.to_string(), value, kind, phase, cycle_count));

                if value == 0 {
                    self.emit(TimerEvent::complete(id.to_string(), kind, phase, cycle_count));
                    self.stop(id);
                }
            }
            // Rejected at start, never registered.
            TimerKind::Unknown => {}
        }
    }
}
