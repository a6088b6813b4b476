//! Timer session multiplexer
//!
//! Gives each UI consumer the illusion of a private timer channel while
//! sharing one background engine. Construct a single instance at the
//! application root and pass it down; there is deliberately no module-level
//! global.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use tickmux_core::{TimerCommand, TimerEvent};

use crate::engine::{EngineHandle, TimerEngine};

/// UI-side callback registered for one timer id.
pub type Subscriber = Box<dyn FnMut(TimerEvent) + Send>;

/// The lazily created conduit to the engine.
struct EngineChannel {
    engine: EngineHandle,
    dispatch: JoinHandle<()>,
}

struct MuxInner {
    channel: Option<EngineChannel>,
    subscribers: HashMap<String, Subscriber>,
    component_count: usize,
}

/// Multiplexes many UI consumers onto one background timer engine.
#[derive(Clone)]
pub struct TimerMux {
    inner: Arc<Mutex<MuxInner>>,
}

impl TimerMux {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MuxInner {
                channel: None,
                subscribers: HashMap::new(),
                component_count: 0,
            })),
        }
    }

    /// Register `callback` as the handler for events tagged with `id`.
    /// At most one subscriber per id; a second registration replaces the
    /// first. Does not talk to the engine: the channel is established lazily
    /// by the first command sent.
    pub async fn subscribe(&self, id: impl Into<String>, callback: Subscriber) {
        let mut inner = self.inner.lock().await;
        inner.subscribers.insert(id.into(), callback);
    }

    /// Remove the subscriber for `id` and stop the timer on the engine side,
    /// so no orphaned schedule keeps running for a consumer that is gone.
    /// With no channel there is no engine and nothing to stop, so this never
    /// builds one.
    pub async fn unsubscribe(&self, id: &str) {
        let mut inner = self.inner.lock().await;
        inner.subscribers.remove(id);
        if inner.channel.is_some() {
            Self::send_locked(&self.inner, &mut inner, TimerCommand::Stop { id: id.to_string() });
        }
    }

    /// Forward a command to the engine, lazily creating the channel on first
    /// use. Fire-and-forget: a command that cannot be delivered is logged
    /// and dropped, never surfaced as an error.
    pub async fn send(&self, command: TimerCommand) {
        let mut inner = self.inner.lock().await;
        Self::send_locked(&self.inner, &mut inner, command);
    }

    fn send_locked(handle: &Arc<Mutex<MuxInner>>, inner: &mut MuxInner, command: TimerCommand) {
        if inner.channel.is_none() {
            inner.channel = Some(Self::open_channel(handle.clone()));
        }

        let Some(channel) = inner.channel.as_ref() else {
            return;
        };
        if let Err(e) = channel.engine.send(command) {
            tracing::error!("Dropping timer command, engine unavailable: {}", e);
        }
    }

    fn open_channel(inner: Arc<Mutex<MuxInner>>) -> EngineChannel {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::spawn(event_tx);
        let dispatch = tokio::spawn(Self::dispatch_loop(inner, event_rx));
        EngineChannel { engine, dispatch }
    }

    /// Route each inbound event to the subscriber registered for its id.
    /// Events with no matching subscriber, and `Pong` (which carries no id),
    /// are dropped.
    async fn dispatch_loop(
        inner: Arc<Mutex<MuxInner>>,
        mut event_rx: mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        while let Some(event) = event_rx.recv().await {
            let Some(id) = event.timer_id().map(str::to_string) else {
                tracing::debug!("Dropping engine event without timer id");
                continue;
            };

            let mut inner = inner.lock().await;
            match inner.subscribers.get_mut(&id) {
                Some(callback) => callback(event),
                None => tracing::debug!(id = %id, "No subscriber for engine event, dropping"),
            }
        }
    }

    /// Track one more mounted UI consumer.
    pub async fn register_component(&self) {
        let mut inner = self.inner.lock().await;
        inner.component_count += 1;
    }

    /// Track one consumer going away; the last one out tears the shared
    /// channel down. Engine-side schedules are abandoned rather than stopped
    /// one by one, since the whole context is discarded with them.
    pub async fn unregister_component(&self) {
        let mut inner = self.inner.lock().await;
        inner.component_count = inner.component_count.saturating_sub(1);
        if inner.component_count == 0 {
            Self::teardown_channel(&mut inner);
        }
    }

    /// Unconditional teardown: channel, subscriptions, and component count.
    pub async fn destroy(&self) {
        let mut inner = self.inner.lock().await;
        Self::teardown_channel(&mut inner);
        inner.subscribers.clear();
        inner.component_count = 0;
    }

    fn teardown_channel(inner: &mut MuxInner) {
        if let Some(channel) = inner.channel.take() {
            channel.dispatch.abort();
            channel.engine.shutdown();
        }
    }

    #[cfg(test)]
    pub(crate) async fn has_channel(&self) -> bool {
        self.inner.lock().await.channel.is_some()
    }

    #[cfg(test)]
    pub(crate) async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.subscribers.len()
    }
}

impl Default for TimerMux {
    fn default() -> Self {
        Self::new()
    }
}
