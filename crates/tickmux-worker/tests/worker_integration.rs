//! End-to-end tests driving the engine through the multiplexer.

use std::sync::{Arc, Mutex};

use tokio::time::{sleep, Duration};

use tickmux_core::{
    PomodoroPhase, TimerCommand, TimerConfig, TimerEventType, TimerKind, TimerUpdate,
};
use tickmux_worker::{Subscriber, TimerMux};

type Recorded = Arc<Mutex<Vec<TimerEventType>>>;

fn recorder() -> (Recorded, Subscriber) {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    let callback: Subscriber = Box::new(move |event| {
        sink.lock().unwrap().push(event.event_type);
    });
    (recorded, callback)
}

#[tokio::test(start_paused = true)]
async fn countdown_lifecycle_through_mux() {
    let mux = TimerMux::new();
    mux.register_component().await;

    let (events, callback) = recorder();
    mux.subscribe("exam", callback).await;
    mux.send(TimerCommand::Start {
        id: "exam".to_string(),
        kind: TimerKind::Countdown,
        config: TimerConfig::with_initial_value(3000),
    })
    .await;

    sleep(Duration::from_millis(4000)).await;

    let events = events.lock().unwrap();
    assert_eq!(
        events[0],
        TimerEventType::Started {
            id: "exam".to_string(),
            kind: TimerKind::Countdown,
        }
    );

    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            TimerEventType::Tick { value, .. } => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![2000, 1000, 0]);

    let complete_at = events
        .iter()
        .position(|e| matches!(e, TimerEventType::Complete { .. }))
        .expect("countdown should complete");
    assert!(matches!(
        events[complete_at + 1],
        TimerEventType::Stopped { .. }
    ));
    drop(events);

    mux.destroy().await;
}

#[tokio::test(start_paused = true)]
async fn pomodoro_phase_passes_through_mux() {
    let mux = TimerMux::new();
    mux.register_component().await;

    let (events, callback) = recorder();
    mux.subscribe("pomo", callback).await;
    mux.send(TimerCommand::Start {
        id: "pomo".to_string(),
        kind: TimerKind::Pomodoro,
        config: TimerConfig::pomodoro(1000, PomodoroPhase::Work, 2),
    })
    .await;

    sleep(Duration::from_millis(2000)).await;

    let events = events.lock().unwrap();
    for event in events.iter() {
        match event {
            TimerEventType::Tick {
                phase, cycle_count, ..
            }
            | TimerEventType::Complete {
                phase, cycle_count, ..
            } => {
                assert_eq!(*phase, Some(PomodoroPhase::Work));
                assert_eq!(*cycle_count, Some(2));
            }
            _ => {}
        }
    }
    assert!(events
        .iter()
        .any(|e| matches!(e, TimerEventType::Complete { .. })));
    drop(events);

    mux.destroy().await;
}

#[tokio::test(start_paused = true)]
async fn independent_timers_do_not_interfere() {
    let mux = TimerMux::new();
    mux.register_component().await;

    let (countdown_events, countdown_callback) = recorder();
    let (stopwatch_events, stopwatch_callback) = recorder();
    mux.subscribe("race", countdown_callback).await;
    mux.subscribe("lap", stopwatch_callback).await;

    mux.send(TimerCommand::Start {
        id: "race".to_string(),
        kind: TimerKind::Countdown,
        config: TimerConfig::with_initial_value(2000),
    })
    .await;
    mux.send(TimerCommand::Start {
        id: "lap".to_string(),
        kind: TimerKind::Stopwatch,
        config: TimerConfig::default(),
    })
    .await;

    sleep(Duration::from_millis(3000)).await;

    let countdown_events = countdown_events.lock().unwrap();
    let countdown_ticks: Vec<u64> = countdown_events
        .iter()
        .filter_map(|e| match e {
            TimerEventType::Tick { value, .. } => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(countdown_ticks, vec![1000, 0]);
    assert!(countdown_events
        .iter()
        .any(|e| matches!(e, TimerEventType::Complete { .. })));

    // The stopwatch keeps running after the countdown completed, and its
    // fine-grained ticks track wall-clock time.
    let stopwatch_events = stopwatch_events.lock().unwrap();
    let last_value = stopwatch_events
        .iter()
        .rev()
        .find_map(|e| match e {
            TimerEventType::Tick { value, kind, .. } => {
                assert_eq!(*kind, TimerKind::Stopwatch);
                Some(*value)
            }
            _ => None,
        })
        .expect("stopwatch should have ticked");
    assert!(last_value >= 2990, "stopwatch fell behind: {}", last_value);
    assert!(!stopwatch_events
        .iter()
        .any(|e| matches!(e, TimerEventType::Complete { .. })));
    drop(countdown_events);
    drop(stopwatch_events);

    mux.destroy().await;
}

#[tokio::test(start_paused = true)]
async fn reset_then_update_restores_configured_duration() {
    // Reset zeroes the value; consumers that want "back to the configured
    // duration" follow up with an update, and both echoes arrive in order.
    let mux = TimerMux::new();
    mux.register_component().await;

    let (events, callback) = recorder();
    mux.subscribe("t", callback).await;
    mux.send(TimerCommand::Start {
        id: "t".to_string(),
        kind: TimerKind::Countdown,
        config: TimerConfig::with_initial_value(60_000),
    })
    .await;
    mux.send(TimerCommand::Reset {
        id: "t".to_string(),
    })
    .await;
    mux.send(TimerCommand::Update {
        id: "t".to_string(),
        updates: TimerUpdate::value(60_000),
    })
    .await;

    sleep(Duration::from_millis(500)).await;

    let events = events.lock().unwrap();
    let tail: Vec<&TimerEventType> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                TimerEventType::Reset { .. } | TimerEventType::Updated { .. }
            )
        })
        .collect();
    assert!(matches!(tail[0], TimerEventType::Reset { value: 0, .. }));
    assert!(matches!(
        tail[1],
        TimerEventType::Updated { value: 60_000, .. }
    ));
    drop(events);

    mux.destroy().await;
}
