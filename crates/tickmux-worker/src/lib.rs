//! Tickmux Worker Library
//!
//! Background timer engine and the session multiplexer that shares it
//! between UI consumers.

pub mod engine;
pub mod mux;

pub use engine::{EngineError, EngineHandle, TimerEngine};
pub use mux::{Subscriber, TimerMux};
