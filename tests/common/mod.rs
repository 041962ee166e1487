//! Integration test common infrastructure.
//!
//! Provides a tracked connection driven by raw protocol lines and a sink
//! that collects absorbed anomalies.

use std::sync::Arc;

use parking_lot::Mutex;
use slirc_track::{
    ConnectionState, DiagnosticSink, Event, Registry, StateError, Tracker, TrackerConfig,
};

#[derive(Default)]
pub struct CollectSink(Mutex<Vec<StateError>>);

#[allow(dead_code)]
impl CollectSink {
    pub fn errors(&self) -> Vec<StateError> {
        self.0.lock().clone()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.0.lock().iter().map(StateError::error_code).collect()
    }
}

impl DiagnosticSink for CollectSink {
    fn report(&self, err: &StateError) {
        self.0.lock().push(err.clone());
    }
}

/// A tracker wired into a [`Registry`], fed with raw server lines.
pub struct TestConnection {
    pub tracker: Tracker,
    pub registry: Registry,
    pub sink: Arc<CollectSink>,
}

#[allow(dead_code)]
impl TestConnection {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        let sink = Arc::new(CollectSink::default());
        let tracker = Tracker::with_sink(config, sink.clone());
        let mut registry = Registry::new();
        tracker.setup(&mut registry);
        Self {
            tracker,
            registry,
            sink,
        }
    }

    pub fn state(&self) -> Arc<ConnectionState> {
        self.tracker.state()
    }

    /// Parse and dispatch one line. Returns how many handlers ran.
    pub fn feed(&self, line: &str) -> usize {
        let event = Event::parse(line).expect("test line must parse");
        self.registry.dispatch(&event)
    }

    pub fn feed_all(&self, lines: &[&str]) {
        for line in lines {
            self.feed(line);
        }
    }

    /// Modes of `nick` in `channel`, rendered, if tracked.
    pub fn modes(&self, channel: &str, nick: &str) -> Option<String> {
        self.state()
            .members()
            .member(channel, nick)
            .map(|m| m.modes.to_string())
    }
}
