//! Event handler registry and dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use slirc_proto::Event;
use tracing::trace;

use crate::handlers::Handler;
use crate::telemetry::spans;

/// The subscription mechanism handlers are wired into.
///
/// The connection layer implements this over its own event loop; handlers
/// registered under one name must be invoked in registration order.
pub trait Dispatcher {
    fn register(&mut self, event: &str, handler: Box<dyn Handler>);
}

/// Name-keyed table of handlers.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Vec<Box<dyn Handler>>>,
    /// Per-event dispatch counters.
    event_counts: HashMap<String, AtomicU64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers subscribed to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .get(&event.to_ascii_uppercase())
            .map_or(0, Vec::len)
    }

    /// Dispatch an event to every handler subscribed to its command, in
    /// registration order. Returns how many handlers ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        let name = event.command.to_ascii_uppercase();
        let Some(list) = self.handlers.get(&name) else {
            trace!(command = %name, "No handler for event");
            return 0;
        };

        if let Some(count) = self.event_counts.get(&name) {
            count.fetch_add(1, Ordering::Relaxed);
        }

        let source = event.source.as_ref().map(ToString::to_string);
        let span = spans::event(&name, source.as_deref());
        let _enter = span.enter();
        for handler in list {
            handler.handle(event);
        }
        list.len()
    }

    /// Dispatch counts for events seen at least once, most frequent first.
    pub fn event_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .event_counts
            .iter()
            .map(|(name, count)| (name.clone(), count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}

impl Dispatcher for Registry {
    fn register(&mut self, event: &str, handler: Box<dyn Handler>) {
        let name = event.to_ascii_uppercase();
        self.event_counts
            .entry(name.clone())
            .or_insert_with(|| AtomicU64::new(0));
        self.handlers.entry(name).or_default().push(handler);
    }
}
