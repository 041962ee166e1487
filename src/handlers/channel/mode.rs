//! Channel MODE handler.
//!
//! ## Syntax
//! ```text
//! :<source> MODE <channel> <modestring> <nick>
//! ```
//!
//! ## Behavior
//! - Only the single-target form is applied
//! - Letters outside the current PREFIX table are ignored
//! - User MODE (target is not a channel) is ignored
//! - Multi-target batches are reported and dropped

use std::sync::Arc;

use slirc_proto::Event;
use tracing::trace;

use crate::error::StateError;
use crate::handlers::{Handler, guard_args};
use crate::state::ConnectionState;

pub struct ModeHandler {
    state: Arc<ConnectionState>,
}

impl ModeHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for ModeHandler {
    fn handle(&self, event: &Event) {
        if !guard_args(&self.state, event, "at least 1", !event.args.is_empty()) {
            return;
        }
        let channel = &event.args[0];
        if !self.state.features().is_channel_name(channel) {
            trace!(target_name = %channel, "Ignoring user MODE");
            return;
        }

        match event.args.len() {
            3 => {
                let applied =
                    self.state
                        .members()
                        .on_mode_change(channel, &event.args[1], &event.args[2]);
                if !applied {
                    trace!(channel = %channel, modes = %event.args[1], "No membership modes in MODE");
                }
            }
            n if n > 3 => {
                self.state
                    .diagnostics()
                    .report(&StateError::UnsupportedModeBatch {
                        channel: channel.to_string(),
                        modes: event.args[1..].join(" "),
                    });
            }
            _ => {}
        }
    }
}
