//! KICK handler.
//!
//! ## Syntax
//! ```text
//! :<source> KICK <channel> <nick> [:<reason>]
//! ```
//!
//! ## Behavior
//! - Removes the kicked nick, not the source, from the channel
//! - Departure semantics match PART

use std::sync::Arc;

use slirc_proto::Event;

use crate::handlers::{Handler, guard_args};
use crate::state::ConnectionState;

pub struct KickHandler {
    state: Arc<ConnectionState>,
}

impl KickHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for KickHandler {
    fn handle(&self, event: &Event) {
        if !guard_args(&self.state, event, "at least 2", event.args.len() >= 2) {
            return;
        }

        self.state.members().on_kick(&event.args[0], &event.args[1]);
    }
}
