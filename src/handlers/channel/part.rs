//! PART handler.
//!
//! ## Syntax
//! ```text
//! :<nick>!<user>@<host> PART <channel> [:<reason>]
//! ```
//!
//! ## Behavior
//! - Removes the source nick from the channel
//! - Parting an unknown channel or as a non-member is a no-op

use std::sync::Arc;

use slirc_proto::Event;

use crate::handlers::{Handler, guard_args, source_nick};
use crate::state::ConnectionState;

pub struct PartHandler {
    state: Arc<ConnectionState>,
}

impl PartHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for PartHandler {
    fn handle(&self, event: &Event) {
        if !guard_args(&self.state, event, "at least 1", !event.args.is_empty()) {
            return;
        }
        let Some(nick) = source_nick(&self.state, event) else {
            return;
        };

        self.state.members().on_part(&event.args[0], nick);
    }
}
