//! JOIN handler.
//!
//! ## Syntax
//! ```text
//! :<nick>!<user>@<host> JOIN <channel>
//! ```
//!
//! ## Behavior
//! - Records the source nick in the channel with no modes
//! - Stores the source host; a repeat JOIN only refreshes it

use std::sync::Arc;

use slirc_proto::Event;

use crate::handlers::{Handler, guard_args, source_nick};
use crate::state::ConnectionState;

pub struct JoinHandler {
    state: Arc<ConnectionState>,
}

impl JoinHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for JoinHandler {
    fn handle(&self, event: &Event) {
        if !guard_args(&self.state, event, "at least 1", !event.args.is_empty()) {
            return;
        }
        let Some(nick) = source_nick(&self.state, event) else {
            return;
        };

        self.state
            .members()
            .on_join(&event.args[0], nick, event.host());
    }
}
