//! NICK handler.
//!
//! ## Syntax
//! ```text
//! :<old>!<user>@<host> NICK <new>
//! ```
//!
//! ## Behavior
//! - Renames the nick in every channel it belongs to, in one step
//! - Modes carry over; the stored host is refreshed from the source

use std::sync::Arc;

use slirc_proto::Event;

use crate::handlers::{Handler, guard_args, source_nick};
use crate::state::ConnectionState;

pub struct NickHandler {
    state: Arc<ConnectionState>,
}

impl NickHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for NickHandler {
    fn handle(&self, event: &Event) {
        if !guard_args(&self.state, event, "exactly 1", event.args.len() == 1) {
            return;
        }
        let Some(old) = source_nick(&self.state, event) else {
            return;
        };

        self.state
            .members()
            .on_nick_change(old, &event.args[0], event.host());
    }
}
