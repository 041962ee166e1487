//! QUIT handler.
//!
//! ## Syntax
//! ```text
//! :<nick>!<user>@<host> QUIT [:<reason>]
//! ```
//!
//! ## Behavior
//! - Removes the source nick from every channel in one step
//! - The quit reason is not tracked

use std::sync::Arc;

use slirc_proto::Event;

use crate::handlers::{Handler, source_nick};
use crate::state::ConnectionState;

pub struct QuitHandler {
    state: Arc<ConnectionState>,
}

impl QuitHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for QuitHandler {
    fn handle(&self, event: &Event) {
        let Some(nick) = source_nick(&self.state, event) else {
            return;
        };

        self.state.members().on_quit(nick);
    }
}
