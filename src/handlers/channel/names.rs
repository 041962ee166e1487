//! RPL_NAMREPLY (353) handler.
//!
//! ## Syntax
//! ```text
//! :server 353 <target> [<symbol>] <channel> :<nick-list>
//! ```
//!
//! ## Behavior
//! - The channel is the second-to-last argument and the nick list the last
//! - Every listed nick is recorded with the modes its glyphs name
//! - The channel symbol (`=`, `*`, `@`) is optional and ignored

use std::sync::Arc;

use slirc_proto::Event;

use crate::handlers::{Handler, guard_args};
use crate::state::ConnectionState;

pub struct NamesHandler {
    state: Arc<ConnectionState>,
}

impl NamesHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for NamesHandler {
    fn handle(&self, event: &Event) {
        let n = event.args.len();
        if !guard_args(&self.state, event, "at least 3", n >= 3) {
            return;
        }

        let channel = &event.args[n - 2];
        let nick_list = &event.args[n - 1];
        self.state.members().on_names_reply(channel, nick_list);
    }
}
