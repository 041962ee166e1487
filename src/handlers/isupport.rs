//! RPL_ISUPPORT (005) handler.
//!
//! ## Syntax
//! ```text
//! :server 005 <target> <token> [<token> ...] :are supported by this server
//! ```
//!
//! ## Behavior
//! - The target argument and the trailing human-readable text are skipped
//! - Every remaining token goes to the [`FeatureRegistry`] as one batch
//! - Decoded views (PREFIX, NICKLEN) refresh before the batch returns
//!
//! [`FeatureRegistry`]: crate::state::FeatureRegistry

use std::sync::Arc;

use slirc_proto::{Event, response_tokens};
use tracing::debug;

use super::{Handler, guard_args};
use crate::state::ConnectionState;

pub struct IsupportHandler {
    state: Arc<ConnectionState>,
}

impl IsupportHandler {
    pub fn new(state: Arc<ConnectionState>) -> Self {
        Self { state }
    }
}

impl Handler for IsupportHandler {
    fn handle(&self, event: &Event) {
        if !guard_args(&self.state, event, "at least 2", event.args.len() >= 2) {
            return;
        }

        let tokens = response_tokens(&event.args, event.trailing);
        debug!(count = tokens.len(), "Applying ISUPPORT batch");
        self.state.features().apply_announcement(tokens);
    }
}
