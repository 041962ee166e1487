//! Channel membership handlers.
//!
//! Handles RPL_NAMREPLY, JOIN, PART, KICK and channel MODE.

mod join;
mod kick;
mod mode;
mod names;
mod part;

pub use join::JoinHandler;
pub use kick::KickHandler;
pub use mode::ModeHandler;
pub use names::NamesHandler;
pub use part::PartHandler;
