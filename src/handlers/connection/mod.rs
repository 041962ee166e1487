//! Connection-wide identity handlers.

mod nick;
mod quit;

pub use nick::NickHandler;
pub use quit::QuitHandler;
