//! Live reload: a notice hub fed by the watch controller and the HTTP
//! endpoint browsers poll.

mod hub;
mod server;

pub use hub::{ReloadHub, ReloadNotice};
pub use server::{LiveReloadServer, LONG_POLL};
