//! Session store abstraction and its backends.

mod store;
mod memory;
mod file;
mod cookie;

pub use store::{LoadOutcome, SessionStore};
pub use memory::MemorySessionStore;
pub use file::FileSessionStore;
pub use cookie::{CookieSessionStore, MAX_COOKIE_BYTES, parse_cookie};

/// Key under which the current identity is stored unless configured otherwise.
pub const DEFAULT_SESSION_KEY: &str = "user";
