//! The session flow proper: role dispatch after login, identity bootstrap on page load and
//! logout, wired to notification and navigation collaborators.

mod collaborators;
mod loader;
mod router;

pub use collaborators::{FlashNotifier, Navigator, Notification, Notifier, RecordingNavigator, TracingNotifier};
pub use loader::{IdentityLoader, LOGGED_OUT_TITLE, WELCOME_TITLE};
pub use router::RoleRouter;
