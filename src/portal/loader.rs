use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::collaborators::{Navigator, Notifier};
use crate::identity::{Identity, Route, RouteTable, SessionContext};
use crate::session::{LoadOutcome, SessionStore};

pub const WELCOME_TITLE: &str = "Welcome back";
pub const LOGGED_OUT_TITLE: &str = "Logged out";

#[derive(Debug)]
struct LoaderState {
    identity: Option<Identity>,
    loading: bool,
    bootstrapped: bool,
}

/// Restores the current identity from the session store once per page lifecycle.
///
/// The persisted record is trusted as-is; nothing here goes back to the database, so role or
/// profile changes made server-side only show up after the next login.
pub struct IdentityLoader {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    routes: RouteTable,
    state: RwLock<LoaderState>,
}

impl IdentityLoader {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        routes: RouteTable,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
            routes,
            state: RwLock::new(LoaderState { identity: None, loading: true, bootstrapped: false }),
        }
    }

    /// First bootstrap. Later calls are no-ops; use [`IdentityLoader::reload`] to re-read.
    pub fn init(&self) -> SessionContext {
        if self.state.read().bootstrapped {
            return self.context();
        }
        self.reload()
    }

    /// Re-read the store. Welcomes the user only when this turns an unset identity into a set one.
    pub fn reload(&self) -> SessionContext {
        {
            let mut st = self.state.write();
            st.loading = true;
            st.bootstrapped = true;
        }
        let outcome = self.store.load();
        let mut welcome: Option<String> = None;
        {
            let mut st = self.state.write();
            match outcome {
                LoadOutcome::Absent => {
                    debug!(target: "session", key = self.store.key(), "no stored identity");
                    st.identity = None;
                }
                LoadOutcome::Present(identity) => {
                    if st.identity.is_none() {
                        welcome = Some(identity.display_name().to_string());
                    }
                    info!(target: "session", role = ?identity.role, "identity restored");
                    st.identity = Some(identity);
                }
                LoadOutcome::Malformed(e) => {
                    warn!(target: "session", key = self.store.key(), error = %e, "discarding malformed session record");
                    if let Err(ce) = self.store.clear() {
                        warn!(target: "session", error = %ce, "failed to clear malformed session record");
                    }
                    st.identity = None;
                }
                LoadOutcome::Unavailable(e) => {
                    warn!(target: "session", key = self.store.key(), error = %e, "session store unreadable, continuing without identity");
                    st.identity = None;
                }
            }
            st.loading = false;
        }
        // Collaborators run outside the state lock so they may read the loader back.
        if let Some(name) = welcome {
            self.notifier.notify(WELCOME_TITLE, &format!("Welcome back, {}!", name));
        }
        self.context()
    }

    /// Drop the session and send the user to the auth entry. Safe to call when logged out.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(target: "session", error = %e, "failed to clear session on logout");
        }
        let previous = {
            let mut st = self.state.write();
            st.loading = false;
            st.identity.take()
        };
        info!(target: "auth", role = ?previous.as_ref().and_then(|i| i.role.clone()), "logout");
        self.notifier.notify(LOGGED_OUT_TITLE, "You have been logged out successfully.");
        self.navigator.navigate(self.routes.path(Route::AuthEntry));
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn context(&self) -> SessionContext {
        let st = self.state.read();
        SessionContext { identity: st.identity.clone(), loading: st.loading }
    }
}
