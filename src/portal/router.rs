use std::sync::Arc;

use tracing::{info, warn};

use super::collaborators::Navigator;
use crate::identity::{route_for, Identity, Route, RouteTable};
use crate::session::SessionStore;

/// Post-authentication dispatch: persist the identity, then send the user to their home.
pub struct RoleRouter {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    routes: RouteTable,
}

impl RoleRouter {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>, routes: RouteTable) -> Self {
        Self { store, navigator, routes }
    }

    /// Saves `identity` whatever its role, then navigates exactly once.
    ///
    /// An unknown or missing role is not an error: it resolves to the root route. A store write
    /// failure is logged and navigation still happens.
    pub fn dispatch(&self, identity: &Identity) -> Route {
        if let Err(e) = self.store.save(identity) {
            warn!(target: "session", key = self.store.key(), error = %e, "session save failed");
        }
        let route = route_for(identity.role.as_deref());
        if route == Route::Root {
            info!(target: "auth", role = ?identity.role, "unrecognized role, routing to root");
        }
        let path = self.routes.path(route);
        crate::tprintln!("router.dispatch role={:?} dest={}", identity.role, path);
        self.navigator.navigate(path);
        route
    }
}
