//!
//! rollcall HTTP portal
//! --------------------
//! Axum surface over the session flow. Every request gets its own cookie-backed session store,
//! so the browser's cookie jar plays the part of the persisted session key.
//!
//! Responsibilities:
//! - Auth form callback that persists the identity and redirects to the role's home.
//! - Role home pages gated by the access guard.
//! - Session introspection and logout.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::config::PortalConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{guard, Access, Identity, Role, RouteTable};
use crate::portal::{FlashNotifier, IdentityLoader, Navigator, RecordingNavigator, RoleRouter};
use crate::session::CookieSessionStore;

pub const LOGOUT_PATH: &str = "/logout";
pub const SESSION_PATH: &str = "/session";

/// Shared server state injected into all handlers. Read-only: session state lives in cookies.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
}

/// Collaborators for one request.
struct RequestSession {
    store: Arc<CookieSessionStore>,
    flash: Arc<FlashNotifier>,
    nav: Arc<RecordingNavigator>,
    routes: RouteTable,
}

impl RequestSession {
    fn new(state: &AppState, headers: &HeaderMap) -> Self {
        let cfg = &state.config;
        Self {
            store: Arc::new(CookieSessionStore::from_headers(headers, &cfg.session_key, cfg.cookie_secure)),
            flash: Arc::new(FlashNotifier::new()),
            nav: Arc::new(RecordingNavigator::new()),
            routes: cfg.routes.clone(),
        }
    }

    fn loader(&self) -> IdentityLoader {
        IdentityLoader::new(self.store.clone(), self.flash.clone(), self.nav.clone(), self.routes.clone())
    }

    fn router(&self) -> RoleRouter {
        RoleRouter::new(self.store.clone(), self.nav.clone(), self.routes.clone())
    }

    /// Turn the request's side effects into a response: queued cookies always go out, a
    /// navigation becomes `303 See Other`, otherwise the page body is returned.
    fn finish(self, page: Value) -> Response {
        let mut headers = HeaderMap::new();
        self.store.apply(&mut headers);
        match self.nav.last() {
            Some(dest) => (headers, Redirect::to(&dest)).into_response(),
            None => {
                let mut body = page;
                if let Value::Object(map) = &mut body {
                    map.insert("notifications".into(), json!(self.flash.take()));
                }
                (headers, Json(body)).into_response()
            }
        }
    }
}

fn session_callback_path(routes: &RouteTable) -> String {
    format!("{}{}", routes.auth.trim_end_matches('/'), SESSION_PATH)
}

/// Build the portal router. Fails when a configured path is not a plain literal route or two
/// paths collide.
pub fn build_router(config: PortalConfig) -> anyhow::Result<Router> {
    let routes = config.routes.clone();
    let callback = session_callback_path(&routes);
    let mut paths: Vec<&str> = routes.paths().to_vec();
    paths.extend([callback.as_str(), SESSION_PATH, LOGOUT_PATH]);
    let mut seen = HashSet::new();
    for p in paths {
        if !RouteTable::is_valid_path(p) {
            return Err(anyhow!("route path must be an absolute literal path: {}", p));
        }
        if !seen.insert(p) {
            return Err(anyhow!("route path configured twice: {}", p));
        }
    }

    let state = AppState { config: Arc::new(config) };
    let app = Router::new()
        .route(&routes.root, get(root_page))
        .route(&routes.auth, get(auth_page))
        .route(&callback, post(auth_callback))
        .route(&routes.admin, get(|s: State<AppState>, h: HeaderMap| home_page(s, h, Role::Admin)))
        .route(&routes.faculty, get(|s: State<AppState>, h: HeaderMap| home_page(s, h, Role::Faculty)))
        .route(&routes.sbo, get(|s: State<AppState>, h: HeaderMap| home_page(s, h, Role::Sbo)))
        .route(&routes.student, get(|s: State<AppState>, h: HeaderMap| home_page(s, h, Role::Student)))
        .route(SESSION_PATH, get(session_info))
        .route(LOGOUT_PATH, post(logout))
        .with_state(state);
    Ok(app)
}

/// Serve on an already-bound listener.
pub async fn serve(listener: tokio::net::TcpListener, config: PortalConfig) -> anyhow::Result<()> {
    let app = build_router(config)?;
    let addr = listener.local_addr().ok();
    info!(target: "startup", ?addr, "rollcall portal listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run(config: PortalConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(
        target: "startup",
        "rollcall starting: http_port={}, session_key='{}', cookie_secure={}",
        config.http_port, config.session_key, config.cookie_secure
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    serve(listener, config).await
}

async fn root_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let rs = RequestSession::new(&state, &headers);
    let ctx = rs.loader().init();
    rs.finish(json!({"status": "ok", "page": "root", "session": ctx}))
}

async fn auth_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let rs = RequestSession::new(&state, &headers);
    let ctx = rs.loader().init();
    rs.finish(json!({"status": "ok", "page": "auth", "session": ctx}))
}

/// Called by the auth form once credentials have been accepted.
async fn auth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> AppResult<Response> {
    if !payload.is_object() {
        return Err(AppError::user("malformed_identity", "identity must be a JSON object"));
    }
    let identity: Identity = serde_json::from_value(payload)
        .map_err(|e| AppError::UserInput { code: "malformed_identity".into(), message: e.to_string() })?;
    let rs = RequestSession::new(&state, &headers);
    let route = rs.router().dispatch(&identity);
    info!(target: "auth", role = ?identity.role, ?route, "login dispatched");
    Ok(rs.finish(json!({"status": "ok"})))
}

async fn home_page(State(state): State<AppState>, headers: HeaderMap, required: Role) -> Response {
    let rs = RequestSession::new(&state, &headers);
    let ctx = rs.loader().init();
    match guard(&ctx, required) {
        Access::Granted => rs.finish(json!({
            "status": "ok",
            "page": required.as_str(),
            "identity": ctx.identity,
        })),
        Access::Redirect(route) => {
            rs.nav.navigate(rs.routes.path(route));
            rs.finish(json!({"status": "redirect"}))
        }
        Access::Wait => rs.finish(json!({"status": "loading", "page": required.as_str()})),
    }
}

async fn session_info(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let rs = RequestSession::new(&state, &headers);
    let ctx = rs.loader().init();
    rs.finish(json!({"status": "ok", "session": ctx}))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let rs = RequestSession::new(&state, &headers);
    rs.loader().logout();
    rs.finish(json!({"status": "ok"}))
}
