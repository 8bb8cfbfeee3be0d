//!
//! rollcall server binary
//! ----------------------
//! Starts the HTTP portal. Configuration comes from `ROLLCALL_*` environment variables;
//! command-line flags override them.

use anyhow::Result;
use std::env;
use tracing_subscriber::{fmt, EnvFilter};

use rollcall::config::{has_flag, PortalConfig};

const USAGE: &str = "rollcall portal server

USAGE:
  rollcall_server [--port N] [--key NAME] [--insecure-cookie]

OPTIONS:
  --port N             HTTP port (env: ROLLCALL_HTTP_PORT, default 7878)
  --key NAME           Session cookie name (env: ROLLCALL_SESSION_KEY, default user)
  --insecure-cookie    Drop the Secure cookie attribute for plain-http development
                       (env: ROLLCALL_COOKIE_SECURE=false)

Route paths can be overridden with ROLLCALL_ROUTE_{ROOT,AUTH,ADMIN,FACULTY,SBO,STUDENT}.";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    let _ = fmt().with_env_filter(filter).try_init();

    let args: Vec<String> = env::args().skip(1).collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = PortalConfig::from_env().apply_args(&args);
    if !config.cookie_secure {
        tracing::warn!(target: "startup", "session cookies are sent without the Secure attribute");
    }
    rollcall::server::run(config).await
}
