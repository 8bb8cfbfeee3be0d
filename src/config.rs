//! Runtime configuration: `ROLLCALL_*` environment variables with command-line flags on top.

use std::path::PathBuf;

use crate::identity::RouteTable;
use crate::session::DEFAULT_SESSION_KEY;

pub const DEFAULT_HTTP_PORT: u16 = 7878;
pub const DEFAULT_SESSION_DIR: &str = ".rollcall";

#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    pub http_port: u16,
    /// Cookie name on the HTTP surface, file stem for the local store.
    pub session_key: String,
    pub session_dir: PathBuf,
    /// Adds `Secure` to session cookies; turn off only for plain-http development.
    pub cookie_secure: bool,
    pub routes: RouteTable,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            cookie_secure: true,
            routes: RouteTable::default(),
        }
    }
}

pub fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Value following `flag`, if any.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            return args.get(i + 1).map(|s| s.as_str());
        }
        i += 1;
    }
    None
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(port) = lookup("ROLLCALL_HTTP_PORT").and_then(|v| v.parse::<u16>().ok()) {
            cfg.http_port = port;
        }
        if let Some(key) = lookup("ROLLCALL_SESSION_KEY").filter(|s| !s.is_empty()) {
            cfg.session_key = key;
        }
        if let Some(dir) = lookup("ROLLCALL_SESSION_DIR").filter(|s| !s.is_empty()) {
            cfg.session_dir = PathBuf::from(dir);
        }
        if let Some(secure) = lookup("ROLLCALL_COOKIE_SECURE").as_deref().and_then(parse_bool) {
            cfg.cookie_secure = secure;
        }
        let routes = &mut cfg.routes;
        for (var, slot) in [
            ("ROLLCALL_ROUTE_ROOT", &mut routes.root),
            ("ROLLCALL_ROUTE_AUTH", &mut routes.auth),
            ("ROLLCALL_ROUTE_ADMIN", &mut routes.admin),
            ("ROLLCALL_ROUTE_FACULTY", &mut routes.faculty),
            ("ROLLCALL_ROUTE_SBO", &mut routes.sbo),
            ("ROLLCALL_ROUTE_STUDENT", &mut routes.student),
        ] {
            if let Some(path) = lookup(var).filter(|p| RouteTable::is_valid_path(p)) {
                *slot = path;
            }
        }
        cfg
    }

    /// Command-line flags override whatever the environment set.
    pub fn apply_args(mut self, args: &[String]) -> Self {
        if let Some(port) = flag_value(args, "--port").and_then(|v| v.parse::<u16>().ok()) {
            self.http_port = port;
        }
        if let Some(dir) = flag_value(args, "--dir") {
            self.session_dir = PathBuf::from(dir);
        }
        if let Some(key) = flag_value(args, "--key").filter(|s| !s.is_empty()) {
            self.session_key = key.to_string();
        }
        if has_flag(args, "--insecure-cookie") {
            self.cookie_secure = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = PortalConfig::from_lookup(|_| None);
        assert_eq!(cfg, PortalConfig::default());
        assert_eq!(cfg.session_key, "user");
        assert!(cfg.cookie_secure);
    }

    #[test]
    fn env_overrides() {
        let cfg = PortalConfig::from_lookup(lookup_from(&[
            ("ROLLCALL_HTTP_PORT", "9000"),
            ("ROLLCALL_SESSION_KEY", "portal_user"),
            ("ROLLCALL_COOKIE_SECURE", "off"),
            ("ROLLCALL_ROUTE_STUDENT", "/student/dashboard"),
            ("ROLLCALL_ROUTE_ADMIN", "admin"),
            ("ROLLCALL_ROUTE_SBO", "/{sbo"),
            ("ROLLCALL_ROUTE_FACULTY", "/faculty/:id"),
        ]));
        assert_eq!(cfg.http_port, 9000);
        assert_eq!(cfg.session_key, "portal_user");
        assert!(!cfg.cookie_secure);
        assert_eq!(cfg.routes.student, "/student/dashboard");
        // relative and capture-syntax paths are ignored
        assert_eq!(cfg.routes.admin, "/admin");
        assert_eq!(cfg.routes.sbo, "/sbo");
        assert_eq!(cfg.routes.faculty, "/faculty");
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = PortalConfig::from_lookup(lookup_from(&[("ROLLCALL_HTTP_PORT", "http"), ("ROLLCALL_COOKIE_SECURE", "maybe")]));
        assert_eq!(cfg.http_port, DEFAULT_HTTP_PORT);
        assert!(cfg.cookie_secure);
    }

    #[test]
    fn args_override_env() {
        let args: Vec<String> = ["--port", "8081", "--dir", "/tmp/p", "--insecure-cookie"].iter().map(|s| s.to_string()).collect();
        let cfg = PortalConfig::from_lookup(lookup_from(&[("ROLLCALL_HTTP_PORT", "9000")])).apply_args(&args);
        assert_eq!(cfg.http_port, 8081);
        assert_eq!(cfg.session_dir, PathBuf::from("/tmp/p"));
        assert!(!cfg.cookie_secure);
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("sure"), None);
    }
}
