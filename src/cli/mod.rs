//! Local session shell: the session flow over a profile-directory store, driven from the
//! command line or an interactive loop.

mod console;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

pub use console::{ConsoleNavigator, ConsoleNotifier};

use crate::config::PortalConfig;
use crate::identity::{route_for, Identity, RouteTable, SessionContext};
use crate::portal::{IdentityLoader, Navigator, Notifier, RoleRouter};
use crate::session::{FileSessionStore, SessionStore};

pub const HELP: &str = "Commands:
  login <json>     persist an identity from the auth form and go to its home
  whoami           show the current identity
  reload           re-read the session store
  route <role>     show where a role is sent after login
  logout           clear the session and return to the auth entry
  help             show this help
  quit | exit      leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    WhoAmI,
    Reload,
    Route(String),
    Logout,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let cmd = match head.to_ascii_lowercase().as_str() {
            "login" => Command::Login(rest.to_string()),
            "whoami" => Command::WhoAmI,
            "reload" => Command::Reload,
            "route" => Command::Route(rest.to_string()),
            "logout" => Command::Logout,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(cmd)
    }
}

/// Command-line words left once the shell's flags, and the values of flags that take one, are
/// removed.
pub fn command_words(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "--key" | "--port" => i += 2,
            "--repl" | "--insecure-cookie" | "--help" | "-h" => i += 1,
            _ => {
                out.push(args[i].clone());
                i += 1;
            }
        }
    }
    out
}

pub fn describe(ctx: &SessionContext) -> String {
    match &ctx.identity {
        Some(id) => format!("{} ({})", id.display_name(), id.role.as_deref().unwrap_or("no role")),
        None if ctx.loading => "loading".to_string(),
        None => "not logged in".to_string(),
    }
}

pub struct Shell {
    loader: IdentityLoader,
    router: RoleRouter,
    routes: RouteTable,
}

impl Shell {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        routes: RouteTable,
    ) -> Self {
        let loader = IdentityLoader::new(store.clone(), notifier, navigator.clone(), routes.clone());
        let router = RoleRouter::new(store, navigator, routes.clone());
        Self { loader, router, routes }
    }

    /// Shell over `<session_dir>/<session_key>.json` with console collaborators.
    pub fn open(config: &PortalConfig) -> Result<Self> {
        let store = FileSessionStore::new(&config.session_dir, &config.session_key)
            .with_context(|| format!("While opening session store under {}", config.session_dir.display()))?;
        Ok(Self::new(Arc::new(store), Arc::new(ConsoleNotifier), Arc::new(ConsoleNavigator), config.routes.clone()))
    }

    pub fn start(&self) -> SessionContext {
        self.loader.init()
    }

    pub fn context(&self) -> SessionContext {
        self.loader.context()
    }

    /// Run one command and return the text to show.
    pub fn execute(&self, cmd: Command) -> Result<String> {
        match cmd {
            Command::Login(text) => {
                if text.is_empty() {
                    return Err(anyhow!("usage: login <identity json>"));
                }
                let value: serde_json::Value = serde_json::from_str(&text).context("identity is not valid JSON")?;
                if !value.is_object() {
                    return Err(anyhow!("identity must be a JSON object"));
                }
                let identity: Identity = serde_json::from_value(value).context("identity has unexpected field types")?;
                let route = self.router.dispatch(&identity);
                // The destination page bootstraps from the store just like any later page load.
                let ctx = self.loader.reload();
                Ok(format!("logged in as {} at {}", describe(&ctx), self.routes.path(route)))
            }
            Command::WhoAmI => Ok(describe(&self.loader.context())),
            Command::Reload => Ok(describe(&self.loader.reload())),
            Command::Route(role) => {
                let role = if role.is_empty() { None } else { Some(role.as_str()) };
                Ok(self.routes.path(route_for(role)).to_string())
            }
            Command::Logout => {
                self.loader.logout();
                Ok("logged out".to_string())
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
            Command::Unknown(line) => Err(anyhow!("unknown command '{}' (try 'help')", line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::{FlashNotifier, RecordingNavigator};
    use crate::session::MemorySessionStore;

    fn shell() -> (Arc<MemorySessionStore>, Arc<RecordingNavigator>, Shell) {
        let store = Arc::new(MemorySessionStore::default());
        let nav = Arc::new(RecordingNavigator::new());
        let sh = Shell::new(store.clone(), Arc::new(FlashNotifier::new()), nav.clone(), RouteTable::default());
        (store, nav, sh)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  "), None);
        assert_eq!(Command::parse("WHOAMI"), Some(Command::WhoAmI));
        assert_eq!(
            Command::parse(r#"login {"role": "sbo"}"#),
            Some(Command::Login(r#"{"role": "sbo"}"#.to_string()))
        );
        assert_eq!(Command::parse("route student"), Some(Command::Route("student".into())));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("dance"), Some(Command::Unknown("dance".into())));
    }

    #[test]
    fn command_words_skip_flags_and_values() {
        let args: Vec<String> = ["--port", "9000", "whoami", "--insecure-cookie", "--dir", "/tmp/p", "--key", "k"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(command_words(&args), vec!["whoami".to_string()]);
        let args: Vec<String> = ["route", "--repl", "sbo", "--port"].iter().map(|s| s.to_string()).collect();
        assert_eq!(command_words(&args), vec!["route".to_string(), "sbo".to_string()]);
        assert!(command_words(&[]).is_empty());
    }

    #[test]
    fn login_persists_and_navigates() {
        let (store, nav, sh) = shell();
        sh.start();
        let out = sh.execute(Command::Login(r#"{"role":"student","full_name":"Jane Doe","id":7}"#.into())).unwrap();
        assert_eq!(out, "logged in as Jane Doe (student) at /student");
        assert_eq!(nav.last().as_deref(), Some("/student"));
        assert!(store.contains_key());
        assert_eq!(sh.execute(Command::WhoAmI).unwrap(), "Jane Doe (student)");
    }

    #[test]
    fn login_rejects_non_objects() {
        let (store, _, sh) = shell();
        assert!(sh.execute(Command::Login("[1]".into())).is_err());
        assert!(sh.execute(Command::Login("{oops".into())).is_err());
        assert!(sh.execute(Command::Login(String::new())).is_err());
        assert!(!store.contains_key());
    }

    #[test]
    fn route_command_is_pure() {
        let (store, nav, sh) = shell();
        assert_eq!(sh.execute(Command::Route("faculty".into())).unwrap(), "/faculty");
        assert_eq!(sh.execute(Command::Route("guest".into())).unwrap(), "/");
        assert_eq!(sh.execute(Command::Route(String::new())).unwrap(), "/");
        assert!(nav.visits().is_empty());
        assert!(!store.contains_key());
    }

    #[test]
    fn logout_then_whoami() {
        let (_, nav, sh) = shell();
        sh.execute(Command::Login(r#"{"role":"admin","first_name":"Ana"}"#.into())).unwrap();
        assert_eq!(sh.execute(Command::Logout).unwrap(), "logged out");
        assert_eq!(sh.execute(Command::WhoAmI).unwrap(), "not logged in");
        assert_eq!(nav.last().as_deref(), Some("/auth"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let (_, _, sh) = shell();
        assert!(sh.execute(Command::Unknown("dance".into())).is_err());
    }
}
