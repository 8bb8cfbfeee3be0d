use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The closed set of portal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Faculty,
    Sbo,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Faculty, Role::Sbo, Role::Student];

    /// Case-sensitive: "Admin" is not a role.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "faculty" => Some(Role::Faculty),
            "sbo" => Some(Role::Sbo),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
            Role::Sbo => "sbo",
            Role::Student => "student",
        }
    }

    pub fn home(&self) -> Route {
        match self {
            Role::Admin => Route::AdminHome,
            Role::Faculty => Route::FacultyHome,
            Role::Sbo => Route::SboHome,
            Role::Student => Route::StudentHome,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destinations the session core navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Root,
    AuthEntry,
    AdminHome,
    FacultyHome,
    SboHome,
    StudentHome,
}

/// Map a raw role value to its home. Anything outside the known set, absent included,
/// lands on the application root.
pub fn route_for(role: Option<&str>) -> Route {
    role.and_then(Role::parse).map(|r| r.home()).unwrap_or(Route::Root)
}

/// Resolves routes to concrete paths. Defaults match the portal's page layout; every entry can
/// be overridden through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub root: String,
    pub auth: String,
    pub admin: String,
    pub faculty: String,
    pub sbo: String,
    pub student: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            root: "/".into(),
            auth: "/auth".into(),
            admin: "/admin".into(),
            faculty: "/faculty".into(),
            sbo: "/sbo".into(),
            student: "/student".into(),
        }
    }
}

impl RouteTable {
    /// Whether `path` is a literal route the HTTP router can mount: absolute, with no capture
    /// or wildcard syntax (`{`, `}`, `*`, or a segment starting with `:`).
    pub fn is_valid_path(path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else { return false; };
        rest.split('/').all(|seg| {
            !seg.starts_with(':') && !seg.chars().any(|c| matches!(c, '{' | '}' | '*') || c.is_whitespace())
        })
    }

    pub fn paths(&self) -> [&str; 6] {
        [&self.root, &self.auth, &self.admin, &self.faculty, &self.sbo, &self.student]
    }

    pub fn path(&self, route: Route) -> &str {
        match route {
            Route::Root => &self.root,
            Route::AuthEntry => &self.auth,
            Route::AdminHome => &self.admin,
            Route::FacultyHome => &self.faculty,
            Route::SboHome => &self.sbo,
            Route::StudentHome => &self.student,
        }
    }

    pub fn home_path(&self, role: Role) -> &str {
        self.path(role.home())
    }
}
