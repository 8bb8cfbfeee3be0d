//! Identity model, role routing and page access for the attendance portal.
//! Keep the public surface thin and split implementation across sub-modules.

mod record;
mod role;
mod context;
mod access;

pub use record::{Identity, GENERIC_DISPLAY_NAME};
pub use role::{Role, Route, RouteTable, route_for};
pub use context::SessionContext;
pub use access::{Access, guard};
