use super::role::{route_for, Role, Route};
use super::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Bootstrap has not finished; render a loading state and decide later.
    Wait,
    Redirect(Route),
}

/// Gate a role's home page on the current session.
///
/// No identity sends the user to the auth entry. An identity holding another role goes to
/// that role's own home (or root when the role is unknown), never to an error page.
pub fn guard(ctx: &SessionContext, required: Role) -> Access {
    if ctx.loading {
        return Access::Wait;
    }
    let Some(identity) = ctx.identity.as_ref() else {
        return Access::Redirect(Route::AuthEntry);
    };
    match identity.known_role() {
        Some(r) if r == required => Access::Granted,
        _ => Access::Redirect(route_for(identity.role.as_deref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    #[test]
    fn matching_role_is_granted() {
        let ctx = SessionContext::ready(Some(Identity::with_role("faculty")));
        assert_eq!(guard(&ctx, Role::Faculty), Access::Granted);
    }

    #[test]
    fn anonymous_goes_to_auth() {
        assert_eq!(guard(&SessionContext::ready(None), Role::Admin), Access::Redirect(Route::AuthEntry));
    }

    #[test]
    fn other_role_goes_to_its_own_home() {
        let ctx = SessionContext::ready(Some(Identity::with_role("student")));
        assert_eq!(guard(&ctx, Role::Admin), Access::Redirect(Route::StudentHome));
        let ctx = SessionContext::ready(Some(Identity::with_role("guest")));
        assert_eq!(guard(&ctx, Role::Sbo), Access::Redirect(Route::Root));
    }

    #[test]
    fn loading_waits() {
        assert_eq!(guard(&SessionContext::default(), Role::Student), Access::Wait);
    }
}
