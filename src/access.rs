use axum::{http::StatusCode, response::Json};
use model::entities::user_role::Role;
use tracing::warn;

use crate::auth::Session;
use crate::schemas::ErrorResponse;

/// Back-office pages guarded by role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPage {
    Dashboard,
    SalesEntry,
    Reports,
    UserManagement,
}

impl AdminPage {
    /// Every guarded page, in sidebar order.
    pub const ALL: [AdminPage; 4] = [
        AdminPage::Dashboard,
        AdminPage::SalesEntry,
        AdminPage::Reports,
        AdminPage::UserManagement,
    ];

    /// The fixed set of roles allowed to open this page.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            AdminPage::Dashboard => &[
                Role::SuperAdmin,
                Role::Manager,
                Role::Secretary,
                Role::Director,
                Role::Auditor,
            ],
            AdminPage::SalesEntry => &[Role::SuperAdmin, Role::Manager, Role::Secretary],
            AdminPage::Reports => &[
                Role::SuperAdmin,
                Role::Manager,
                Role::Director,
                Role::Auditor,
            ],
            AdminPage::UserManagement => &[Role::SuperAdmin],
        }
    }

    /// Stable identifier used in session payloads and log lines.
    pub fn slug(&self) -> &'static str {
        match self {
            AdminPage::Dashboard => "dashboard",
            AdminPage::SalesEntry => "sales-entry",
            AdminPage::Reports => "reports",
            AdminPage::UserManagement => "user-management",
        }
    }
}

/// What the identity layer knows about the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFacts {
    /// Authentication status has not been resolved yet.
    Unresolved,
    /// No signed-in identity.
    SignedOut,
    /// A signed-in identity, with or without a role binding.
    SignedIn { role: Option<Role> },
}

/// Outcome of gating a page against the caller's authentication facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// Authentication is still being resolved; show nothing yet.
    Loading,
    /// Not signed in; the caller must authenticate first.
    Unauthenticated,
    /// Signed in but no role bound yet; the account awaits approval.
    Pending,
    Authorized,
    Forbidden,
}

/// Evaluates the access decision for a set of allowed roles. An empty set
/// means the page only requires a signed-in caller with a bound role.
pub fn evaluate(facts: AuthFacts, allowed: &[Role]) -> AccessState {
    match facts {
        AuthFacts::Unresolved => AccessState::Loading,
        AuthFacts::SignedOut => AccessState::Unauthenticated,
        AuthFacts::SignedIn { role: None } => AccessState::Pending,
        AuthFacts::SignedIn { role: Some(role) } => {
            if allowed.is_empty() || allowed.contains(&role) {
                AccessState::Authorized
            } else {
                AccessState::Forbidden
            }
        }
    }
}

/// Gates a handler on a page's role set, mapping the decision to an HTTP
/// error response. The session extractor has already established a
/// signed-in caller, so only the pending and forbidden outcomes map to
/// errors here.
pub fn require_page(
    session: &Session,
    page: AdminPage,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let facts = AuthFacts::SignedIn { role: session.role };
    match evaluate(facts, page.allowed_roles()) {
        AccessState::Authorized => Ok(()),
        AccessState::Pending => {
            warn!(
                "Profile {} tried to open {} before role approval",
                session.profile.id,
                page.slug()
            );
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Your account is awaiting role approval".to_string(),
                    code: "ACCESS_PENDING".to_string(),
                    success: false,
                }),
            ))
        }
        _ => {
            warn!(
                "Profile {} denied access to {}",
                session.profile.id,
                page.slug()
            );
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: format!("You do not have access to the {} page", page.slug()),
                    code: "ACCESS_DENIED".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_facts_are_loading() {
        assert_eq!(
            evaluate(AuthFacts::Unresolved, &[Role::SuperAdmin]),
            AccessState::Loading
        );
        assert_eq!(evaluate(AuthFacts::Unresolved, &[]), AccessState::Loading);
    }

    #[test]
    fn test_signed_out_is_unauthenticated() {
        assert_eq!(
            evaluate(AuthFacts::SignedOut, &[Role::SuperAdmin]),
            AccessState::Unauthenticated
        );
    }

    #[test]
    fn test_signed_in_without_role_is_pending() {
        assert_eq!(
            evaluate(AuthFacts::SignedIn { role: None }, &[Role::SuperAdmin]),
            AccessState::Pending
        );
        // Pending wins even when the page has no role restriction
        assert_eq!(
            evaluate(AuthFacts::SignedIn { role: None }, &[]),
            AccessState::Pending
        );
    }

    #[test]
    fn test_allowed_role_is_authorized() {
        assert_eq!(
            evaluate(
                AuthFacts::SignedIn {
                    role: Some(Role::SuperAdmin)
                },
                &[Role::SuperAdmin]
            ),
            AccessState::Authorized
        );
    }

    #[test]
    fn test_disallowed_role_is_forbidden() {
        assert_eq!(
            evaluate(
                AuthFacts::SignedIn {
                    role: Some(Role::Auditor)
                },
                &[Role::SuperAdmin]
            ),
            AccessState::Forbidden
        );
    }

    #[test]
    fn test_empty_allowed_set_admits_any_bound_role() {
        for role in [
            Role::SuperAdmin,
            Role::Manager,
            Role::Secretary,
            Role::Director,
            Role::Auditor,
        ] {
            assert_eq!(
                evaluate(AuthFacts::SignedIn { role: Some(role) }, &[]),
                AccessState::Authorized
            );
        }
    }

    #[test]
    fn test_dashboard_admits_every_role() {
        for role in [
            Role::SuperAdmin,
            Role::Manager,
            Role::Secretary,
            Role::Director,
            Role::Auditor,
        ] {
            assert_eq!(
                evaluate(
                    AuthFacts::SignedIn { role: Some(role) },
                    AdminPage::Dashboard.allowed_roles()
                ),
                AccessState::Authorized
            );
        }
    }

    #[test]
    fn test_sales_entry_excludes_director_and_auditor() {
        let allowed = AdminPage::SalesEntry.allowed_roles();
        for role in [Role::SuperAdmin, Role::Manager, Role::Secretary] {
            assert_eq!(
                evaluate(AuthFacts::SignedIn { role: Some(role) }, allowed),
                AccessState::Authorized
            );
        }
        for role in [Role::Director, Role::Auditor] {
            assert_eq!(
                evaluate(AuthFacts::SignedIn { role: Some(role) }, allowed),
                AccessState::Forbidden
            );
        }
    }

    #[test]
    fn test_reports_excludes_secretary() {
        let allowed = AdminPage::Reports.allowed_roles();
        for role in [
            Role::SuperAdmin,
            Role::Manager,
            Role::Director,
            Role::Auditor,
        ] {
            assert_eq!(
                evaluate(AuthFacts::SignedIn { role: Some(role) }, allowed),
                AccessState::Authorized
            );
        }
        assert_eq!(
            evaluate(
                AuthFacts::SignedIn {
                    role: Some(Role::Secretary)
                },
                allowed
            ),
            AccessState::Forbidden
        );
    }

    #[test]
    fn test_user_management_is_super_admin_only() {
        let allowed = AdminPage::UserManagement.allowed_roles();
        assert_eq!(
            evaluate(
                AuthFacts::SignedIn {
                    role: Some(Role::SuperAdmin)
                },
                allowed
            ),
            AccessState::Authorized
        );
        for role in [
            Role::Manager,
            Role::Secretary,
            Role::Director,
            Role::Auditor,
        ] {
            assert_eq!(
                evaluate(AuthFacts::SignedIn { role: Some(role) }, allowed),
                AccessState::Forbidden
            );
        }
    }
}
