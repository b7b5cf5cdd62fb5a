use crate::access::{evaluate, AccessState, AdminPage, AuthFacts};
use crate::auth::Session;
use crate::schemas::ApiResponse;
use axum::response::Json;
use model::entities::profile;
use serde::Serialize;
use tracing::{instrument, trace};
use utoipa::ToSchema;

/// The signed-in profile
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
        }
    }
}

/// The caller's identity, role, and reachable pages
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub profile: ProfileResponse,
    /// Bound role, or null while the account awaits approval
    pub role: Option<String>,
    /// Slugs of the pages this caller may open
    pub pages: Vec<String>,
}

/// Get the caller's session
#[utoipa::path(
    get,
    path = "/api/v1/session",
    tag = "session",
    responses(
        (status = 200, description = "Session retrieved successfully", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_session(session: Session) -> Json<ApiResponse<SessionResponse>> {
    trace!("Entering get_session function");

    let facts = AuthFacts::SignedIn { role: session.role };
    let pages: Vec<String> = AdminPage::ALL
        .iter()
        .filter(|page| evaluate(facts, page.allowed_roles()) == AccessState::Authorized)
        .map(|page| page.slug().to_string())
        .collect();

    let response = ApiResponse {
        data: SessionResponse {
            role: session.role.map(|role| role.to_string()),
            profile: ProfileResponse::from(session.profile),
            pages,
        },
        message: "Session retrieved successfully".to_string(),
        success: true,
    };
    Json(response)
}
