use crate::access::{require_page, AdminPage};
use crate::auth::Session;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{profile, user_role, user_role::Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for listing users
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct UserListQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

/// Request body for assigning a role to a profile
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignRoleRequest {
    /// Role name: super_admin, manager, secretary, director or auditor
    pub role: String,
}

/// A profile together with its role binding, if any
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithRoleResponse {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    /// Bound role, or null while the account awaits approval
    pub role: Option<String>,
    /// Profile that granted the role
    pub granted_by: Option<i32>,
}

/// The role binding resulting from an assignment
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleBindingResponse {
    pub profile_id: i32,
    pub role: String,
    pub granted_by: Option<i32>,
}

impl From<user_role::Model> for RoleBindingResponse {
    fn from(model: user_role::Model) -> Self {
        Self {
            profile_id: model.profile_id,
            role: model.role.to_string(),
            granted_by: model.granted_by,
        }
    }
}

/// List profiles with their role bindings
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserWithRoleResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn list_users(
    session: Session,
    Valid(Query(query)): Valid<Query<UserListQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserWithRoleResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering list_users function");
    require_page(&session, AdminPage::UserManagement)?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    debug!("Listing users - page: {}, limit: {}", page, limit);

    let profiles = match profile::Entity::find()
        .order_by_asc(profile::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await
    {
        Ok(profiles) => profiles,
        Err(db_error) => {
            error!("Failed to list profiles: {}", db_error);
            let error_response = ErrorResponse {
                error: "Failed to list users".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    let mut bindings_by_profile: HashMap<i32, user_role::Model> = HashMap::new();
    if !profiles.is_empty() {
        let profile_ids: Vec<i32> = profiles.iter().map(|profile| profile.id).collect();
        let bindings = match user_role::Entity::find()
            .filter(user_role::Column::ProfileId.is_in(profile_ids))
            .all(&state.db)
            .await
        {
            Ok(bindings) => bindings,
            Err(db_error) => {
                error!("Failed to load role bindings: {}", db_error);
                let error_response = ErrorResponse {
                    error: "Failed to list users".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                };
                return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
            }
        };
        for binding in bindings {
            bindings_by_profile.insert(binding.profile_id, binding);
        }
    }

    let user_count = profiles.len();
    let users: Vec<UserWithRoleResponse> = profiles
        .into_iter()
        .map(|profile| {
            let binding = bindings_by_profile.remove(&profile.id);
            UserWithRoleResponse {
                id: profile.id,
                email: profile.email,
                full_name: profile.full_name,
                role: binding.as_ref().map(|binding| binding.role.to_string()),
                granted_by: binding.and_then(|binding| binding.granted_by),
            }
        })
        .collect();

    info!("Successfully listed {} user(s)", user_count);
    let response = ApiResponse {
        data: users,
        message: "Users retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Assign a role to a profile, replacing any previous binding
#[utoipa::path(
    put,
    path = "/api/v1/users/{profile_id}/role",
    tag = "users",
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role assigned successfully", body = ApiResponse<RoleBindingResponse>),
        (status = 400, description = "Unknown role name", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn assign_role(
    session: Session,
    Path(profile_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<Json<ApiResponse<RoleBindingResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering assign_role function");
    require_page(&session, AdminPage::UserManagement)?;
    debug!(
        "Assigning role '{}' to profile {} on behalf of profile {}",
        request.role, profile_id, session.profile.id
    );

    // Parse the role name
    let role = match request.role.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            warn!("Rejected role assignment: {}", e);
            let error_response = ErrorResponse {
                error: e,
                code: "INVALID_ROLE".to_string(),
                success: false,
            };
            return Err((StatusCode::BAD_REQUEST, Json(error_response)));
        }
    };

    // Validate that the profile exists
    match profile::Entity::find_by_id(profile_id).one(&state.db).await {
        Ok(Some(_profile)) => {
            debug!("Profile {} found, proceeding with role assignment", profile_id);
        }
        Ok(None) => {
            warn!(
                "Attempted to assign role to non-existent profile {}",
                profile_id
            );
            let error_response = ErrorResponse {
                error: format!("Profile with id {} does not exist", profile_id),
                code: "PROFILE_NOT_FOUND".to_string(),
                success: false,
            };
            return Err((StatusCode::NOT_FOUND, Json(error_response)));
        }
        Err(db_error) => {
            error!(
                "Database error while validating profile {}: {}",
                profile_id, db_error
            );
            let error_response = ErrorResponse {
                error: "Failed to assign role".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    }

    // A profile holds at most one role, so an assignment replaces the binding
    let existing = match user_role::Entity::find()
        .filter(user_role::Column::ProfileId.eq(profile_id))
        .one(&state.db)
        .await
    {
        Ok(existing) => existing,
        Err(db_error) => {
            error!(
                "Failed to look up role binding for profile {}: {}",
                profile_id, db_error
            );
            let error_response = ErrorResponse {
                error: "Failed to assign role".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    let saved = match existing {
        Some(binding) => {
            let mut updated: user_role::ActiveModel = binding.into();
            updated.role = Set(role);
            updated.granted_by = Set(Some(session.profile.id));
            updated.update(&state.db).await
        }
        None => {
            let fresh = user_role::ActiveModel {
                profile_id: Set(profile_id),
                role: Set(role),
                granted_by: Set(Some(session.profile.id)),
                ..Default::default()
            };
            fresh.insert(&state.db).await
        }
    };

    match saved {
        Ok(binding) => {
            info!(
                "Role '{}' assigned to profile {} by profile {}",
                binding.role, profile_id, session.profile.id
            );
            let response = ApiResponse {
                data: RoleBindingResponse::from(binding),
                message: "Role assigned successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to save role binding for profile {}: {}",
                profile_id, db_error
            );
            let error_response = ErrorResponse {
                error: "Failed to assign role".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}

/// Remove a profile's role binding
#[utoipa::path(
    delete,
    path = "/api/v1/users/{profile_id}/role",
    tag = "users",
    responses(
        (status = 200, description = "Role removed successfully", body = ApiResponse<String>),
        (status = 400, description = "Cannot remove own role", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "No role binding for this profile", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn remove_role(
    session: Session,
    Path(profile_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering remove_role function");
    require_page(&session, AdminPage::UserManagement)?;
    debug!(
        "Removing role from profile {} on behalf of profile {}",
        profile_id, session.profile.id
    );

    // A super admin stripping their own role would lock user management
    if profile_id == session.profile.id {
        warn!(
            "Profile {} attempted to remove its own role",
            session.profile.id
        );
        let error_response = ErrorResponse {
            error: "You cannot remove your own role".to_string(),
            code: "SELF_ROLE_REMOVAL".to_string(),
            success: false,
        };
        return Err((StatusCode::BAD_REQUEST, Json(error_response)));
    }

    match user_role::Entity::delete_many()
        .filter(user_role::Column::ProfileId.eq(profile_id))
        .exec(&state.db)
        .await
    {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            if delete_result.rows_affected > 0 {
                info!(
                    "Role removed from profile {} by profile {}",
                    profile_id, session.profile.id
                );
                let response = ApiResponse {
                    data: format!("Role removed from profile {}", profile_id),
                    message: "Role removed successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("No role binding to remove for profile {}", profile_id);
                let error_response = ErrorResponse {
                    error: format!("Profile {} has no role binding", profile_id),
                    code: "NO_ROLE_BINDING".to_string(),
                    success: false,
                };
                Err((StatusCode::NOT_FOUND, Json(error_response)))
            }
        }
        Err(db_error) => {
            error!(
                "Failed to remove role from profile {}: {}",
                profile_id, db_error
            );
            let error_response = ErrorResponse {
                error: "Failed to remove role".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}
