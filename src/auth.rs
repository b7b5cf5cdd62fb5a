use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Json,
};
use model::entities::{profile, user_role, user_role::Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, error, trace};

use crate::schemas::{AppState, ErrorResponse};

/// Header carrying the stable subject identifier of the signed-in caller.
pub const SUBJECT_HEADER: &str = "x-auth-subject";
/// Header carrying the caller's email address.
pub const EMAIL_HEADER: &str = "x-auth-email";
/// Header carrying the caller's display name.
pub const NAME_HEADER: &str = "x-auth-name";

/// A resolved caller: the profile row plus its role binding, if any.
///
/// Extracting a `Session` establishes that the request carries a signed-in
/// identity. Whether that identity may reach a given page is decided
/// separately by [`crate::access::require_page`].
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: profile::Model,
    pub role: Option<Role>,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        trace!("Resolving session from request headers");

        let header_value = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let Some(subject) = header_value(SUBJECT_HEADER) else {
            debug!("Request carries no {} header", SUBJECT_HEADER);
            return Err(unauthenticated(
                "Authentication required",
                "UNAUTHENTICATED",
            ));
        };

        let existing = profile::Entity::find()
            .filter(profile::Column::Subject.eq(subject.clone()))
            .one(&state.db)
            .await;

        let profile = match existing {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                // First request from this identity: provision a profile row.
                let (Some(email), Some(full_name)) =
                    (header_value(EMAIL_HEADER), header_value(NAME_HEADER))
                else {
                    debug!("Unknown subject {} without email and name headers", subject);
                    return Err(unauthenticated(
                        "Identity headers are incomplete",
                        "INCOMPLETE_IDENTITY",
                    ));
                };

                let fresh = profile::ActiveModel {
                    subject: Set(subject.clone()),
                    email: Set(email),
                    full_name: Set(full_name),
                    ..Default::default()
                };

                match fresh.insert(&state.db).await {
                    Ok(profile) => {
                        debug!("Provisioned profile {} for subject {}", profile.id, subject);
                        profile
                    }
                    Err(insert_err) => {
                        // A concurrent request may have provisioned the same
                        // subject first; re-read before giving up.
                        match profile::Entity::find()
                            .filter(profile::Column::Subject.eq(subject.clone()))
                            .one(&state.db)
                            .await
                        {
                            Ok(Some(profile)) => profile,
                            _ => {
                                error!(
                                    "Failed to provision profile for subject {}: {}",
                                    subject, insert_err
                                );
                                return Err(database_error());
                            }
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to load profile for subject {}: {}", subject, e);
                return Err(database_error());
            }
        };

        let role = match user_role::Entity::find()
            .filter(user_role::Column::ProfileId.eq(profile.id))
            .one(&state.db)
            .await
        {
            Ok(binding) => binding.map(|binding| binding.role),
            Err(e) => {
                error!(
                    "Failed to load role binding for profile {}: {}",
                    profile.id, e
                );
                return Err(database_error());
            }
        };

        trace!(
            "Session resolved for profile {} with role {:?}",
            profile.id,
            role
        );
        Ok(Session { profile, role })
    }
}

fn unauthenticated(message: &str, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
            success: false,
        }),
    )
}

fn database_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Database operation failed".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}
