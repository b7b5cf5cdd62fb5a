use anyhow::{anyhow, Result};
use model::entities::{profile, user_role, user_role::Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter, Set};
use tracing::{debug, error, info, trace};

pub async fn grant_role(email: &str, role_name: &str, database_url: &str) -> Result<()> {
    trace!("Entering grant_role function");
    info!("Granting role '{}' to {}", role_name, email);
    debug!("Database URL: {}", database_url);

    let role = match role_name.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            error!("Cannot grant role: {}", e);
            return Err(anyhow!(e));
        }
    };

    trace!("Attempting to connect to database");
    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            debug!("Database connection established");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    trace!("Looking up profile by email");
    let Some(profile) = profile::Entity::find()
        .filter(profile::Column::Email.eq(email))
        .one(&db)
        .await?
    else {
        error!(
            "No profile with email {}; the user must sign in once before a role can be granted",
            email
        );
        return Err(anyhow!("No profile with email {}", email));
    };

    let existing = user_role::Entity::find()
        .filter(user_role::Column::ProfileId.eq(profile.id))
        .one(&db)
        .await?;

    match existing {
        Some(binding) => {
            debug!(
                "Replacing existing role '{}' for profile {}",
                binding.role, profile.id
            );
            let mut updated: user_role::ActiveModel = binding.into();
            updated.role = Set(role);
            updated.granted_by = Set(None);
            updated.update(&db).await?;
        }
        None => {
            debug!("Creating role binding for profile {}", profile.id);
            let fresh = user_role::ActiveModel {
                profile_id: Set(profile.id),
                role: Set(role),
                granted_by: Set(None),
                ..Default::default()
            };
            fresh.insert(&db).await?;
        }
    }

    info!("Role '{}' granted to {} (profile {})", role, email, profile.id);
    Ok(())
}
