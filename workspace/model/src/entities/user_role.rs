use sea_orm::entity::prelude::*;
use std::fmt;
use std::str::FromStr;

use super::profile;

/// The administrative role held by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "secretary")]
    Secretary,
    #[sea_orm(string_value = "director")]
    Director,
    #[sea_orm(string_value = "auditor")]
    Auditor,
}

impl Role {
    /// Canonical spelling used both in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Manager => "manager",
            Role::Secretary => "secretary",
            Role::Director => "director",
            Role::Auditor => "auditor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "super_admin" => Ok(Role::SuperAdmin),
            "manager" => Ok(Role::Manager),
            "secretary" => Ok(Role::Secretary),
            "director" => Ok(Role::Director),
            "auditor" => Ok(Role::Auditor),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Binds a profile to its role. The unique key on `profile_id` keeps it to
/// at most one role per profile; assigning a new role replaces the binding.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub profile_id: i32,
    pub role: Role,
    /// The profile that granted this role, if recorded.
    pub granted_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "profile::Entity",
        from = "Column::ProfileId",
        to = "profile::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,
    #[sea_orm(
        belongs_to = "profile::Entity",
        from = "Column::GrantedBy",
        to = "profile::Column::Id",
        on_delete = "SetNull"
    )]
    GrantedByProfile,
}

impl Related<profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::Role;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trips_through_strings() {
        for role in [
            Role::SuperAdmin,
            Role::Manager,
            Role::Secretary,
            Role::Director,
            Role::Auditor,
        ] {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!(Role::from_str("admin").is_err());
        assert!(Role::from_str("SUPER_ADMIN").is_err());
        assert!(Role::from_str("").is_err());
    }
}
