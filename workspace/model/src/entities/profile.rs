use sea_orm::entity::prelude::*;

/// Represents an administrator account synced from the identity provider.
/// A profile row is provisioned the first time an authenticated identity is
/// seen; role assignment happens separately in `user_role`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Stable subject identifier issued by the identity provider.
    #[sea_orm(unique)]
    pub subject: String,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A profile holds at most one role binding.
    #[sea_orm(has_one = "super::user_role::Entity")]
    UserRole,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
