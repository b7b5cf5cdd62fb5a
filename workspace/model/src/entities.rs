//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the water delivery back office here:
//! administrator profiles and their role bindings, one ledger record per
//! calendar day with driver and expense child rows, and the outbound
//! notification audit log.

pub mod daily_record;
pub mod driver_entry;
pub mod expense;
pub mod notification_log;
pub mod profile;
pub mod user_role;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::daily_record::Entity as DailyRecord;
    pub use super::driver_entry::Entity as DriverEntry;
    pub use super::expense::Entity as Expense;
    pub use super::notification_log::Entity as NotificationLog;
    pub use super::profile::Entity as Profile;
    pub use super::user_role::Entity as UserRole;
}
