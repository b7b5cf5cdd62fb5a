pub mod grant_role;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use grant_role::grant_role;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
