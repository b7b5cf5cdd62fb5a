pub mod health;
pub mod notifications;
pub mod records;
pub mod reports;
pub mod session;
pub mod users;
