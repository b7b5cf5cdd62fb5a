pub mod email;
pub mod report;
