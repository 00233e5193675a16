//! Repository traits for user store operations.

pub mod reports;
pub mod users;

pub use reports::ReportRepo;
pub use users::UserRepo;
