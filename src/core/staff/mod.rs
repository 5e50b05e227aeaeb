pub mod member;
pub mod roster;

// Re-export commonly used types
pub use member::{CookDuty, Duty, Role, StaffMember, WaiterDuty};
pub use roster::StaffRoster;
