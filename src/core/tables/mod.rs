pub mod registry;
pub mod table;

// Re-export commonly used types
pub use registry::{TableCounts, TableRegistry, Vacated};
pub use table::{Table, TableStatus};
