pub mod bill;
pub mod ledger;
pub mod order;

// Re-export commonly used types
pub use bill::Bill;
pub use ledger::OrderLedger;
pub use order::{LineItem, Order, OrderStatus};
