pub mod core;

// Re-export commonly used types
pub use crate::core::config::{DrainMode, RestaurantConfig};
pub use crate::core::engine::Restaurant;
pub use crate::core::errors::{EngineError, EngineResult, ErrorKind, Failure};
pub use crate::core::menu::{Dish, Menu, MenuLookup};
pub use crate::core::records::{Arrival, Checkout, Cleaning, Dispatch, Seating, TableAdded};
pub use crate::core::types::{BillId, DishId, OrderId, PartyId, StaffId, TableId};
