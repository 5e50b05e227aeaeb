/// Configuration for the restaurant operations engine
///
/// This module provides configuration types that control seating policy, staff limits
/// and checkout defaults.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a pass over the wait queue treats a party that cannot be seated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainMode {
    /// Stop at the first party that cannot be seated, preserving arrival order
    Strict,
    /// Skip parties that cannot be seated and keep trying the rest
    Greedy,
}

impl Default for DrainMode {
    fn default() -> Self {
        DrainMode::Strict
    }
}

/// Configuration for a restaurant
///
/// Holds the business limits and the follow-up behaviour of operations that free
/// capacity (registering or cleaning a table).
#[derive(Debug, Clone)]
pub struct RestaurantConfig {
    /// Maximum number of tables a single waiter may hold at once
    pub waiter_table_cap: usize,
    /// Queue pass run after a table becomes available; `None` disables it
    pub auto_drain: Option<DrainMode>,
    /// Gratuity rate suggested at checkout (0.10 = 10%)
    pub suggested_gratuity_rate: Decimal,
    /// First identity handed out to staff
    pub staff_id_base: u64,
}

impl RestaurantConfig {
    /// Create a configuration with default values
    ///
    /// Waiters hold at most 4 tables, the queue is drained strictly, 10% gratuity is
    /// suggested and staff numbering starts at 101.
    pub fn new() -> Self {
        Self {
            waiter_table_cap: 4,
            auto_drain: Some(DrainMode::default()),
            suggested_gratuity_rate: Decimal::new(10, 2),
            staff_id_base: 101,
        }
    }

    /// Set the waiter table cap
    pub fn with_waiter_table_cap(mut self, cap: usize) -> Self {
        self.waiter_table_cap = cap;
        self
    }

    /// Set the drain pass run after tables become available
    ///
    /// # Arguments
    /// * `mode` - The drain mode to use, or `None` to leave the queue alone
    pub fn with_auto_drain(mut self, mode: Option<DrainMode>) -> Self {
        self.auto_drain = mode;
        self
    }

    pub fn with_suggested_gratuity_rate(mut self, rate: Decimal) -> Self {
        self.suggested_gratuity_rate = rate;
        self
    }

    pub fn with_staff_id_base(mut self, base: u64) -> Self {
        self.staff_id_base = base;
        self
    }
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RestaurantConfig::default();
        assert_eq!(config.waiter_table_cap, 4);
        assert_eq!(config.auto_drain, Some(DrainMode::Strict));
        assert_eq!(config.suggested_gratuity_rate, Decimal::new(10, 2));
        assert_eq!(config.staff_id_base, 101);
    }

    #[test]
    fn test_config_builder() {
        let config = RestaurantConfig::new()
            .with_waiter_table_cap(2)
            .with_auto_drain(Some(DrainMode::Greedy))
            .with_staff_id_base(1);

        assert_eq!(config.waiter_table_cap, 2);
        assert_eq!(config.auto_drain, Some(DrainMode::Greedy));
        assert_eq!(config.staff_id_base, 1);
    }

    #[test]
    fn test_drain_mode_default() {
        assert_eq!(DrainMode::default(), DrainMode::Strict);
        assert_ne!(DrainMode::Strict, DrainMode::Greedy);
    }
}
