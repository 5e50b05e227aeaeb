use crate::core::types::{OrderId, StaffId, TableId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role tag used when filtering the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Waiter,
    Cook,
}

/// Front-of-house workload of a waiter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaiterDuty {
    /// Tables currently under this waiter, bounded by the roster cap
    pub(crate) tables: BTreeSet<TableId>,
    /// Gratuity accrued so far, only grows
    pub(crate) gratuity: Decimal,
    /// Visits closed on tables this waiter held
    pub(crate) tables_served: u32,
}

/// Kitchen workload of a cook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookDuty {
    /// Orders currently in preparation, unbounded
    pub(crate) in_preparation: BTreeSet<OrderId>,
    pub(crate) orders_completed: u32,
}

/// Role-specific part of a staff member
///
/// The set of roles is closed, each with its own capacity rule, so roles are variants
/// rather than trait objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Duty {
    Waiter(WaiterDuty),
    Cook(CookDuty),
}

/// An employee: shared identity and pay plus a role-specific duty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    pub(crate) id: StaffId,
    pub(crate) name: String,
    pub(crate) base_pay: Decimal,
    pub(crate) duty: Duty,
}

impl StaffMember {
    pub fn id(&self) -> StaffId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_pay(&self) -> Decimal {
        self.base_pay
    }

    pub fn role(&self) -> Role {
        match self.duty {
            Duty::Waiter(_) => Role::Waiter,
            Duty::Cook(_) => Role::Cook,
        }
    }

    pub fn duty(&self) -> &Duty {
        &self.duty
    }

    /// Tables for a waiter, orders in preparation for a cook
    pub fn load(&self) -> usize {
        match &self.duty {
            Duty::Waiter(duty) => duty.tables.len(),
            Duty::Cook(duty) => duty.in_preparation.len(),
        }
    }

    /// Tables currently assigned; empty for cooks
    pub fn tables(&self) -> Vec<TableId> {
        match &self.duty {
            Duty::Waiter(duty) => duty.tables.iter().copied().collect(),
            Duty::Cook(_) => Vec::new(),
        }
    }

    /// Orders in preparation; empty for waiters
    pub fn orders(&self) -> Vec<OrderId> {
        match &self.duty {
            Duty::Cook(duty) => duty.in_preparation.iter().copied().collect(),
            Duty::Waiter(_) => Vec::new(),
        }
    }

    pub fn gratuity(&self) -> Decimal {
        match &self.duty {
            Duty::Waiter(duty) => duty.gratuity,
            Duty::Cook(_) => Decimal::ZERO,
        }
    }

    /// Pay owed for the period: waiters earn base pay plus gratuity, cooks base pay
    pub fn pay(&self) -> Decimal {
        self.base_pay + self.gratuity()
    }
}
