//! Shift statistics derived from the ledger and the roster

use crate::core::engine::Restaurant;
use crate::core::menu::MenuLookup;
use crate::core::orders::OrderStatus;
use crate::core::staff::{Duty, Role};
use crate::core::types::{DishId, StaffId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishPopularity {
    pub dish: DishId,
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiterPerformance {
    pub waiter: StaffId,
    pub name: String,
    pub tables_served: u32,
    pub gratuity: Decimal,
    /// Gratuity per served table, zero before the first visit closes
    pub average_gratuity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    pub staff: StaffId,
    pub name: String,
    pub role: Role,
    pub base_pay: Decimal,
    pub gratuity: Decimal,
    pub total: Decimal,
}

impl<M: MenuLookup> Restaurant<M> {
    /// Quantity ordered per dish over every non-cancelled order, most popular first
    pub fn dish_popularity(&self) -> Vec<DishPopularity> {
        let mut counts: BTreeMap<DishId, DishPopularity> = BTreeMap::new();
        for order in self.ledger.orders().filter(|order| order.status() != OrderStatus::Cancelled) {
            for line in order.lines() {
                counts
                    .entry(line.dish)
                    .or_insert_with(|| DishPopularity {
                        dish: line.dish,
                        name: line.name.clone(),
                        quantity: 0,
                    })
                    .quantity += line.quantity;
            }
        }

        let mut ranking: Vec<_> = counts.into_values().collect();
        ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.dish.cmp(&b.dish)));
        ranking
    }

    pub fn most_ordered_dish(&self) -> Option<DishPopularity> {
        self.dish_popularity().into_iter().next()
    }

    /// Per-waiter tallies, highest gratuity first
    pub fn waiter_report(&self) -> Vec<WaiterPerformance> {
        let mut report: Vec<_> = self
            .roster
            .iter()
            .filter_map(|member| match member.duty() {
                Duty::Waiter(duty) => Some(WaiterPerformance {
                    waiter: member.id(),
                    name: member.name().to_string(),
                    tables_served: duty.tables_served,
                    gratuity: duty.gratuity,
                    average_gratuity: if duty.tables_served == 0 {
                        Decimal::ZERO
                    } else {
                        (duty.gratuity / Decimal::from(duty.tables_served)).round_dp(2)
                    },
                }),
                Duty::Cook(_) => None,
            })
            .collect();
        report.sort_by(|a, b| b.gratuity.cmp(&a.gratuity).then(a.waiter.cmp(&b.waiter)));
        report
    }

    /// Pay per staff member: base pay, plus gratuity for waiters
    pub fn payroll(&self) -> Vec<PayrollLine> {
        self.roster
            .iter()
            .map(|member| PayrollLine {
                staff: member.id(),
                name: member.name().to_string(),
                role: member.role(),
                base_pay: member.base_pay(),
                gratuity: member.gratuity(),
                total: member.pay(),
            })
            .collect()
    }
}
