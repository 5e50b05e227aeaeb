use crate::core::errors::{EngineError, EngineResult};
use crate::core::identity::IdAllocator;
use crate::core::staff::member::{CookDuty, Duty, Role, StaffMember, WaiterDuty};
use crate::core::types::{OrderId, StaffId, TableId};
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Waiters and cooks with their workload rules
///
/// Waiters are gated by a hard cap on concurrent tables, cooks are load-balanced
/// without a cap. A table sits in at most one waiter's set at any time.
#[derive(Debug)]
pub struct StaffRoster {
    staff: BTreeMap<StaffId, StaffMember>,
    ids: IdAllocator,
    table_cap: usize,
}

impl StaffRoster {
    /// Create an empty roster
    ///
    /// # Arguments
    /// * `table_cap` - Maximum tables per waiter
    /// * `id_base` - First staff identity handed out
    pub fn new(table_cap: usize, id_base: u64) -> Self {
        Self {
            staff: BTreeMap::new(),
            ids: IdAllocator::starting_at(id_base),
            table_cap,
        }
    }

    pub fn table_cap(&self) -> usize {
        self.table_cap
    }

    pub fn hire_waiter(&mut self, name: &str, base_pay: Decimal) -> EngineResult<&StaffMember> {
        self.hire(name, base_pay, Duty::Waiter(WaiterDuty::default()))
    }

    pub fn hire_cook(&mut self, name: &str, base_pay: Decimal) -> EngineResult<&StaffMember> {
        self.hire(name, base_pay, Duty::Cook(CookDuty::default()))
    }

    fn hire(&mut self, name: &str, base_pay: Decimal, duty: Duty) -> EngineResult<&StaffMember> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Invalid("staff name cannot be empty".to_string()));
        }
        if base_pay < Decimal::ZERO {
            return Err(EngineError::Invalid(format!("base pay cannot be negative, got {}", base_pay)));
        }

        let id = StaffId(self.ids.allocate());
        let member = StaffMember {
            id,
            name: name.to_string(),
            base_pay,
            duty,
        };
        info!("[Staff] hired {:?} {} as {}", member.role(), member.name, id);
        Ok(self.staff.entry(id).or_insert(member))
    }

    pub fn get(&self, id: StaffId) -> Option<&StaffMember> {
        self.staff.get(&id)
    }

    pub fn require(&self, id: StaffId) -> EngineResult<&StaffMember> {
        self.staff
            .get(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not on the roster", id)))
    }

    /// All staff in identity order
    pub fn iter(&self) -> impl Iterator<Item = &StaffMember> {
        self.staff.values()
    }

    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &StaffMember> {
        self.staff.values().filter(move |member| member.role() == role)
    }

    pub fn len(&self) -> usize {
        self.staff.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
    }

    /// Waiter with the fewest tables, provided that waiter is still under the cap
    pub fn least_loaded_waiter(&self) -> Option<StaffId> {
        self.by_role(Role::Waiter)
            .min_by_key(|member| (member.load(), member.id))
            .filter(|member| member.load() < self.table_cap)
            .map(|member| member.id)
    }

    /// Cook with the fewest orders in preparation
    pub fn least_loaded_cook(&self) -> Option<StaffId> {
        self.by_role(Role::Cook)
            .min_by_key(|member| (member.load(), member.id))
            .map(|member| member.id)
    }

    /// Waiter currently holding `table`
    pub fn waiter_of(&self, table: TableId) -> Option<StaffId> {
        self.staff.values().find_map(|member| match &member.duty {
            Duty::Waiter(duty) if duty.tables.contains(&table) => Some(member.id),
            _ => None,
        })
    }

    fn waiter_duty(&self, id: StaffId) -> EngineResult<&WaiterDuty> {
        match &self.require(id)?.duty {
            Duty::Waiter(duty) => Ok(duty),
            Duty::Cook(_) => Err(EngineError::Invalid(format!("{} is not a waiter", id))),
        }
    }

    fn waiter_duty_mut(&mut self, id: StaffId) -> EngineResult<&mut WaiterDuty> {
        let member = self
            .staff
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not on the roster", id)))?;
        match &mut member.duty {
            Duty::Waiter(duty) => Ok(duty),
            Duty::Cook(_) => Err(EngineError::Invalid(format!("{} is not a waiter", id))),
        }
    }

    fn cook_duty_mut(&mut self, id: StaffId) -> EngineResult<&mut CookDuty> {
        let member = self
            .staff
            .get_mut(&id)
            .ok_or_else(|| EngineError::NotFound(format!("{} is not on the roster", id)))?;
        match &mut member.duty {
            Duty::Cook(duty) => Ok(duty),
            Duty::Waiter(_) => Err(EngineError::Invalid(format!("{} is not a cook", id))),
        }
    }

    /// Put `table` under `waiter`
    ///
    /// A table held by another waiter is moved: it leaves the old set before joining the
    /// new one. The cap is checked first, so a rejected assignment changes nothing.
    pub fn assign_table(&mut self, waiter: StaffId, table: TableId) -> EngineResult<()> {
        let duty = self.waiter_duty(waiter)?;
        if duty.tables.contains(&table) {
            return Ok(());
        }
        if duty.tables.len() >= self.table_cap {
            return Err(EngineError::CapacityExceeded(format!(
                "{} already serves {} tables",
                waiter, self.table_cap
            )));
        }

        if let Some(previous) = self.waiter_of(table) {
            self.waiter_duty_mut(previous)?.tables.remove(&table);
            debug!("[Staff] {} handed over from {} to {}", table, previous, waiter);
        }
        self.waiter_duty_mut(waiter)?.tables.insert(table);
        debug!("[Staff] {} now serves {}", waiter, table);
        Ok(())
    }

    pub fn unassign_table(&mut self, waiter: StaffId, table: TableId) -> EngineResult<()> {
        if !self.waiter_duty_mut(waiter)?.tables.remove(&table) {
            return Err(EngineError::NotFound(format!("{} does not serve {}", waiter, table)));
        }
        debug!("[Staff] {} released {}", waiter, table);
        Ok(())
    }

    /// Credit gratuity for a closed visit and count it on the waiter's tally
    pub fn close_visit(&mut self, waiter: StaffId, gratuity: Decimal) -> EngineResult<()> {
        if gratuity < Decimal::ZERO {
            return Err(EngineError::Invalid(format!("gratuity cannot be negative, got {}", gratuity)));
        }
        let duty = self.waiter_duty_mut(waiter)?;
        duty.gratuity += gratuity;
        duty.tables_served += 1;
        Ok(())
    }

    /// Add an order to a cook's working set
    pub fn start_order(&mut self, cook: StaffId, order: OrderId) -> EngineResult<()> {
        let duty = self.cook_duty_mut(cook)?;
        if !duty.in_preparation.insert(order) {
            return Err(EngineError::Conflict(format!("{} is already preparing {}", cook, order)));
        }
        Ok(())
    }

    /// Remove a finished order from a cook's working set
    pub fn finish_order(&mut self, cook: StaffId, order: OrderId) -> EngineResult<()> {
        let duty = self.cook_duty_mut(cook)?;
        if !duty.in_preparation.remove(&order) {
            return Err(EngineError::NotFound(format!("{} is not preparing {}", cook, order)));
        }
        duty.orders_completed += 1;
        Ok(())
    }

    /// Cook currently preparing `order`
    pub fn cook_of(&self, order: OrderId) -> Option<StaffId> {
        self.staff.values().find_map(|member| match &member.duty {
            Duty::Cook(duty) if duty.in_preparation.contains(&order) => Some(member.id),
            _ => None,
        })
    }

    /// Remove a staff member with no outstanding work
    pub fn dismiss(&mut self, id: StaffId) -> EngineResult<StaffMember> {
        let member = self.require(id)?;
        match &member.duty {
            Duty::Waiter(duty) if !duty.tables.is_empty() => {
                return Err(EngineError::Conflict(format!(
                    "{} still serves {} table(s)",
                    id,
                    duty.tables.len()
                )));
            }
            Duty::Cook(duty) if !duty.in_preparation.is_empty() => {
                return Err(EngineError::Conflict(format!(
                    "{} still has {} order(s) in preparation",
                    id,
                    duty.in_preparation.len()
                )));
            }
            _ => {}
        }

        let member = self
            .staff
            .remove(&id)
            .ok_or_else(|| EngineError::internal(format!("{} vanished during dismissal", id)))?;
        info!("[Staff] dismissed {} ({})", member.name, id);
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with_waiters(count: usize) -> (StaffRoster, Vec<StaffId>) {
        let mut roster = StaffRoster::new(4, 101);
        let ids = (0..count)
            .map(|i| roster.hire_waiter(&format!("Waiter {}", i), Decimal::new(1500, 0)).unwrap().id())
            .collect();
        (roster, ids)
    }

    #[test]
    fn test_hire_validates_and_numbers_from_base() {
        let mut roster = StaffRoster::new(4, 101);
        assert_eq!(roster.hire_waiter("  Carlos ", Decimal::new(1500, 0)).unwrap().id(), StaffId(101));
        assert_eq!(roster.get(StaffId(101)).unwrap().name(), "Carlos");
        assert_eq!(roster.hire_cook("Ana", Decimal::ZERO).unwrap().id(), StaffId(102));
        assert!(matches!(roster.hire_cook("   ", Decimal::ONE), Err(EngineError::Invalid(_))));
        assert!(matches!(roster.hire_waiter("Bia", Decimal::new(-1, 0)), Err(EngineError::Invalid(_))));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_least_loaded_waiter_prefers_fewest_tables() {
        let (mut roster, ids) = roster_with_waiters(2);
        roster.assign_table(ids[0], TableId(1)).unwrap();
        assert_eq!(roster.least_loaded_waiter(), Some(ids[1]));
        roster.assign_table(ids[1], TableId(2)).unwrap();
        assert_eq!(roster.least_loaded_waiter(), Some(ids[0]));
    }

    #[test]
    fn test_least_loaded_waiter_is_capacity_gated() {
        let (mut roster, ids) = roster_with_waiters(1);
        for table in 1..=4 {
            roster.assign_table(ids[0], TableId(table)).unwrap();
        }
        assert_eq!(roster.least_loaded_waiter(), None);
    }

    #[test]
    fn test_fifth_table_rejected() {
        let (mut roster, ids) = roster_with_waiters(1);
        for table in 1..=4 {
            roster.assign_table(ids[0], TableId(table)).unwrap();
        }
        let err = roster.assign_table(ids[0], TableId(5)).unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded(_)));
        assert_eq!(
            roster.get(ids[0]).unwrap().tables(),
            vec![TableId(1), TableId(2), TableId(3), TableId(4)]
        );
    }

    #[test]
    fn test_assign_moves_table_between_waiters() {
        let (mut roster, ids) = roster_with_waiters(2);
        roster.assign_table(ids[0], TableId(3)).unwrap();
        roster.assign_table(ids[1], TableId(3)).unwrap();
        assert!(roster.get(ids[0]).unwrap().tables().is_empty());
        assert_eq!(roster.waiter_of(TableId(3)), Some(ids[1]));
    }

    #[test]
    fn test_assign_to_full_waiter_keeps_old_owner() {
        let (mut roster, ids) = roster_with_waiters(2);
        for table in 1..=4 {
            roster.assign_table(ids[1], TableId(table)).unwrap();
        }
        roster.assign_table(ids[0], TableId(9)).unwrap();
        assert!(roster.assign_table(ids[1], TableId(9)).is_err());
        assert_eq!(roster.waiter_of(TableId(9)), Some(ids[0]));
    }

    #[test]
    fn test_unassign_missing_table() {
        let (mut roster, ids) = roster_with_waiters(1);
        assert!(matches!(roster.unassign_table(ids[0], TableId(1)), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_cook_balancing_and_dismissal() {
        let mut roster = StaffRoster::new(4, 1);
        let ana = roster.hire_cook("Ana", Decimal::new(1800, 0)).unwrap().id();
        let bruno = roster.hire_cook("Bruno", Decimal::new(1800, 0)).unwrap().id();

        roster.start_order(ana, OrderId(1)).unwrap();
        assert_eq!(roster.least_loaded_cook(), Some(bruno));
        assert_eq!(roster.cook_of(OrderId(1)), Some(ana));
        assert!(matches!(roster.start_order(ana, OrderId(1)), Err(EngineError::Conflict(_))));
        assert!(matches!(roster.dismiss(ana), Err(EngineError::Conflict(_))));

        roster.finish_order(ana, OrderId(1)).unwrap();
        roster.dismiss(ana).unwrap();
        assert!(roster.get(ana).is_none());
        assert!(matches!(roster.dismiss(ana), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_waiter_with_tables_cannot_be_dismissed() {
        let (mut roster, ids) = roster_with_waiters(1);
        roster.assign_table(ids[0], TableId(1)).unwrap();
        assert!(matches!(roster.dismiss(ids[0]), Err(EngineError::Conflict(_))));
        roster.unassign_table(ids[0], TableId(1)).unwrap();
        assert!(roster.dismiss(ids[0]).is_ok());
    }

    #[test]
    fn test_close_visit_accrues_gratuity() {
        let (mut roster, ids) = roster_with_waiters(1);
        roster.close_visit(ids[0], Decimal::new(1250, 2)).unwrap();
        roster.close_visit(ids[0], Decimal::new(750, 2)).unwrap();
        let waiter = roster.get(ids[0]).unwrap();
        assert_eq!(waiter.gratuity(), Decimal::new(20, 0));
        assert_eq!(waiter.pay(), Decimal::new(1520, 0));
        assert!(matches!(roster.close_visit(ids[0], Decimal::new(-1, 0)), Err(EngineError::Invalid(_))));
    }

    #[test]
    fn test_role_mismatch_is_invalid() {
        let mut roster = StaffRoster::new(4, 1);
        let cook = roster.hire_cook("Ana", Decimal::ONE).unwrap().id();
        assert!(matches!(roster.assign_table(cook, TableId(1)), Err(EngineError::Invalid(_))));
    }
}
