use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};
use rbistro::core::orders::OrderStatus;
use rbistro::core::tables::TableStatus;
use rbistro::{DishId, EngineError, Menu, Restaurant, RestaurantConfig, TableId};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("bad distribution parameters: {0}")]
    Distribution(String),
}

/// Parameters of a simulated shift
#[derive(Debug, Clone)]
pub struct ShiftConfig {
    /// Independent shifts to run
    pub runs: usize,
    /// Simulation steps per shift
    pub ticks: u64,
    /// Seed of run 0; run `n` uses `seed_base + n`
    pub seed_base: u64,
    /// Chance that a party walks in on a given tick
    pub arrival_probability: f64,
    /// Mean party size
    pub mean_party_size: f64,
    /// Minimum ticks between seating and checkout
    pub dining_ticks: u64,
    /// Chance per tick that a cook finishes an order in preparation
    pub cook_speed: f64,
    /// Mean gratuity in percent of the bill
    pub gratuity_percent: f64,
    pub table_layout: Vec<u32>,
    pub waiters: usize,
    pub cooks: usize,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            runs: 8,
            ticks: 240,
            seed_base: 42,
            arrival_probability: 0.35,
            mean_party_size: 2.6,
            dining_ticks: 12,
            cook_speed: 0.4,
            gratuity_percent: 10.0,
            table_layout: vec![4, 2, 2, 6, 4, 2],
            waiters: 2,
            cooks: 1,
        }
    }
}

impl ShiftConfig {
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_seed_base(mut self, seed: u64) -> Self {
        self.seed_base = seed;
        self
    }

    pub fn with_arrival_probability(mut self, probability: f64) -> Self {
        self.arrival_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_staff(mut self, waiters: usize, cooks: usize) -> Self {
        self.waiters = waiters;
        self.cooks = cooks;
        self
    }
}

/// Outcome of one shift
#[derive(Debug, Clone, Default)]
pub struct ShiftSummary {
    pub run: usize,
    pub parties_arrived: u32,
    pub parties_seated_on_arrival: u32,
    pub visits_closed: u32,
    pub still_waiting: usize,
    pub peak_queue: usize,
    pub revenue: Decimal,
    pub gratuity: Decimal,
    pub top_dish: Option<String>,
}

pub fn menu() -> Result<Menu, EngineError> {
    let mut menu = Menu::new();
    menu.add_dish(DishId(1), "Feijoada", Decimal::new(4590, 2), "")?;
    menu.add_dish(DishId(2), "Moqueca", Decimal::new(5850, 2), "")?;
    menu.add_dish(DishId(3), "Pão de queijo", Decimal::new(1200, 2), "")?;
    menu.add_dish(DishId(4), "Brigadeiro", Decimal::new(800, 2), "")?;
    menu.add_dish(DishId(5), "Guaraná", Decimal::new(650, 2), "")?;
    Ok(menu)
}

fn open(config: &ShiftConfig) -> Result<Restaurant, EngineError> {
    let mut restaurant = Restaurant::new(RestaurantConfig::default(), menu()?);
    for n in 0..config.waiters {
        restaurant.hire_waiter(&format!("waiter-{}", n + 1), Decimal::new(1500, 0))?;
    }
    for n in 0..config.cooks {
        restaurant.hire_cook(&format!("cook-{}", n + 1), Decimal::new(1800, 0))?;
    }
    for (index, capacity) in config.table_layout.iter().enumerate() {
        restaurant.add_table(TableId(index as u32 + 1), *capacity)?;
    }
    Ok(restaurant)
}

/// Run one seeded shift to completion
pub fn run_shift(config: &ShiftConfig, run: usize) -> Result<ShiftSummary, SimulationError> {
    let mut rng = StdRng::seed_from_u64(config.seed_base.wrapping_add(run as u64));
    let party_size = Poisson::new((config.mean_party_size - 1.0).max(0.1))
        .map_err(|err| SimulationError::Distribution(err.to_string()))?;
    let gratuity = Normal::new(config.gratuity_percent, config.gratuity_percent / 3.0)
        .map_err(|err| SimulationError::Distribution(err.to_string()))?;

    let mut restaurant = open(config)?;
    let mut summary = ShiftSummary {
        run,
        ..ShiftSummary::default()
    };
    let mut seated_at: HashMap<TableId, u64> = HashMap::new();

    for tick in 0..config.ticks {
        if rng.gen_bool(config.arrival_probability) {
            let sample: f64 = party_size.sample(&mut rng);
            let size = (sample as u32 + 1).min(8);
            summary.parties_arrived += 1;
            if restaurant.arrive(size)?.seating().is_some() {
                summary.parties_seated_on_arrival += 1;
            }
        }
        summary.peak_queue = summary.peak_queue.max(restaurant.queue().len());

        for table in restaurant.tables() {
            match table.status {
                TableStatus::Free => {}
                TableStatus::Dirty => {
                    if rng.gen_bool(0.6) {
                        restaurant.clean(table.id)?;
                    }
                }
                TableStatus::Occupied => {
                    let seated = *seated_at.entry(table.id).or_insert(tick);
                    let bill = restaurant.bill_for(table.id)?;
                    let last = bill
                        .orders
                        .last()
                        .and_then(|id| restaurant.ledger().order(*id))
                        .map(|order| order.status());

                    match last {
                        None => {
                            for _ in 0..rng.gen_range(1..=3) {
                                let dish = DishId(rng.gen_range(1..=5));
                                restaurant.place_order(table.id, dish, rng.gen_range(1..=2))?;
                            }
                            restaurant.confirm(table.id)?;
                        }
                        Some(OrderStatus::Open) => {
                            restaurant.confirm(table.id)?;
                        }
                        Some(OrderStatus::Confirmed) => {}
                        Some(OrderStatus::InPreparation) => {
                            if rng.gen_bool(config.cook_speed) {
                                restaurant.ready(table.id)?;
                            }
                        }
                        Some(OrderStatus::Ready) => {
                            restaurant.deliver(table.id)?;
                        }
                        Some(OrderStatus::Delivered) | Some(OrderStatus::Cancelled) => {
                            if tick - seated >= config.dining_ticks {
                                let percent = gratuity.sample(&mut rng).max(0.0).round() as i64;
                                let tip = (bill.total * Decimal::new(percent, 2)).round_dp(2);
                                let checkout = restaurant.finalize(table.id, Some(tip))?;
                                seated_at.remove(&table.id);
                                summary.visits_closed += 1;
                                summary.revenue += checkout.total;
                                summary.gratuity += checkout.gratuity;
                            }
                        }
                    }
                }
            }
        }
    }

    summary.still_waiting = restaurant.queue().len();
    summary.top_dish = restaurant.most_ordered_dish().map(|dish| dish.name);
    restaurant
        .validate_consistency()
        .map_err(|detail| SimulationError::Engine(EngineError::Internal(detail)))?;
    Ok(summary)
}

/// Totals over all runs
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    pub runs: usize,
    pub parties_arrived: u32,
    pub visits_closed: u32,
    pub still_waiting: usize,
    pub worst_queue: usize,
    pub revenue: Decimal,
    pub gratuity: Decimal,
    pub top_dishes: BTreeMap<String, usize>,
}

impl Aggregate {
    pub fn from_runs(summaries: &[ShiftSummary]) -> Self {
        let mut aggregate = Aggregate {
            runs: summaries.len(),
            ..Aggregate::default()
        };
        for summary in summaries {
            aggregate.parties_arrived += summary.parties_arrived;
            aggregate.visits_closed += summary.visits_closed;
            aggregate.still_waiting += summary.still_waiting;
            aggregate.worst_queue = aggregate.worst_queue.max(summary.peak_queue);
            aggregate.revenue += summary.revenue;
            aggregate.gratuity += summary.gratuity;
            if let Some(dish) = &summary.top_dish {
                *aggregate.top_dishes.entry(dish.clone()).or_default() += 1;
            }
        }
        aggregate
    }

    pub fn mean_revenue(&self) -> Decimal {
        if self.runs == 0 {
            return Decimal::ZERO;
        }
        (self.revenue / Decimal::from(self.runs)).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shift() {
        let config = ShiftConfig::default().with_ticks(80);
        let first = run_shift(&config, 3).unwrap();
        let second = run_shift(&config, 3).unwrap();
        assert_eq!(first.parties_arrived, second.parties_arrived);
        assert_eq!(first.revenue, second.revenue);
        assert_eq!(first.visits_closed, second.visits_closed);
    }

    #[test]
    fn test_shift_without_cooks_never_closes_a_paid_order() {
        let config = ShiftConfig::default().with_ticks(60).with_staff(2, 0);
        let summary = run_shift(&config, 0).unwrap();
        assert_eq!(summary.revenue, Decimal::ZERO);
    }

    #[test]
    fn test_aggregate_sums_runs() {
        let runs = vec![
            ShiftSummary {
                revenue: Decimal::new(100, 0),
                visits_closed: 2,
                peak_queue: 3,
                top_dish: Some("Feijoada".to_string()),
                ..ShiftSummary::default()
            },
            ShiftSummary {
                revenue: Decimal::new(50, 0),
                visits_closed: 1,
                peak_queue: 5,
                top_dish: Some("Feijoada".to_string()),
                ..ShiftSummary::default()
            },
        ];
        let aggregate = Aggregate::from_runs(&runs);
        assert_eq!(aggregate.visits_closed, 3);
        assert_eq!(aggregate.worst_queue, 5);
        assert_eq!(aggregate.mean_revenue(), Decimal::new(75, 0));
        assert_eq!(aggregate.top_dishes["Feijoada"], 2);
    }
}
