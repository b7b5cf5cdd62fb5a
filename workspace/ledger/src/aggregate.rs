use chrono::NaiveDate;
use model::entities::{driver_entry, expense};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Aggregated totals for one day, or the element-wise sum of several days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayTotals {
    /// Bags of water delivered.
    pub bags: i64,
    /// Gross sales across all drivers.
    pub sales: Decimal,
    /// Fuel spent by all drivers.
    pub fuel: Decimal,
    /// Day-level expenses outside of fuel.
    pub other_expenses: Decimal,
    /// Sales minus fuel minus other expenses.
    pub net: Decimal,
}

impl DayTotals {
    /// Element-wise sum, used to fold days into range totals.
    pub fn combine(&self, other: &DayTotals) -> DayTotals {
        DayTotals {
            bags: self.bags + other.bags,
            sales: self.sales + other.sales,
            fuel: self.fuel + other.fuel,
            other_expenses: self.other_expenses + other.other_expenses,
            net: self.net + other.net,
        }
    }
}

/// One persisted day read from storage, ready for aggregation.
#[derive(Debug, Clone)]
pub struct RecordedDay {
    pub date: NaiveDate,
    pub entries: Vec<driver_entry::Model>,
    pub expenses: Vec<expense::Model>,
}

/// Totals for a single day inside a reporting span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub totals: DayTotals,
}

/// Per-driver totals across a reporting span. Names group by exact string
/// match, so differently-cased spellings stay separate rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverTotals {
    pub driver_name: String,
    pub bags: i64,
    pub sales: Decimal,
    pub fuel: Decimal,
}

impl DriverTotals {
    /// Sales minus fuel for this driver, derived on demand.
    pub fn net(&self) -> Decimal {
        self.sales - self.fuel
    }
}

/// The full aggregation of a reporting span.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeReport {
    /// One breakdown per recorded day, oldest first.
    pub per_day: Vec<DailyBreakdown>,
    /// Element-wise sum of all per-day totals.
    pub totals: DayTotals,
    /// Per-driver totals in order of first appearance.
    pub driver_summary: Vec<DriverTotals>,
    /// Number of days that had a record in the span.
    pub days_recorded: usize,
}

fn has_driver_name(entry: &driver_entry::Model) -> bool {
    !entry.driver_name.trim().is_empty()
}

fn is_countable_expense(row: &expense::Model) -> bool {
    !row.description.trim().is_empty() && row.amount > Decimal::ZERO
}

/// Totals one day's rows. Entries without a driver name and expenses without
/// a description or a positive amount are skipped; empty input yields zero
/// totals.
pub fn aggregate_day(entries: &[driver_entry::Model], expenses: &[expense::Model]) -> DayTotals {
    let mut totals = DayTotals::default();

    for entry in entries.iter().filter(|entry| has_driver_name(entry)) {
        totals.bags += i64::from(entry.bags_delivered);
        totals.sales += entry.sales_amount;
        totals.fuel += entry.fuel_cost;
    }

    for row in expenses.iter().filter(|row| is_countable_expense(row)) {
        totals.other_expenses += row.amount;
    }

    totals.net = totals.sales - totals.fuel - totals.other_expenses;
    trace!("Aggregated one day: {:?}", totals);
    totals
}

/// Aggregates a span of recorded days into per-day breakdowns, range totals,
/// and a per-driver summary ordered by first appearance.
pub fn aggregate_range(days: &[RecordedDay]) -> RangeReport {
    let mut per_day = Vec::with_capacity(days.len());
    let mut totals = DayTotals::default();
    let mut driver_summary: Vec<DriverTotals> = Vec::new();
    let mut driver_index: HashMap<String, usize> = HashMap::new();

    for day in days {
        let day_totals = aggregate_day(&day.entries, &day.expenses);
        totals = totals.combine(&day_totals);
        per_day.push(DailyBreakdown {
            date: day.date,
            totals: day_totals,
        });

        for entry in day.entries.iter().filter(|entry| has_driver_name(entry)) {
            let slot = match driver_index.get(&entry.driver_name) {
                Some(slot) => *slot,
                None => {
                    driver_summary.push(DriverTotals {
                        driver_name: entry.driver_name.clone(),
                        bags: 0,
                        sales: Decimal::ZERO,
                        fuel: Decimal::ZERO,
                    });
                    let slot = driver_summary.len() - 1;
                    driver_index.insert(entry.driver_name.clone(), slot);
                    slot
                }
            };
            let driver = &mut driver_summary[slot];
            driver.bags += i64::from(entry.bags_delivered);
            driver.sales += entry.sales_amount;
            driver.fuel += entry.fuel_cost;
        }
    }

    debug!(
        "Aggregated reporting span: {} day(s), {} driver(s)",
        days.len(),
        driver_summary.len()
    );

    RangeReport {
        per_day,
        totals,
        driver_summary,
        days_recorded: days.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, bags: i32, sales: i64, fuel: i64) -> driver_entry::Model {
        driver_entry::Model {
            id: 0,
            record_id: 0,
            driver_name: name.to_string(),
            bags_delivered: bags,
            sales_amount: Decimal::new(sales, 0),
            fuel_cost: Decimal::new(fuel, 0),
        }
    }

    fn expense_row(description: &str, amount: i64) -> expense::Model {
        expense::Model {
            id: 0,
            record_id: 0,
            description: description.to_string(),
            amount: Decimal::new(amount, 0),
        }
    }

    fn day(date: (i32, u32, u32), entries: Vec<driver_entry::Model>, expenses: Vec<expense::Model>) -> RecordedDay {
        RecordedDay {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            entries,
            expenses,
        }
    }

    #[test]
    fn test_empty_day_has_zero_totals() {
        let totals = aggregate_day(&[], &[]);
        assert_eq!(totals, DayTotals::default());
        assert_eq!(totals.net, Decimal::ZERO);
    }

    #[test]
    fn test_single_day_totals() {
        let entries = vec![entry("Kofi", 10, 500, 50), entry("Ama", 5, 300, 20)];
        let expenses = vec![expense_row("fuel top-up", 30)];

        let totals = aggregate_day(&entries, &expenses);

        assert_eq!(totals.bags, 15);
        assert_eq!(totals.sales, Decimal::new(800, 0));
        assert_eq!(totals.fuel, Decimal::new(70, 0));
        assert_eq!(totals.other_expenses, Decimal::new(30, 0));
        assert_eq!(totals.net, Decimal::new(700, 0));
    }

    #[test]
    fn test_blank_driver_rows_are_skipped() {
        let entries = vec![
            entry("Kofi", 10, 500, 50),
            entry("", 99, 9999, 999),
            entry("   ", 99, 9999, 999),
        ];

        let totals = aggregate_day(&entries, &[]);

        assert_eq!(totals.bags, 10);
        assert_eq!(totals.sales, Decimal::new(500, 0));
        assert_eq!(totals.fuel, Decimal::new(50, 0));
    }

    #[test]
    fn test_blank_and_non_positive_expenses_are_skipped() {
        let expenses = vec![
            expense_row("repairs", 40),
            expense_row("", 100),
            expense_row("   ", 100),
            expense_row("zeroed out", 0),
        ];

        let totals = aggregate_day(&[], &expenses);

        assert_eq!(totals.other_expenses, Decimal::new(40, 0));
        assert_eq!(totals.net, Decimal::new(-40, 0));
    }

    #[test]
    fn test_totals_are_additive_over_concatenation() {
        let first = vec![entry("Kofi", 10, 500, 50)];
        let second = vec![entry("Ama", 5, 300, 20)];
        let both: Vec<_> = first.iter().cloned().chain(second.iter().cloned()).collect();

        let combined = aggregate_day(&first, &[]).combine(&aggregate_day(&second, &[]));
        assert_eq!(combined, aggregate_day(&both, &[]));
    }

    #[test]
    fn test_range_totals_equal_sum_of_day_totals() {
        let days = vec![
            day(
                (2025, 8, 4),
                vec![entry("Kofi", 10, 500, 50)],
                vec![expense_row("repairs", 25)],
            ),
            day((2025, 8, 5), vec![entry("Ama", 5, 300, 20)], vec![]),
            day((2025, 8, 6), vec![], vec![expense_row("levy", 10)]),
        ];

        let report = aggregate_range(&days);

        let mut expected = DayTotals::default();
        for breakdown in &report.per_day {
            expected = expected.combine(&breakdown.totals);
        }
        assert_eq!(report.totals, expected);
        assert_eq!(report.days_recorded, 3);

        let summed_net: Decimal = report.per_day.iter().map(|d| d.totals.net).sum();
        assert_eq!(report.totals.net, summed_net);
    }

    #[test]
    fn test_driver_summary_groups_across_days() {
        let days = vec![
            day((2025, 8, 4), vec![entry("Kofi", 10, 500, 50)], vec![]),
            day(
                (2025, 8, 5),
                vec![entry("Kofi", 4, 200, 10), entry("Ama", 5, 300, 20)],
                vec![],
            ),
        ];

        let report = aggregate_range(&days);

        assert_eq!(report.driver_summary.len(), 2);
        let kofi = &report.driver_summary[0];
        assert_eq!(kofi.driver_name, "Kofi");
        assert_eq!(kofi.bags, 14);
        assert_eq!(kofi.sales, Decimal::new(700, 0));
        assert_eq!(kofi.fuel, Decimal::new(60, 0));
        assert_eq!(kofi.net(), Decimal::new(640, 0));
    }

    #[test]
    fn test_driver_summary_is_case_sensitive() {
        let days = vec![day(
            (2025, 8, 4),
            vec![entry("Kofi", 10, 500, 50), entry("kofi", 1, 100, 10)],
            vec![],
        )];

        let report = aggregate_range(&days);

        assert_eq!(report.driver_summary.len(), 2);
        assert_eq!(report.driver_summary[0].driver_name, "Kofi");
        assert_eq!(report.driver_summary[1].driver_name, "kofi");
        assert_eq!(report.driver_summary[0].bags, 10);
        assert_eq!(report.driver_summary[1].bags, 1);
    }

    #[test]
    fn test_driver_summary_keeps_first_appearance_order() {
        let days = vec![
            day(
                (2025, 8, 4),
                vec![entry("Yaw", 1, 100, 5), entry("Ama", 2, 150, 5)],
                vec![],
            ),
            day(
                (2025, 8, 5),
                vec![entry("Kofi", 3, 200, 5), entry("Yaw", 1, 100, 5)],
                vec![],
            ),
        ];

        let report = aggregate_range(&days);

        let names: Vec<&str> = report
            .driver_summary
            .iter()
            .map(|driver| driver.driver_name.as_str())
            .collect();
        assert_eq!(names, vec!["Yaw", "Ama", "Kofi"]);
    }

    #[test]
    fn test_empty_range_has_zero_totals() {
        let report = aggregate_range(&[]);
        assert_eq!(report.totals, DayTotals::default());
        assert!(report.per_day.is_empty());
        assert!(report.driver_summary.is_empty());
        assert_eq!(report.days_recorded, 0);
    }
}
