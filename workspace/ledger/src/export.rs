use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aggregate::{DailyBreakdown, DayTotals};

/// Column headers for the sales report export.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Date",
    "Bags Delivered",
    "Sales (₦)",
    "Fuel Cost (₦)",
    "Other Expenses (₦)",
    "Net Sales (₦)",
];

/// Quotes a field when it contains the delimiter, a quote, or a line break.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn money(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Renders the per-day table as comma-separated text: a header row, one row
/// per day, and a trailing TOTAL row that always equals the aggregate
/// totals, including for an empty span.
pub fn delimited_table(per_day: &[DailyBreakdown], totals: &DayTotals) -> String {
    let mut rows = Vec::with_capacity(per_day.len() + 2);

    rows.push(
        EXPORT_HEADERS
            .iter()
            .map(|header| csv_field(header))
            .collect::<Vec<_>>()
            .join(","),
    );

    for day in per_day {
        rows.push(
            [
                csv_field(&day.date.to_string()),
                csv_field(&day.totals.bags.to_string()),
                csv_field(&money(day.totals.sales)),
                csv_field(&money(day.totals.fuel)),
                csv_field(&money(day.totals.other_expenses)),
                csv_field(&money(day.totals.net)),
            ]
            .join(","),
        );
    }

    rows.push(
        [
            csv_field("TOTAL"),
            csv_field(&totals.bags.to_string()),
            csv_field(&money(totals.sales)),
            csv_field(&money(totals.fuel)),
            csv_field(&money(totals.other_expenses)),
            csv_field(&money(totals.net)),
        ]
        .join(","),
    );

    rows.join("\n")
}

/// Download filename for a span's export.
pub fn export_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("sales-report-{}-to-{}.csv", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_range, RecordedDay};
    use model::entities::driver_entry;

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

    fn recorded_day(y: i32, m: u32, d: u32, entries: Vec<driver_entry::Model>) -> RecordedDay {
        RecordedDay {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            entries,
            expenses: vec![],
        }
    }

    fn last_line(table: &str) -> &str {
        table.lines().last().unwrap()
    }

    #[test]
    fn test_empty_span_has_header_and_zero_total_row() {
        let table = delimited_table(&[], &DayTotals::default());

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Date,Bags Delivered,Sales (₦),Fuel Cost (₦),Other Expenses (₦),Net Sales (₦)"
        );
        assert_eq!(lines[1], "TOTAL,0,0,0,0,0");
    }

    #[test]
    fn test_single_day_total_row_equals_totals() {
        let report = aggregate_range(&[recorded_day(
            2025,
            8,
            4,
            vec![entry("Kofi", 10, 500, 50), entry("Ama", 5, 300, 20)],
        )]);

        let table = delimited_table(&report.per_day, &report.totals);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2025-08-04,15,800,70,0,730");
        assert_eq!(last_line(&table), "TOTAL,15,800,70,0,730");
    }

    #[test]
    fn test_multi_day_total_row_equals_totals() {
        let report = aggregate_range(&[
            recorded_day(2025, 8, 4, vec![entry("Kofi", 10, 500, 50)]),
            recorded_day(2025, 8, 5, vec![entry("Ama", 5, 300, 20)]),
            recorded_day(2025, 8, 6, vec![]),
        ]);

        let table = delimited_table(&report.per_day, &report.totals);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(last_line(&table), "TOTAL,15,800,70,0,730");
        // The empty recorded day still shows up as a zero row
        assert_eq!(lines[3], "2025-08-06,0,0,0,0,0");
    }

    #[test]
    fn test_fields_are_quoted_and_escaped() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(csv_field("with \"quote\""), "\"with \"\"quote\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_export_filename_spans_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 8, 31).unwrap();
        assert_eq!(
            export_filename(start, end),
            "sales-report-2025-08-01-to-2025-08-31.csv"
        );
    }
}
