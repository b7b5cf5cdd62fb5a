use chrono::NaiveDate;
use ledger::DayTotals;
use model::entities::{driver_entry, expense};
use rust_decimal::Decimal;

/// Subject line for the daily summary email.
pub fn daily_report_subject(date: NaiveDate) -> String {
    format!("Daily Sales Report - {}", date)
}

fn money(value: Decimal) -> String {
    format!("₦{}", value.normalize())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders the daily summary email body: headline totals, the per-driver
/// breakdown, and any recorded expenses. Driver names and expense
/// descriptions are free text and get escaped.
pub fn daily_report_html(
    date: NaiveDate,
    totals: &DayTotals,
    entries: &[driver_entry::Model],
    expenses: &[expense::Model],
) -> String {
    let mut html = String::new();

    html.push_str(&format!("<h2>Daily Sales Report - {}</h2>", date));

    html.push_str("<h3>Summary</h3><ul>");
    html.push_str(&format!("<li>Bags delivered: {}</li>", totals.bags));
    html.push_str(&format!("<li>Total sales: {}</li>", money(totals.sales)));
    html.push_str(&format!("<li>Fuel cost: {}</li>", money(totals.fuel)));
    html.push_str(&format!(
        "<li>Other expenses: {}</li>",
        money(totals.other_expenses)
    ));
    html.push_str(&format!(
        "<li><strong>Net sales: {}</strong></li>",
        money(totals.net)
    ));
    html.push_str("</ul>");

    html.push_str("<h3>Driver Breakdown</h3>");
    html.push_str("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">");
    html.push_str("<tr><th>Driver</th><th>Bags</th><th>Sales</th><th>Fuel</th><th>Net</th></tr>");
    for entry in entries {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.driver_name),
            entry.bags_delivered,
            money(entry.sales_amount),
            money(entry.fuel_cost),
            money(entry.sales_amount - entry.fuel_cost),
        ));
    }
    html.push_str("</table>");

    if !expenses.is_empty() {
        html.push_str("<h3>Other Expenses</h3>");
        html.push_str("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">");
        html.push_str("<tr><th>Description</th><th>Amount</th></tr>");
        for row in expenses {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.description),
                money(row.amount),
            ));
        }
        html.push_str("</table>");
    }

    html
}
