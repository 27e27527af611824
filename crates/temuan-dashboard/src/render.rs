//! Terminal rendering of the dashboard (summary tables, distribution, detail)

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::dashboard::{Dashboard, LoadStatus};
use crate::record::{FilterField, Record, Status};
use crate::rollup::{FinancialRollup, StatusDistribution, StatusRollup};
use crate::view::{PageView, SortDirection, ViewState};

/// Longest free-text cell shown in the detail table
const MAX_TEXT_WIDTH: usize = 40;

/// Widest bar in the status distribution
const BAR_WIDTH: usize = 40;

/// Format an amount as rupiah with Indonesian grouping ("Rp 1.500.000,5")
pub fn format_rupiah(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("Rp {}{}", sign, grouped),
        f if f % 10 == 0 => format!("Rp {}{},{}", sign, grouped, f / 10),
        f => format!("Rp {}{},{:02}", sign, grouped, f),
    }
}

/// Cut long text to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Title, load time, and load failure (if any)
pub fn print_header(dashboard: &Dashboard) {
    println!("\n============================================================");
    println!("              SIGNIFICANT FINDINGS MONITORING");
    println!("============================================================");

    if let Some(at) = dashboard.loaded_at() {
        println!("Loaded {} record(s) at {}", dashboard.records().len(), at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let LoadStatus::Failed(reason) = dashboard.status() {
        eprintln!("  Warning: data unavailable ({}); showing an empty dashboard", reason);
    }
}

/// Table 1: loss, recovery, and remainder per year
pub fn print_financial_table(rollup: &FinancialRollup) {
    println!("\nTABLE 1 - LOSS RECAP PER YEAR");
    println!(
        "{:<8} {:>20} {:>20} {:>20}",
        "Year", "Loss", "Recovery", "Remainder"
    );
    println!("{}", "-".repeat(71));

    for (bucket, totals) in rollup.iter() {
        println!(
            "{:<8} {:>20} {:>20} {:>20}",
            bucket.label(),
            format_rupiah(totals.total_loss),
            format_rupiah(totals.total_recovery),
            format_rupiah(totals.remainder()),
        );
    }

    let grand = rollup.grand_total();
    println!("{}", "-".repeat(71));
    println!(
        "{:<8} {:>20} {:>20} {:>20}",
        "TOTAL",
        format_rupiah(grand.total_loss),
        format_rupiah(grand.total_recovery),
        format_rupiah(grand.remainder()),
    );
}

/// Table 2: status counts per year
pub fn print_status_table(rollup: &StatusRollup) {
    println!("\nTABLE 2 - FOLLOW-UP STATUS PER YEAR");
    print!("{:<8} {:>6}", "Year", "Total");
    for status in Status::ALL {
        print!(" {:>19}", status.label());
    }
    println!();
    println!("{}", "-".repeat(15 + 20 * Status::ALL.len()));

    for (bucket, counts) in rollup.iter() {
        print!("{:<8} {:>6}", bucket.label(), counts.total);
        for status in Status::ALL {
            print!(" {:>19}", counts.count(status));
        }
        println!();
    }

    let grand = rollup.grand_total();
    println!("{}", "-".repeat(15 + 20 * Status::ALL.len()));
    print!("{:<8} {:>6}", "TOTAL", grand.total);
    for status in Status::ALL {
        print!(" {:>19}", grand.count(status));
    }
    println!();
}

/// Status distribution with whole-percent shares
pub fn print_distribution(distribution: &StatusDistribution) {
    println!("\nSTATUS DISTRIBUTION");

    if distribution.entries().is_empty() {
        println!("  (no data)");
        return;
    }

    for (status, count) in distribution.entries() {
        let percent = distribution.percent(*count);
        let label = if status.is_empty() { "(blank)" } else { status.as_str() };
        let bar = "#".repeat(percent as usize * BAR_WIDTH / 100);
        println!("  {:<20} {:>5} {:>4}%  {}", label, count, percent, bar);
    }
}

/// Filter choices per filterable field
pub fn print_filter_choices(dashboard: &Dashboard) {
    for field in FilterField::ALL {
        let values = dashboard.unique_values(field);
        println!("\n{} ({}):", field, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "IDENTIFIER")]
    identifier: String,
    #[tabled(rename = "OWNER")]
    owner: String,
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "SEGMENT")]
    segment: String,
    #[tabled(rename = "PERIOD")]
    period: String,
    #[tabled(rename = "PROBLEM")]
    problem: String,
    #[tabled(rename = "ROOT CAUSE")]
    root_cause: String,
    #[tabled(rename = "ACTION")]
    action: String,
    #[tabled(rename = "LOSS")]
    loss: String,
    #[tabled(rename = "RECOVERY")]
    recovery: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<&Record> for DetailRow {
    fn from(record: &Record) -> Self {
        Self {
            identifier: record.identifier.clone(),
            owner: record.owner.clone(),
            unit: record.unit.clone(),
            segment: record.segment.clone(),
            period: record.period.clone(),
            problem: truncate(&record.problem_text, MAX_TEXT_WIDTH),
            root_cause: truncate(&record.root_cause_text, MAX_TEXT_WIDTH),
            action: truncate(&record.action_text, MAX_TEXT_WIDTH),
            loss: format_rupiah(record.loss_amount),
            recovery: format_rupiah(record.recovery_amount),
            status: record.status.clone(),
        }
    }
}

/// Table 3: the current page of the detail table plus the page list
pub fn print_detail(page: &PageView<'_>, state: &ViewState) {
    println!("\nTABLE 3 - FINDING DETAILS");

    if let Some(sort) = state.sort() {
        let direction = match sort.direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        };
        println!("  Sorted by {} ({})", sort.field, direction);
    }
    for (field, value) in state.filters() {
        println!("  Filter {} = {}", field, value);
    }

    if page.rows.is_empty() {
        println!("  (no rows on page {})", page.page);
    } else {
        let rows: Vec<DetailRow> = page.rows.iter().map(|r| DetailRow::from(*r)).collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        println!("{}", table);
    }

    println!("{}", page_list(page));
}

/// "Pages: 1 [2] 3" with the current page bracketed
pub fn page_list(page: &PageView<'_>) -> String {
    let pages: Vec<String> = (1..=page.total_pages)
        .map(|p| {
            if p == page.page {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();

    format!(
        "Pages: {}  ({} matching row(s), {} per page)",
        if pages.is_empty() { "-".to_string() } else { pages.join(" ") },
        page.filtered_count,
        page.page_size
    )
}
