use sales_report_core::{AchievementTier, CurrencyFormat, EntryView, ReportState, SummaryView};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "No")]
    number: u32,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Product/Service")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Note")]
    note: String,
    #[tabled(rename = "Proof")]
    proof: String,
}

impl From<EntryView> for EntryRow {
    fn from(v: EntryView) -> Self {
        Self {
            number: v.number,
            time: v.time,
            customer: v.customer,
            product: v.product,
            quantity: v.quantity,
            unit_price: v.unit_price,
            total: v.total,
            status: v.status,
            note: v.note,
            proof: if v.proof.is_empty() { "-".to_string() } else { v.proof },
        }
    }
}

pub fn print_header(state: &ReportState, currency: &CurrencyFormat) {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    println!(
        "\x1b[1;36m📅 {}  👤 {}\x1b[0m",
        state.date.format("%Y-%m-%d"),
        state.salesperson_name
    );
    println!(
        "🎯 Target: {}  📍 Area: {}  🏢 Team: {}  📱 Contact: {}",
        currency.format(state.daily_target),
        or_dash(&state.area),
        or_dash(&state.team),
        or_dash(&state.contact)
    );
}

pub fn print_entries(state: &ReportState, currency: &CurrencyFormat) {
    if state.entries.is_empty() {
        println!("No entries yet. Add one with `sales-report add customer:.. product:.. qty:.. price:..`");
        return;
    }

    let rows: Vec<EntryRow> = state
        .entries
        .iter()
        .map(|e| EntryView::from_entity(e, currency).into())
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Columns::new(4..7)).with(Alignment::right()));

    println!("{}", table);
}

fn tier_color(tier: AchievementTier) -> &'static str {
    match tier {
        AchievementTier::Success => "\x1b[1;32m",
        AchievementTier::Warning => "\x1b[1;33m",
        AchievementTier::Danger => "\x1b[1;31m",
    }
}

pub fn print_summary(summary: &SummaryView) {
    println!("\n\x1b[1m📊 PERFORMANCE SUMMARY\x1b[0m");
    println!("💰 Total Sales:        {}", summary.total_sales);
    println!("👥 Total Prospects:    {}", summary.total_prospects);
    println!("📈 Conversion Rate:    {}", summary.conversion_rate);
    println!(
        "🎯 Target Achievement: {}{}\x1b[0m",
        tier_color(summary.tier),
        summary.target_achievement
    );

    if !summary.status_breakdown.is_empty() {
        let breakdown: Vec<String> = summary
            .status_breakdown
            .iter()
            .map(|(status, count)| format!("{}: {}", status, count))
            .collect();
        println!("📋 Status Breakdown:   {}", breakdown.join("  "));
    }
}

/// Shown after a successful export.
pub fn export_message(path: &str, summary: &SummaryView) -> String {
    format!(
        "✅ Exported {}\n   💰 {}  🎯 {}  📈 {}",
        path, summary.total_sales, summary.target_achievement, summary.conversion_rate
    )
}
