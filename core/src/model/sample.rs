//! Demo entries, used by the `sample` command and by tests.

use chrono::NaiveTime;

use crate::model::entry::{NewEntry, SaleStatus};

#[allow(clippy::too_many_arguments)]
fn entry(
    hour: u32,
    minute: u32,
    customer: &str,
    product: &str,
    quantity: u32,
    unit_price: f64,
    status: SaleStatus,
    note: &str,
) -> NewEntry {
    NewEntry {
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
        customer_name: customer.to_string(),
        product_name: product.to_string(),
        quantity,
        unit_price,
        status,
        note: note.to_string(),
        proof_reference: None,
    }
}

/// Two closings and one follow-up, 9.5M closed out of 12.5M.
pub fn sample_entries() -> Vec<NewEntry> {
    vec![
        entry(9, 30, "PT ABC Corp", "AI Marketing Package", 1, 5_000_000.0, SaleStatus::Closing, "Deal sukses"),
        entry(11, 15, "CV Digital Startup", "Growth Consultation", 3, 1_500_000.0, SaleStatus::Closing, "Follow up next month"),
        entry(14, 20, "Toko Online Makmur", "Social Media Management", 1, 3_000_000.0, SaleStatus::FollowUp, "Perlu presentasi ulang"),
    ]
}

pub fn additional_sample_entries() -> Vec<NewEntry> {
    vec![
        entry(16, 45, "Restaurant Chain Indo", "Digital Marketing Automation", 2, 2_500_000.0, SaleStatus::Closing, "Kontrak 6 bulan"),
        entry(17, 30, "Fashion Boutique", "E-commerce Integration", 1, 4_000_000.0, SaleStatus::Nego, "Diskusi budget"),
    ]
}
