use serde::{Deserialize, Serialize};

/// Whole-unit currency rendering, `Rp 9.500.000` by default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CurrencyFormat {
    pub prefix: String,
    pub thousands_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            prefix: "Rp".to_string(),
            thousands_separator: '.',
        }
    }
}

impl CurrencyFormat {
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount.round() } else { 0.0 };
        let sign = if amount < 0.0 { "-" } else { "" };
        let grouped = group_digits(amount.abs() as u64, self.thousands_separator);
        if self.prefix.is_empty() {
            format!("{}{}", sign, grouped)
        } else {
            format!("{}{} {}", sign, self.prefix, grouped)
        }
    }
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.1}%", value)
}
