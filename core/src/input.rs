use std::collections::HashMap;

use crate::error::ValidationError;
use crate::model::entry::EntryDraft;
use crate::model::report::ReportDetails;

pub const ENTRY_KEYS: [&str; 8] = ["time", "customer", "product", "qty", "price", "status", "note", "proof"];
pub const DETAIL_KEYS: [&str; 4] = ["target", "area", "team", "contact"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut text_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) && !value.starts_with("//") {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        text_parts.push(arg.as_str());
    }

    ParsedInput {
        text: text_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, ValidationError> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(ValidationError::UnknownField(key.to_string())),
        _ => Err(ValidationError::AmbiguousField {
            key: key.to_string(),
            candidates: matches.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

fn normalize(parsed: ParsedInput, candidates: &[&str]) -> Result<(String, HashMap<String, String>), ValidationError> {
    let mut fields = HashMap::new();
    for (key, value) in parsed.metadata {
        fields.insert(expand_key(&key, candidates)?, value);
    }
    Ok((parsed.text, fields))
}

/// `customer:Acme product:Widget qty:2 price:1500 ...`. Free text becomes the note.
pub fn entry_draft_from_args(args: &[String]) -> Result<EntryDraft, ValidationError> {
    let (text, mut fields) = normalize(parse_args(args), &ENTRY_KEYS)?;
    let mut take = |k: &str| fields.remove(k).unwrap_or_default();

    let mut note = take("note");
    if !text.is_empty() {
        note = if note.is_empty() { text } else { format!("{} {}", note, text) };
    }

    Ok(EntryDraft {
        time: take("time"),
        customer_name: take("customer"),
        product_name: take("product"),
        quantity: take("qty"),
        unit_price: take("price"),
        status: take("status"),
        note,
        proof_reference: take("proof"),
    })
}

/// Applies `target: area: team: contact:` on top of `current`.
pub fn details_from_args(args: &[String], current: ReportDetails) -> Result<ReportDetails, ValidationError> {
    let (_, fields) = normalize(parse_args(args), &DETAIL_KEYS)?;
    let mut details = current;
    for (key, value) in fields {
        match key.as_str() {
            "target" => details.daily_target = parse_target(&value)?,
            "area" => details.area = value.trim().to_string(),
            "team" => details.team = value.trim().to_string(),
            "contact" => details.contact = value.trim().to_string(),
            _ => {}
        }
    }
    Ok(details)
}

fn clean_number(input: &str) -> String {
    input.trim().chars().filter(|c| *c != '_' && !c.is_whitespace()).collect()
}

fn parse_non_negative(input: &str) -> Option<f64> {
    clean_number(input)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn parse_quantity(input: &str) -> Result<u32, ValidationError> {
    clean_number(input)
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidQuantity(input.to_string()))
}

pub fn parse_unit_price(input: &str) -> Result<f64, ValidationError> {
    parse_non_negative(input).ok_or_else(|| ValidationError::InvalidUnitPrice(input.to_string()))
}

/// Trimmed so the report key matches the name kept in the directory.
pub fn parse_salesperson(input: &str) -> Result<String, ValidationError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingSalesperson);
    }
    Ok(name.to_string())
}

/// Blank target means "no target" (0). Garbage is rejected.
pub fn parse_target(input: &str) -> Result<f64, ValidationError> {
    if input.trim().is_empty() {
        return Ok(0.0);
    }
    parse_non_negative(input).ok_or_else(|| ValidationError::InvalidTarget(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_salesperson() {
        assert_eq!(parse_salesperson("  Budi ").unwrap(), "Budi");
        assert_eq!(parse_salesperson("   "), Err(ValidationError::MissingSalesperson));
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["Deal", "sukses", "time:09:30", "customer:PT ABC"]));
        assert_eq!(parsed.text, "Deal sukses");
        assert_eq!(parsed.metadata.get("time"), Some(&"09:30".to_string()));
        assert_eq!(parsed.metadata.get("customer"), Some(&"PT ABC".to_string()));
    }

    #[test]
    fn test_url_is_not_metadata() {
        let parsed = parse_args(&args(&["https://drive.example/proof.jpg"]));
        assert_eq!(parsed.text, "https://drive.example/proof.jpg");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("c", &ENTRY_KEYS).unwrap(), "customer");
        assert_eq!(expand_key("q", &ENTRY_KEYS).unwrap(), "qty");
        assert_eq!(expand_key("price", &ENTRY_KEYS).unwrap(), "price");

        // Ambiguous
        assert!(matches!(expand_key("p", &ENTRY_KEYS), Err(ValidationError::AmbiguousField { .. })));
        // Unknown
        assert_eq!(expand_key("x", &ENTRY_KEYS), Err(ValidationError::UnknownField("x".to_string())));
    }

    #[test]
    fn test_entry_draft_from_args() {
        let draft = entry_draft_from_args(&args(&[
            "cu:Fashion Boutique",
            "prod:E-commerce Integration",
            "q:1",
            "pri:4000000",
            "s:nego",
            "Diskusi",
            "budget",
        ]))
        .unwrap();
        assert_eq!(draft.customer_name, "Fashion Boutique");
        assert_eq!(draft.product_name, "E-commerce Integration");
        assert_eq!(draft.quantity, "1");
        assert_eq!(draft.unit_price, "4000000");
        assert_eq!(draft.status, "nego");
        assert_eq!(draft.note, "Diskusi budget");
        assert_eq!(draft.time, "");
    }

    #[test]
    fn test_details_from_args_keeps_untouched_fields() {
        let current = ReportDetails {
            daily_target: 15_000_000.0,
            area: "Jakarta".to_string(),
            team: "Team Alpha".to_string(),
            contact: "".to_string(),
        };
        let details = details_from_args(&args(&["co:sales@example.com", "tea:Team Beta"]), current).unwrap();
        assert_eq!(details.daily_target, 15_000_000.0);
        assert_eq!(details.area, "Jakarta");
        assert_eq!(details.team, "Team Beta");
        assert_eq!(details.contact, "sales@example.com");

        let err = details_from_args(&args(&["target:lots"]), ReportDetails::default());
        assert_eq!(err, Err(ValidationError::InvalidTarget("lots".to_string())));
    }

    #[test]
    fn test_numeric_parsing_fails_closed() {
        assert_eq!(parse_quantity("3"), Ok(3));
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity("").is_err());

        assert_eq!(parse_unit_price("1_500_000"), Ok(1_500_000.0));
        assert!(parse_unit_price("NaN").is_err());
        assert!(parse_unit_price("inf").is_err());
        assert!(parse_unit_price("-10").is_err());

        assert_eq!(parse_target(""), Ok(0.0));
        assert_eq!(parse_target("  "), Ok(0.0));
        assert_eq!(parse_target("15000000"), Ok(15_000_000.0));
    }
}
