use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::emi::{self, ZeroRatePolicy};

/// A tracked loan. Serialized with the field names of the browser app's
/// `loans` document so an exported value loads as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Generated at creation; empty only for legacy documents until the store assigns one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub loan_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lender: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    /// Annual interest rate in percent.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,
    /// Number of monthly installments.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub tenure: u32,
    /// Raw start date as entered. May be empty or unparseable.
    #[serde(rename = "startDate", default, deserialize_with = "lenient_string")]
    pub start_date: String,
    /// Append-only log of ISO timestamps, one per installment marked paid.
    #[serde(
        rename = "paidMonths",
        default,
        deserialize_with = "lenient_paid_months",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub paid_months: Vec<String>,
}

impl Loan {
    /// Create a loan with a fresh id. A missing start date defaults to `today`.
    pub fn new(
        loan_type: &str,
        lender: &str,
        amount: f64,
        rate: f64,
        tenure: u32,
        start_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        Self {
            id: generate_id(),
            loan_type: loan_type.to_string(),
            lender: lender.to_string(),
            amount,
            rate,
            tenure,
            start_date: format_date(start_date.unwrap_or(today)),
            paid_months: Vec::new(),
        }
    }

    /// Parsed start date, or `None` when the stored value is not a valid date.
    pub fn start(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date)
    }

    pub fn emi(&self, policy: ZeroRatePolicy) -> f64 {
        emi::calculate_emi_with(policy, self.amount, self.rate, self.tenure)
    }

    pub fn paid_count(&self) -> u32 {
        self.paid_months.len().try_into().unwrap_or(u32::MAX)
    }

    pub fn record_payment(&mut self, at: DateTime<Utc>) {
        self.paid_months
            .push(at.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
}

/// Eight hex characters from the thread RNG.
pub fn generate_id() -> String {
    hex::encode(rand::random::<[u8; 4]>())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
}

fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let n = number_from_value(&value).unwrap_or(0.0);
    // Fractional tenures truncate; negatives land on 0.
    Ok(if n > 0.0 { n.min(u32::MAX as f64) as u32 } else { 0 })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Anything but an array reads as no payments. Non-string entries keep their JSON text.
fn lenient_paid_months<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_defaults_start_to_today() {
        let loan = Loan::new("Home", "HDFC", 500000.0, 8.5, 240, None, date(2025, 3, 9));
        assert_eq!(loan.start_date, "2025-03-09");
        assert_eq!(loan.id.len(), 8);
        assert!(loan.paid_months.is_empty());
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..50).map(|_| generate_id()).collect();
        assert!(ids.len() > 45);
    }

    #[test]
    fn test_parse_date_accepts_iso_forms() {
        assert_eq!(parse_date("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T10:20:30.000Z"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_deserializes_browser_document() {
        let json = r#"[{"type":"Car","lender":"SBI","amount":300000,"rate":9.2,"tenure":36,
            "startDate":"2024-02-01","paidMonths":["2024-03-01T08:00:00.000Z"]}]"#;
        let loans: Vec<Loan> = serde_json::from_str(json).unwrap();
        assert_eq!(loans.len(), 1);
        let loan = &loans[0];
        assert_eq!(loan.id, "");
        assert_eq!(loan.loan_type, "Car");
        assert_eq!(loan.amount, 300000.0);
        assert_eq!(loan.tenure, 36);
        assert_eq!(loan.paid_count(), 1);
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let json = r#"{"type":null,"lender":"X","amount":"abc","rate":"7.5","tenure":-4}"#;
        let loan: Loan = serde_json::from_str(json).unwrap();
        assert_eq!(loan.loan_type, "");
        assert_eq!(loan.amount, 0.0);
        assert_eq!(loan.rate, 7.5);
        assert_eq!(loan.tenure, 0);
        assert_eq!(loan.start(), None);
        assert_eq!(loan.emi(ZeroRatePolicy::ReportZero), 0.0);
    }

    #[test]
    fn test_malformed_paid_months_degrade() {
        let json = r#"[{"lender":"A","paidMonths":null},
            {"lender":"B","paidMonths":[1700000000000,"2024-03-01T08:00:00.000Z"]},
            {"lender":"C","paidMonths":"2024-03-01"}]"#;
        let loans: Vec<Loan> = serde_json::from_str(json).unwrap();
        assert!(loans[0].paid_months.is_empty());
        assert_eq!(
            loans[1].paid_months,
            vec!["1700000000000".to_string(), "2024-03-01T08:00:00.000Z".to_string()]
        );
        assert_eq!(loans[1].paid_count(), 2);
        assert!(loans[2].paid_months.is_empty());
    }

    #[test]
    fn test_paid_months_omitted_until_first_payment() {
        let mut loan = Loan::new("Personal", "ICICI", 1000.0, 10.0, 12, None, date(2024, 1, 1));
        let json = serde_json::to_string(&loan).unwrap();
        assert!(!json.contains("paidMonths"));

        let at = DateTime::parse_from_rfc3339("2024-02-01T09:30:00Z").unwrap().with_timezone(&Utc);
        loan.record_payment(at);
        assert_eq!(loan.paid_months, vec!["2024-02-01T09:30:00.000Z".to_string()]);
        let json = serde_json::to_string(&loan).unwrap();
        assert!(json.contains("\"paidMonths\""));
        assert!(json.contains("\"startDate\":\"2024-01-01\""));
    }
}
