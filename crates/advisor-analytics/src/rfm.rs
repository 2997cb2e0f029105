//! RFM (Recency / Frequency / Monetary) customer scoring.
//!
//! Aggregates are computed over confirmed sales invoices only; the
//! scoring bands are fixed business heuristics.

use serde::Serialize;
use serde_json::{json, Value};

/// RFM aggregates plus their 1-5 scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmScores {
    /// Days since the most recent confirmed invoice.
    pub recency_days: i64,
    /// Number of confirmed invoices.
    pub frequency: i64,
    /// Total confirmed invoice value.
    pub monetary: f64,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    /// Sum of the three scores (3-15).
    pub combined_score: u8,
}

impl RfmScores {
    /// Score raw aggregates against the fixed bands.
    pub fn from_aggregates(recency_days: i64, frequency: i64, monetary: f64) -> Self {
        let recency_score = score_recency(recency_days);
        let frequency_score = score_frequency(frequency);
        let monetary_score = score_monetary(monetary);
        Self {
            recency_days,
            frequency,
            monetary,
            recency_score,
            frequency_score,
            monetary_score,
            combined_score: recency_score + frequency_score + monetary_score,
        }
    }
}

/// RFM result for a customer: scored, or an explicit no-data report when
/// the customer has no confirmed invoices.
#[derive(Debug, Clone, PartialEq)]
pub enum RfmReport {
    NoData,
    Scored(RfmScores),
}

impl RfmReport {
    /// JSON shape handed back across the tool boundary.
    pub fn to_json(&self, customer: &str) -> Value {
        match self {
            RfmReport::NoData => json!({
                "customer": customer,
                "has_data": false,
                "message": "No confirmed sales invoices found for this customer.",
            }),
            RfmReport::Scored(scores) => {
                let mut value = serde_json::to_value(scores).unwrap_or_default();
                if let Some(map) = value.as_object_mut() {
                    map.insert("customer".to_string(), json!(customer));
                    map.insert("has_data".to_string(), json!(true));
                }
                value
            }
        }
    }
}

/// Recency band: fewer days since last purchase scores higher.
pub fn score_recency(days: i64) -> u8 {
    if days < 30 {
        5
    } else if days < 90 {
        4
    } else if days < 180 {
        3
    } else if days < 365 {
        2
    } else {
        1
    }
}

/// Frequency band: more confirmed invoices scores higher.
pub fn score_frequency(count: i64) -> u8 {
    if count > 10 {
        5
    } else if count > 5 {
        4
    } else if count > 2 {
        3
    } else if count > 1 {
        2
    } else {
        1
    }
}

/// Monetary band: higher total spend scores higher.
pub fn score_monetary(total: f64) -> u8 {
    if total > 10_000.0 {
        5
    } else if total > 5_000.0 {
        4
    } else if total > 1_000.0 {
        3
    } else if total > 100.0 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_bands() {
        assert_eq!(score_recency(0), 5);
        assert_eq!(score_recency(29), 5);
        assert_eq!(score_recency(30), 4);
        assert_eq!(score_recency(45), 4);
        assert_eq!(score_recency(89), 4);
        assert_eq!(score_recency(90), 3);
        assert_eq!(score_recency(179), 3);
        assert_eq!(score_recency(180), 2);
        assert_eq!(score_recency(364), 2);
        assert_eq!(score_recency(365), 1);
        assert_eq!(score_recency(2000), 1);
    }

    #[test]
    fn test_frequency_bands() {
        assert_eq!(score_frequency(12), 5);
        assert_eq!(score_frequency(11), 5);
        assert_eq!(score_frequency(10), 4);
        assert_eq!(score_frequency(6), 4);
        assert_eq!(score_frequency(5), 3);
        assert_eq!(score_frequency(3), 3);
        assert_eq!(score_frequency(2), 2);
        assert_eq!(score_frequency(1), 1);
        assert_eq!(score_frequency(0), 1);
    }

    #[test]
    fn test_monetary_bands() {
        assert_eq!(score_monetary(10_000.01), 5);
        assert_eq!(score_monetary(10_000.0), 4);
        assert_eq!(score_monetary(5_000.01), 4);
        assert_eq!(score_monetary(5_000.0), 3);
        assert_eq!(score_monetary(750.0), 2);
        assert_eq!(score_monetary(1_000.01), 3);
        assert_eq!(score_monetary(100.01), 2);
        assert_eq!(score_monetary(100.0), 1);
        assert_eq!(score_monetary(0.0), 1);
    }

    #[test]
    fn test_combined_score_is_sum() {
        let scores = RfmScores::from_aggregates(45, 12, 750.0);
        assert_eq!(scores.recency_score, 4);
        assert_eq!(scores.frequency_score, 5);
        assert_eq!(scores.monetary_score, 2);
        assert_eq!(scores.combined_score, 11);
    }

    #[test]
    fn test_no_data_report_shape() {
        let value = RfmReport::NoData.to_json("CUST-0042");
        assert_eq!(value["customer"], "CUST-0042");
        assert_eq!(value["has_data"], false);
        assert!(value["message"].as_str().unwrap().contains("No confirmed"));
    }

    #[test]
    fn test_scored_report_shape() {
        let report = RfmReport::Scored(RfmScores::from_aggregates(10, 20, 50_000.0));
        let value = report.to_json("CUST-0001");
        assert_eq!(value["customer"], "CUST-0001");
        assert_eq!(value["has_data"], true);
        assert_eq!(value["recency_score"], 5);
        assert_eq!(value["frequency_score"], 5);
        assert_eq!(value["monetary_score"], 5);
        assert_eq!(value["combined_score"], 15);
    }
}
