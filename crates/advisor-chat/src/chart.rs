//! Parsing of `<chart_data>` blocks embedded in model replies.
//!
//! The model is instructed to emit pure JSON between `<chart_data>` tags;
//! the front end renders these as charts. Malformed blocks are skipped
//! rather than failing the whole reply.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

/// One chart embedded in a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub data: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub values: Vec<f64>,
}

fn chart_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<chart_data>(.*?)</chart_data>")
            .unwrap_or_else(|_| unreachable!("chart block pattern is valid"))
    })
}

/// Extract all well-formed chart blocks from a reply, in order.
pub fn extract_charts(text: &str) -> Vec<ChartSpec> {
    chart_block_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(1).map(|m| m.as_str().trim())?;
            match serde_json::from_str::<ChartSpec>(raw) {
                Ok(spec) => Some(spec),
                Err(e) => {
                    warn!(error = %e, "skipping malformed chart block");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_single_chart() {
        let reply = r#"Sales look strong.
<chart_data>
{"title": "Monthly Sales", "data": {"labels": ["Jan", "Feb"], "datasets": [{"values": [100.0, 200.0]}]}}
</chart_data>
Let me know if you want a deep dive."#;
        let charts = extract_charts(reply);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Monthly Sales");
        assert_eq!(charts[0].data.labels, vec!["Jan", "Feb"]);
        assert_eq!(charts[0].data.datasets[0].values, vec![100.0, 200.0]);
    }

    #[test]
    fn test_extracts_multiple_charts_in_order() {
        let reply = "<chart_data>{\"title\": \"A\", \"data\": {\"labels\": [], \"datasets\": []}}</chart_data>\
                     middle text\
                     <chart_data>{\"title\": \"B\", \"data\": {\"labels\": [], \"datasets\": []}}</chart_data>";
        let charts = extract_charts(reply);
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].title, "A");
        assert_eq!(charts[1].title, "B");
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let reply = "<chart_data>{not json}</chart_data>\
                     <chart_data>{\"title\": \"Good\", \"data\": {\"labels\": [\"x\"], \"datasets\": [{\"values\": [1.0]}]}}</chart_data>";
        let charts = extract_charts(reply);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "Good");
    }

    #[test]
    fn test_no_charts() {
        assert!(extract_charts("plain text reply").is_empty());
        assert!(extract_charts("<chart_data>unclosed").is_empty());
    }

    #[test]
    fn test_round_trip() {
        let spec = ChartSpec {
            title: "Lead Funnel".to_string(),
            data: ChartData {
                labels: vec!["Open".to_string(), "Converted".to_string()],
                datasets: vec![Dataset {
                    values: vec![12.0, 4.0],
                }],
            },
        };
        let embedded = format!(
            "<chart_data>{}</chart_data>",
            serde_json::to_string(&spec).unwrap()
        );
        assert_eq!(extract_charts(&embedded), vec![spec]);
    }
}
