//! Yesterday's business metrics feeding the daily insight prompt.

use advisor_core::error::AdvisorError;
use advisor_store::Database;

use crate::error::InsightError;

/// Total of yesterday's confirmed sales invoices.
pub fn yesterday_sales_total(db: &Database) -> Result<f64, InsightError> {
    let total = db.with_conn(|conn| {
        conn.query_row(
            "SELECT COALESCE(SUM(base_grand_total), 0)
             FROM sales_invoices
             WHERE posting_date = date('now', '-1 day') AND docstatus = 1",
            [],
            |row| row.get(0),
        )
        .map_err(|e| AdvisorError::Storage(e.to_string()))
    })?;
    Ok(total)
}

/// Number of leads created yesterday.
pub fn yesterday_new_leads(db: &Database) -> Result<i64, InsightError> {
    let count = db.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*) FROM leads WHERE date(created_at) = date('now', '-1 day')",
            [],
            |row| row.get(0),
        )
        .map_err(|e| AdvisorError::Storage(e.to_string()))
    })?;
    Ok(count)
}

/// Email addresses of enabled users.
pub fn recipients(db: &Database) -> Result<Vec<String>, InsightError> {
    let addresses = db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT email FROM users WHERE enabled = 1 AND email <> ''")
            .map_err(|e| AdvisorError::Storage(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| AdvisorError::Storage(e.to_string()))?;
        rows.collect::<Result<Vec<String>, _>>()
            .map_err(|e| AdvisorError::Storage(e.to_string()))
    })?;
    Ok(addresses)
}

/// The fixed prompt sent to the model, embedding both metrics.
pub fn build_prompt(sales_total: f64, new_leads: i64) -> String {
    format!(
        "Provide a daily business insight. Statistics for yesterday: Sales Total: {:.2}, New Leads: {}.",
        sales_total, new_leads
    )
}
