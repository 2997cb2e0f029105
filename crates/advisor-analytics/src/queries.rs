//! Read-only analytic queries over the ERP mirror store.
//!
//! Each public method maps one chat tool to a single SQL query. Dynamic
//! identifiers (entity tables, field names) only reach SQL after passing
//! through [`EntityType`] or [`validate_field`]; all data values are bound
//! parameters.

use std::sync::Arc;

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, OptionalExtension};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use advisor_core::error::AdvisorError;
use advisor_store::Database;

use crate::entity::{validate_field, EntityType};
use crate::error::AnalyticsError;
use crate::result::{row_to_object, LabelValue};
use crate::rfm::{RfmReport, RfmScores};

/// Default and maximum row counts for list-shaped results.
const DEFAULT_LIST_LIMIT: u32 = 10;
const MAX_LIST_LIMIT: u32 = 100;
const GROUP_LIMIT: u32 = 10;
const OPEN_TASK_LIMIT: u32 = 20;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Aggregated stock position for an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockBalance {
    pub actual_qty: f64,
    pub ordered_qty: f64,
    pub reserved_qty: f64,
}

/// The analytics query service. Cheap to clone; all methods are read-only.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    db: Arc<Database>,
}

fn sql_err(e: rusqlite::Error) -> AdvisorError {
    AdvisorError::Storage(e.to_string())
}

/// Convert an equality-filter value to a bindable SQL value.
fn filter_param(field: &str, value: &Value) -> Result<SqlValue, AnalyticsError> {
    match value {
        Value::Bool(b) => Ok(SqlValue::Integer(*b as i64)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Real(f))
            } else {
                Err(AnalyticsError::InvalidArgument(format!(
                    "unrepresentable number for filter '{}'",
                    field
                )))
            }
        }
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        _ => Err(AnalyticsError::InvalidArgument(format!(
            "filter '{}' must be a string, number, or boolean",
            field
        ))),
    }
}

/// Turn a `YYYY-MM` key into a human month label ("Mar 2026").
fn month_label(year_month: &str) -> String {
    let parts: (Option<&str>, Option<&str>) = match year_month.split_once('-') {
        Some((y, m)) => (Some(y), Some(m)),
        None => (None, None),
    };
    if let (Some(year), Some(month)) = parts {
        if let Ok(idx) = month.parse::<usize>() {
            if (1..=12).contains(&idx) {
                return format!("{} {}", MONTH_NAMES[idx - 1], year);
            }
        }
    }
    year_month.to_string()
}

impl AnalyticsService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Total number of records of the given type.
    pub fn count(&self, entity: EntityType) -> Result<i64, AnalyticsError> {
        let total = self.db.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", entity.table()),
                [],
                |row| row.get(0),
            )
            .map_err(sql_err)
        })?;
        debug!(entity = entity.label(), total, "counted records");
        Ok(total)
    }

    /// List records with optional equality filters and a field projection.
    ///
    /// Unnamed fields fall back to the entity's default projection. The
    /// limit defaults to 10 and is capped at 100.
    pub fn list(
        &self,
        entity: EntityType,
        filters: Option<&Map<String, Value>>,
        fields: Option<&[String]>,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, AnalyticsError> {
        let columns: Vec<String> = match fields {
            Some(named) if !named.is_empty() => {
                let mut out = Vec::with_capacity(named.len());
                for field in named {
                    out.push(validate_field(field)?.to_string());
                }
                out
            }
            _ => entity
                .default_list_fields()
                .iter()
                .map(|f| f.to_string())
                .collect(),
        };

        let mut clauses = Vec::new();
        let mut params = Vec::new();
        if let Some(filters) = filters {
            for (field, value) in filters {
                validate_field(field)?;
                clauses.push(format!("{} = ?", field));
                params.push(filter_param(field, value)?);
            }
        }

        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), entity.table());
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&format!(" LIMIT {}", limit));

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
            let mut rows = stmt.query(params_from_iter(params.iter())).map_err(sql_err)?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().map_err(sql_err)? {
                out.push(
                    row_to_object(row, &columns)
                        .map_err(|e| AdvisorError::Analytics(e.to_string()))?,
                );
            }
            Ok(out)
        })
        .map_err(Into::into)
    }

    /// Per-month record counts over the trailing twelve months, oldest
    /// first. Sales invoices bucket by posting date, everything else by
    /// creation time.
    pub fn monthly_trend(&self, entity: EntityType) -> Result<Vec<LabelValue>, AnalyticsError> {
        let date_column = match entity {
            EntityType::SalesInvoice => "posting_date",
            _ => "created_at",
        };
        let sql = format!(
            "SELECT strftime('%Y-%m', {col}) AS ym, COUNT(*)
             FROM {table}
             WHERE {col} >= date('now', 'start of month', '-11 months')
             GROUP BY ym
             ORDER BY ym",
            col = date_column,
            table = entity.table(),
        );
        self.db
            .with_conn(|conn| {
                let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
                let mut rows = stmt.query([]).map_err(sql_err)?;
                let mut out = Vec::new();
                while let Some(row) = rows.next().map_err(sql_err)? {
                    let ym: String = row.get(0).map_err(sql_err)?;
                    let count: i64 = row.get(1).map_err(sql_err)?;
                    out.push(LabelValue::new(month_label(&ym), count as f64));
                }
                Ok(out)
            })
            .map_err(Into::into)
    }

    /// Sum a numeric field grouped by another field, top ten groups by
    /// value. Entities with a docstatus only aggregate confirmed rows.
    pub fn grouped_sum(
        &self,
        entity: EntityType,
        sum_field: &str,
        group_by: &str,
    ) -> Result<Vec<LabelValue>, AnalyticsError> {
        validate_field(sum_field)?;
        validate_field(group_by)?;

        let filter = if entity.has_docstatus() {
            " WHERE docstatus = 1"
        } else {
            ""
        };
        let sql = format!(
            "SELECT IFNULL(CAST({group} AS TEXT), 'Not Set') AS grp,
                    COALESCE(SUM({sum}), 0) AS total
             FROM {table}{filter}
             GROUP BY grp
             ORDER BY total DESC
             LIMIT {limit}",
            group = group_by,
            sum = sum_field,
            table = entity.table(),
            filter = filter,
            limit = GROUP_LIMIT,
        );
        self.db
            .with_conn(|conn| {
                let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
                let mut rows = stmt.query([]).map_err(sql_err)?;
                let mut out = Vec::new();
                while let Some(row) = rows.next().map_err(sql_err)? {
                    let label: String = row.get(0).map_err(sql_err)?;
                    let total: f64 = row.get(1).map_err(sql_err)?;
                    out.push(LabelValue::new(label, total));
                }
                Ok(out)
            })
            .map_err(Into::into)
    }

    /// Stock position for an item, summed across warehouses unless one is
    /// named. Returns None when the item has no bins at all.
    pub fn stock_balance(
        &self,
        item: &str,
        warehouse: Option<&str>,
    ) -> Result<Option<StockBalance>, AnalyticsError> {
        let (sql, params): (&str, Vec<SqlValue>) = match warehouse {
            Some(wh) => (
                "SELECT COUNT(*), COALESCE(SUM(actual_qty), 0),
                        COALESCE(SUM(ordered_qty), 0), COALESCE(SUM(reserved_qty), 0)
                 FROM bins WHERE item_code = ? AND warehouse = ?",
                vec![SqlValue::Text(item.to_string()), SqlValue::Text(wh.to_string())],
            ),
            None => (
                "SELECT COUNT(*), COALESCE(SUM(actual_qty), 0),
                        COALESCE(SUM(ordered_qty), 0), COALESCE(SUM(reserved_qty), 0)
                 FROM bins WHERE item_code = ?",
                vec![SqlValue::Text(item.to_string())],
            ),
        };
        self.db
            .with_conn(|conn| {
                let (rows, actual, ordered, reserved): (i64, f64, f64, f64) = conn
                    .query_row(sql, params_from_iter(params.iter()), |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                    })
                    .map_err(sql_err)?;
                if rows == 0 {
                    return Ok(None);
                }
                Ok(Some(StockBalance {
                    actual_qty: actual,
                    ordered_qty: ordered,
                    reserved_qty: reserved,
                }))
            })
            .map_err(Into::into)
    }

    /// Full record for one entity by id, or None when it does not exist.
    pub fn entity_details(
        &self,
        entity: EntityType,
        id: &str,
    ) -> Result<Option<Value>, AnalyticsError> {
        let sql = format!("SELECT * FROM {} WHERE name = ?", entity.table());
        self.db
            .with_conn(|conn| {
                let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
                let columns: Vec<String> =
                    stmt.column_names().iter().map(|c| c.to_string()).collect();
                stmt.query_row([id], |row| Ok(row_to_object(row, &columns)))
                    .optional()
                    .map_err(sql_err)?
                    .transpose()
                    .map_err(|e| AdvisorError::Analytics(e.to_string()))
            })
            .map_err(Into::into)
    }

    /// Outstanding receivable for a customer; 0.0 when the customer is
    /// unknown.
    pub fn customer_outstanding_balance(&self, customer: &str) -> Result<f64, AnalyticsError> {
        self.db
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT outstanding_amount FROM customers WHERE name = ?",
                    [customer],
                    |row| row.get(0),
                )
                .optional()
                .map_err(sql_err)
                .map(|balance| balance.unwrap_or(0.0))
            })
            .map_err(Into::into)
    }

    /// Ledger balance for an account, or None when the account is unknown.
    pub fn account_balance(&self, account: &str) -> Result<Option<f64>, AnalyticsError> {
        self.db
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT balance FROM accounts WHERE name = ?",
                    [account],
                    |row| row.get(0),
                )
                .optional()
                .map_err(sql_err)
            })
            .map_err(Into::into)
    }

    /// Status summary for a project, or None when it does not exist.
    pub fn project_status(&self, project: &str) -> Result<Option<Value>, AnalyticsError> {
        self.entity_details(EntityType::Project, project)
    }

    /// Tasks not yet completed or cancelled, optionally scoped to one
    /// project, earliest expected end date first.
    pub fn open_tasks(&self, project: Option<&str>) -> Result<Vec<Value>, AnalyticsError> {
        let columns: Vec<String> = ["name", "subject", "status", "priority", "project"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let mut sql = format!(
            "SELECT {} FROM tasks WHERE status NOT IN ('Completed', 'Cancelled')",
            columns.join(", "),
        );
        let mut params = Vec::new();
        if let Some(project) = project {
            sql.push_str(" AND project = ?");
            params.push(SqlValue::Text(project.to_string()));
        }
        sql.push_str(&format!(
            " ORDER BY exp_end_date IS NULL, exp_end_date LIMIT {}",
            OPEN_TASK_LIMIT
        ));
        self.db
            .with_conn(|conn| {
                let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
                let mut rows = stmt.query(params_from_iter(params.iter())).map_err(sql_err)?;
                let mut out = Vec::new();
                while let Some(row) = rows.next().map_err(sql_err)? {
                    out.push(
                        row_to_object(row, &columns)
                            .map_err(|e| AdvisorError::Analytics(e.to_string()))?,
                    );
                }
                Ok(out)
            })
            .map_err(Into::into)
    }

    /// Lead counts per pipeline status, largest stage first.
    pub fn lead_funnel(&self) -> Result<Vec<LabelValue>, AnalyticsError> {
        self.db
            .with_conn(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT status, COUNT(*) AS total
                         FROM leads
                         GROUP BY status
                         ORDER BY total DESC",
                    )
                    .map_err(sql_err)?;
                let mut rows = stmt.query([]).map_err(sql_err)?;
                let mut out = Vec::new();
                while let Some(row) = rows.next().map_err(sql_err)? {
                    let status: String = row.get(0).map_err(sql_err)?;
                    let total: i64 = row.get(1).map_err(sql_err)?;
                    out.push(LabelValue::new(status, total as f64));
                }
                Ok(out)
            })
            .map_err(Into::into)
    }

    /// RFM scores for a customer over confirmed invoices.
    pub fn rfm(&self, customer: &str) -> Result<RfmReport, AnalyticsError> {
        let (frequency, recency_days, monetary): (i64, Option<i64>, f64) = self
            .db
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT COUNT(name),
                            CAST(julianday('now') - julianday(MAX(posting_date)) AS INTEGER),
                            COALESCE(SUM(base_grand_total), 0)
                     FROM sales_invoices
                     WHERE customer = ? AND docstatus = 1",
                    [customer],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .map_err(sql_err)
            })?;
        if frequency == 0 {
            return Ok(RfmReport::NoData);
        }
        let recency_days = recency_days.unwrap_or(0).max(0);
        Ok(RfmReport::Scored(RfmScores::from_aggregates(
            recency_days,
            frequency,
            monetary,
        )))
    }

    /// Fuzzy customer lookup by id or display name, first ten matches.
    pub fn find_customers(&self, partial: &str) -> Result<Vec<Value>, AnalyticsError> {
        self.db
            .with_conn(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT name, customer_name FROM customers
                         WHERE name LIKE '%' || ?1 || '%'
                            OR customer_name LIKE '%' || ?1 || '%'
                         ORDER BY customer_name
                         LIMIT 10",
                    )
                    .map_err(sql_err)?;
                let mut rows = stmt.query([partial]).map_err(sql_err)?;
                let mut out = Vec::new();
                while let Some(row) = rows.next().map_err(sql_err)? {
                    let id: String = row.get(0).map_err(sql_err)?;
                    let display_name: String = row.get(1).map_err(sql_err)?;
                    out.push(json!({"id": id, "display_name": display_name}));
                }
                Ok(out)
            })
            .map_err(Into::into)
    }
}
