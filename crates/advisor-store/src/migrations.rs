//! Database schema migrations.
//!
//! Applies the ERP mirror schema: customers, suppliers, items, bins,
//! sales_invoices, leads, projects, tasks, accounts, and users, plus the
//! schema_migrations tracking table.
//!
//! Conventions: record ids live in a `name` column (the ERP document
//! name), timestamps and dates are ISO-8601 TEXT, monetary amounts are
//! REAL. Columns prefixed with `_` are sync bookkeeping and are stripped
//! by the analytics layer before results cross the tool boundary.

use rusqlite::Connection;
use tracing::info;

use advisor_core::error::AdvisorError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental
/// changes.
pub fn run_migrations(conn: &Connection) -> Result<(), AdvisorError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| AdvisorError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| AdvisorError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        conn.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema')",
            [],
        )
        .map_err(|e| AdvisorError::Storage(format!("Failed to record migration: {}", e)))?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: ERP mirror schema.
fn apply_v1(conn: &Connection) -> Result<(), AdvisorError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS customers (
            name                TEXT PRIMARY KEY NOT NULL,
            customer_name       TEXT NOT NULL,
            customer_group      TEXT,
            territory           TEXT,
            loyalty_program     TEXT,
            outstanding_amount  REAL NOT NULL DEFAULT 0,
            disabled            INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at          TEXT
        );

        CREATE TABLE IF NOT EXISTS suppliers (
            name            TEXT PRIMARY KEY NOT NULL,
            supplier_name   TEXT NOT NULL,
            supplier_group  TEXT,
            country         TEXT,
            disabled        INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at      TEXT
        );

        CREATE TABLE IF NOT EXISTS items (
            name            TEXT PRIMARY KEY NOT NULL,
            item_name       TEXT NOT NULL,
            item_group      TEXT,
            stock_uom       TEXT,
            valuation_rate  REAL,
            disabled        INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at      TEXT
        );

        -- Per-warehouse stock levels (one row per item/warehouse pair).
        CREATE TABLE IF NOT EXISTS bins (
            item_code     TEXT NOT NULL,
            warehouse     TEXT NOT NULL,
            actual_qty    REAL NOT NULL DEFAULT 0,
            ordered_qty   REAL NOT NULL DEFAULT 0,
            reserved_qty  REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (item_code, warehouse)
        );

        -- docstatus: 0 = draft, 1 = submitted (confirmed), 2 = cancelled.
        CREATE TABLE IF NOT EXISTS sales_invoices (
            name              TEXT PRIMARY KEY NOT NULL,
            customer          TEXT NOT NULL,
            posting_date      TEXT NOT NULL,
            base_grand_total  REAL NOT NULL DEFAULT 0,
            status            TEXT NOT NULL DEFAULT 'Draft',
            docstatus         INTEGER NOT NULL DEFAULT 0,
            created_at        TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at        TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_sales_invoices_customer
            ON sales_invoices (customer, docstatus);

        CREATE INDEX IF NOT EXISTS idx_sales_invoices_posting_date
            ON sales_invoices (posting_date);

        CREATE TABLE IF NOT EXISTS leads (
            name        TEXT PRIMARY KEY NOT NULL,
            lead_name   TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'Lead',
            source      TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_leads_status ON leads (status);

        CREATE TABLE IF NOT EXISTS projects (
            name               TEXT PRIMARY KEY NOT NULL,
            project_name       TEXT NOT NULL,
            status             TEXT NOT NULL DEFAULT 'Open',
            percent_complete   REAL NOT NULL DEFAULT 0,
            expected_end_date  TEXT,
            created_at         TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at         TEXT
        );

        CREATE TABLE IF NOT EXISTS tasks (
            name          TEXT PRIMARY KEY NOT NULL,
            subject       TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'Open',
            priority      TEXT,
            project       TEXT,
            exp_end_date  TEXT,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at    TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_project
            ON tasks (project)
            WHERE project IS NOT NULL;

        CREATE TABLE IF NOT EXISTS accounts (
            name          TEXT PRIMARY KEY NOT NULL,
            account_name  TEXT NOT NULL,
            account_type  TEXT,
            balance       REAL NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at    TEXT
        );

        CREATE TABLE IF NOT EXISTS users (
            name        TEXT PRIMARY KEY NOT NULL,
            email       TEXT NOT NULL,
            full_name   TEXT,
            enabled     INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            _synced_at  TEXT
        );
        ",
    )
    .map_err(|e| AdvisorError::Storage(format!("Migration v1 failed: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_all_tables_exist() {
        let conn = open();
        let tables = [
            "customers",
            "suppliers",
            "items",
            "bins",
            "sales_invoices",
            "leads",
            "projects",
            "tasks",
            "accounts",
            "users",
        ];
        for table in tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table: {}", table);
        }
    }

    #[test]
    fn test_rerun_is_noop() {
        let conn = open();
        run_migrations(&conn).unwrap();
        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_bin_primary_key_is_item_and_warehouse() {
        let conn = open();
        conn.execute(
            "INSERT INTO bins (item_code, warehouse, actual_qty) VALUES ('W-001', 'Main', 5)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO bins (item_code, warehouse, actual_qty) VALUES ('W-001', 'Backup', 2)",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO bins (item_code, warehouse, actual_qty) VALUES ('W-001', 'Main', 9)",
            [],
        );
        assert!(result.is_err());
    }
}
