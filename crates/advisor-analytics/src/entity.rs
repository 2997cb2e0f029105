//! Entity types queryable by the analytics layer.
//!
//! The ERP system addresses records by free-form type labels ("Customer",
//! "Sales Invoice"). Here that surface is a closed enum: an unknown label
//! is a caller error, and table/field names never reach SQL as raw
//! strings.

use crate::error::AnalyticsError;

/// A record category in the ERP mirror store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Customer,
    Supplier,
    Item,
    SalesInvoice,
    Lead,
    Project,
    Task,
    Account,
    User,
}

impl EntityType {
    /// All queryable entity types.
    pub const ALL: [EntityType; 9] = [
        EntityType::Customer,
        EntityType::Supplier,
        EntityType::Item,
        EntityType::SalesInvoice,
        EntityType::Lead,
        EntityType::Project,
        EntityType::Task,
        EntityType::Account,
        EntityType::User,
    ];

    /// Parse an ERP-style label ("Sales Invoice", "customer", ...).
    ///
    /// Matching is case-insensitive and ignores spaces and underscores.
    pub fn from_label(label: &str) -> Result<Self, AnalyticsError> {
        let normalized: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "customer" => Ok(EntityType::Customer),
            "supplier" => Ok(EntityType::Supplier),
            "item" => Ok(EntityType::Item),
            "salesinvoice" => Ok(EntityType::SalesInvoice),
            "lead" => Ok(EntityType::Lead),
            "project" => Ok(EntityType::Project),
            "task" => Ok(EntityType::Task),
            "account" => Ok(EntityType::Account),
            "user" => Ok(EntityType::User),
            _ => Err(AnalyticsError::UnknownEntity(label.to_string())),
        }
    }

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            EntityType::Customer => "customers",
            EntityType::Supplier => "suppliers",
            EntityType::Item => "items",
            EntityType::SalesInvoice => "sales_invoices",
            EntityType::Lead => "leads",
            EntityType::Project => "projects",
            EntityType::Task => "tasks",
            EntityType::Account => "accounts",
            EntityType::User => "users",
        }
    }

    /// Display label as the ERP system spells it.
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Customer => "Customer",
            EntityType::Supplier => "Supplier",
            EntityType::Item => "Item",
            EntityType::SalesInvoice => "Sales Invoice",
            EntityType::Lead => "Lead",
            EntityType::Project => "Project",
            EntityType::Task => "Task",
            EntityType::Account => "Account",
            EntityType::User => "User",
        }
    }

    /// Default columns returned by `list` when the caller names none.
    pub fn default_list_fields(&self) -> &'static [&'static str] {
        match self {
            EntityType::Customer => &["name", "customer_name", "customer_group", "created_at"],
            EntityType::Supplier => &["name", "supplier_name", "supplier_group", "created_at"],
            EntityType::Item => &["name", "item_name", "item_group", "created_at"],
            EntityType::SalesInvoice => &[
                "name",
                "customer",
                "posting_date",
                "base_grand_total",
                "status",
            ],
            EntityType::Lead => &["name", "lead_name", "status", "created_at"],
            EntityType::Project => &["name", "project_name", "status", "percent_complete"],
            EntityType::Task => &["name", "subject", "status", "priority"],
            EntityType::Account => &["name", "account_name", "account_type", "balance"],
            EntityType::User => &["name", "email", "full_name", "enabled"],
        }
    }

    /// Whether rows carry a draft/submitted/cancelled `docstatus` column.
    ///
    /// Aggregations over such entities only consider confirmed rows
    /// (`docstatus = 1`).
    pub fn has_docstatus(&self) -> bool {
        matches!(self, EntityType::SalesInvoice)
    }
}

/// Validate a caller-supplied column name for use in dynamic SQL.
///
/// Accepts `[A-Za-z][A-Za-z0-9_]*`. Leading underscores are rejected
/// since those columns are internal sync bookkeeping.
pub fn validate_field(field: &str) -> Result<&str, AnalyticsError> {
    let mut chars = field.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(field)
    } else {
        Err(AnalyticsError::InvalidField(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_canonical_spellings() {
        assert_eq!(
            EntityType::from_label("Customer").unwrap(),
            EntityType::Customer
        );
        assert_eq!(
            EntityType::from_label("Sales Invoice").unwrap(),
            EntityType::SalesInvoice
        );
        assert_eq!(EntityType::from_label("Lead").unwrap(), EntityType::Lead);
    }

    #[test]
    fn test_from_label_is_lenient_about_case_and_separators() {
        assert_eq!(
            EntityType::from_label("sales_invoice").unwrap(),
            EntityType::SalesInvoice
        );
        assert_eq!(
            EntityType::from_label("SALESINVOICE").unwrap(),
            EntityType::SalesInvoice
        );
        assert_eq!(
            EntityType::from_label("  customer ").unwrap(),
            EntityType::Customer
        );
    }

    #[test]
    fn test_from_label_unknown_is_error() {
        let err = EntityType::from_label("Purchase Order").unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownEntity(_)));
        assert!(err.to_string().contains("Purchase Order"));
    }

    #[test]
    fn test_round_trip_all_labels() {
        for entity in EntityType::ALL {
            assert_eq!(EntityType::from_label(entity.label()).unwrap(), entity);
        }
    }

    #[test]
    fn test_validate_field_accepts_plain_identifiers() {
        assert!(validate_field("base_grand_total").is_ok());
        assert!(validate_field("customer").is_ok());
        assert!(validate_field("a1").is_ok());
    }

    #[test]
    fn test_validate_field_rejects_injection_attempts() {
        assert!(validate_field("").is_err());
        assert!(validate_field("1abc").is_err());
        assert!(validate_field("_synced_at").is_err());
        assert!(validate_field("total; DROP TABLE customers").is_err());
        assert!(validate_field("total`").is_err());
        assert!(validate_field("a b").is_err());
    }
}
