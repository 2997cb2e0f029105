//! Tool registry: the analytics operations exposed to the model.
//!
//! Each tool is a Gemini function declaration plus a dispatch arm that
//! unpacks the model-supplied arguments and calls the analytics service.
//! Results are wrapped in a `{"result": ...}` object since function
//! responses must be JSON objects on the wire.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use advisor_analytics::{AnalyticsService, EntityType};

use crate::error::ChatError;
use crate::protocol::FunctionDeclaration;

/// Tool names in registration order.
pub const TOOL_NAMES: [&str; 13] = [
    "count_records",
    "list_records",
    "monthly_trend",
    "grouped_sum",
    "stock_balance",
    "entity_details",
    "customer_outstanding_balance",
    "account_balance",
    "project_status",
    "open_tasks",
    "lead_funnel",
    "rfm_analysis",
    "find_customers",
];

/// Registry binding tool names to analytics operations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    analytics: Arc<AnalyticsService>,
}

fn entity_schema() -> Value {
    json!({
        "type": "string",
        "description": "Entity type, e.g. 'Customer', 'Sales Invoice', 'Lead', 'Item', 'Project', 'Task', 'Account', 'Supplier', 'User'"
    })
}

fn str_arg<'a>(name: &str, args: &'a Value, key: &str) -> Result<&'a str, ChatError> {
    args.get(key).and_then(Value::as_str).ok_or_else(|| ChatError::Tool {
        name: name.to_string(),
        message: format!("missing required string argument '{}'", key),
    })
}

fn opt_str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn entity_arg(name: &str, args: &Value) -> Result<EntityType, ChatError> {
    let label = str_arg(name, args, "entity")?;
    EntityType::from_label(label).map_err(|e| ChatError::Tool {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn tool_err(name: &str, err: impl std::fmt::Display) -> ChatError {
    ChatError::Tool {
        name: name.to_string(),
        message: err.to_string(),
    }
}

impl ToolRegistry {
    pub fn new(analytics: Arc<AnalyticsService>) -> Self {
        Self { analytics }
    }

    pub fn names(&self) -> Vec<&'static str> {
        TOOL_NAMES.to_vec()
    }

    /// Function declarations sent with every Gemini request.
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        vec![
            FunctionDeclaration {
                name: "count_records".to_string(),
                description: "Returns the total number of records of a given entity type."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {"entity": entity_schema()},
                    "required": ["entity"]
                }),
            },
            FunctionDeclaration {
                name: "list_records".to_string(),
                description:
                    "Returns a list of records, optionally filtered by exact field values. Default 10 records."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "entity": entity_schema(),
                        "filters": {
                            "type": "object",
                            "description": "Field name to exact value, e.g. {\"territory\": \"South\"}"
                        },
                        "fields": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Columns to return; omit for sensible defaults"
                        },
                        "limit": {"type": "integer", "description": "Maximum rows (default 10)"}
                    },
                    "required": ["entity"]
                }),
            },
            FunctionDeclaration {
                name: "monthly_trend".to_string(),
                description:
                    "Returns per-month record counts for the last 12 months, oldest month first. Good for trend charts."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {"entity": entity_schema()},
                    "required": ["entity"]
                }),
            },
            FunctionDeclaration {
                name: "grouped_sum".to_string(),
                description:
                    "Sums a numeric field grouped by another field, top 10 groups by total. Example: entity='Sales Invoice', sum_field='base_grand_total', group_by='customer'."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "entity": entity_schema(),
                        "sum_field": {"type": "string", "description": "Numeric field to sum"},
                        "group_by": {"type": "string", "description": "Field to group by"}
                    },
                    "required": ["entity", "sum_field", "group_by"]
                }),
            },
            FunctionDeclaration {
                name: "stock_balance".to_string(),
                description:
                    "Returns actual, ordered, and reserved stock quantities for an item, across all warehouses or one."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "item": {"type": "string", "description": "Item code"},
                        "warehouse": {"type": "string", "description": "Optional warehouse name"}
                    },
                    "required": ["item"]
                }),
            },
            FunctionDeclaration {
                name: "entity_details".to_string(),
                description:
                    "Returns the full record for one entity by id, with empty fields stripped."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "entity": entity_schema(),
                        "id": {"type": "string", "description": "Record id (the 'name' field)"}
                    },
                    "required": ["entity", "id"]
                }),
            },
            FunctionDeclaration {
                name: "customer_outstanding_balance".to_string(),
                description: "Returns the outstanding receivable amount for a customer."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {"customer": {"type": "string", "description": "Customer id"}},
                    "required": ["customer"]
                }),
            },
            FunctionDeclaration {
                name: "account_balance".to_string(),
                description: "Returns the current balance of a ledger account.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {"account": {"type": "string", "description": "Account id"}},
                    "required": ["account"]
                }),
            },
            FunctionDeclaration {
                name: "project_status".to_string(),
                description:
                    "Returns status, completion percentage, and expected end date for a project."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {"project": {"type": "string", "description": "Project id"}},
                    "required": ["project"]
                }),
            },
            FunctionDeclaration {
                name: "open_tasks".to_string(),
                description:
                    "Returns tasks that are not completed or cancelled, optionally scoped to one project."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "project": {"type": "string", "description": "Optional project id"}
                    },
                    "required": []
                }),
            },
            FunctionDeclaration {
                name: "lead_funnel".to_string(),
                description: "Returns lead counts grouped by pipeline status, for a conversion funnel."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            FunctionDeclaration {
                name: "rfm_analysis".to_string(),
                description:
                    "Recency/Frequency/Monetary analysis for a customer over confirmed sales: days since last purchase, order count, total spent, and 1-5 scores."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {"customer": {"type": "string", "description": "Customer id"}},
                    "required": ["customer"]
                }),
            },
            FunctionDeclaration {
                name: "find_customers".to_string(),
                description:
                    "Fuzzy customer lookup by partial id or display name. Use this when a customer reference does not resolve exactly."
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "partial_name": {"type": "string", "description": "Partial id or name"}
                    },
                    "required": ["partial_name"]
                }),
            },
        ]
    }

    /// Invoke one tool by name with model-supplied arguments.
    pub fn dispatch(&self, name: &str, args: &Value) -> Result<Value, ChatError> {
        debug!(tool = name, "dispatching tool call");
        let result = match name {
            "count_records" => {
                let entity = entity_arg(name, args)?;
                let count = self.analytics.count(entity).map_err(|e| tool_err(name, e))?;
                json!(count)
            }
            "list_records" => {
                let entity = entity_arg(name, args)?;
                let filters: Option<&Map<String, Value>> =
                    args.get("filters").and_then(Value::as_object);
                let fields: Option<Vec<String>> = args.get("fields").and_then(Value::as_array).map(
                    |items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(String::from)
                            .collect()
                    },
                );
                let limit = args
                    .get("limit")
                    .and_then(Value::as_u64)
                    .map(|n| n.min(u32::MAX as u64) as u32);
                let records = self
                    .analytics
                    .list(entity, filters, fields.as_deref(), limit)
                    .map_err(|e| tool_err(name, e))?;
                json!(records)
            }
            "monthly_trend" => {
                let entity = entity_arg(name, args)?;
                let points = self
                    .analytics
                    .monthly_trend(entity)
                    .map_err(|e| tool_err(name, e))?;
                serde_json::to_value(points).map_err(|e| tool_err(name, e))?
            }
            "grouped_sum" => {
                let entity = entity_arg(name, args)?;
                let sum_field = str_arg(name, args, "sum_field")?;
                let group_by = str_arg(name, args, "group_by")?;
                let groups = self
                    .analytics
                    .grouped_sum(entity, sum_field, group_by)
                    .map_err(|e| tool_err(name, e))?;
                serde_json::to_value(groups).map_err(|e| tool_err(name, e))?
            }
            "stock_balance" => {
                let item = str_arg(name, args, "item")?;
                let warehouse = opt_str_arg(args, "warehouse");
                match self
                    .analytics
                    .stock_balance(item, warehouse)
                    .map_err(|e| tool_err(name, e))?
                {
                    Some(balance) => serde_json::to_value(balance).map_err(|e| tool_err(name, e))?,
                    None => json!({"found": false, "item": item}),
                }
            }
            "entity_details" => {
                let entity = entity_arg(name, args)?;
                let id = str_arg(name, args, "id")?;
                match self
                    .analytics
                    .entity_details(entity, id)
                    .map_err(|e| tool_err(name, e))?
                {
                    Some(details) => details,
                    None => json!({"found": false, "id": id}),
                }
            }
            "customer_outstanding_balance" => {
                let customer = str_arg(name, args, "customer")?;
                let balance = self
                    .analytics
                    .customer_outstanding_balance(customer)
                    .map_err(|e| tool_err(name, e))?;
                json!(balance)
            }
            "account_balance" => {
                let account = str_arg(name, args, "account")?;
                match self
                    .analytics
                    .account_balance(account)
                    .map_err(|e| tool_err(name, e))?
                {
                    Some(balance) => json!(balance),
                    None => json!({"found": false, "account": account}),
                }
            }
            "project_status" => {
                let project = str_arg(name, args, "project")?;
                match self
                    .analytics
                    .project_status(project)
                    .map_err(|e| tool_err(name, e))?
                {
                    Some(status) => status,
                    None => json!({"found": false, "project": project}),
                }
            }
            "open_tasks" => {
                let project = opt_str_arg(args, "project");
                let tasks = self
                    .analytics
                    .open_tasks(project)
                    .map_err(|e| tool_err(name, e))?;
                json!(tasks)
            }
            "lead_funnel" => {
                let funnel = self.analytics.lead_funnel().map_err(|e| tool_err(name, e))?;
                serde_json::to_value(funnel).map_err(|e| tool_err(name, e))?
            }
            "rfm_analysis" => {
                let customer = str_arg(name, args, "customer")?;
                let report = self.analytics.rfm(customer).map_err(|e| tool_err(name, e))?;
                report.to_json(customer)
            }
            "find_customers" => {
                let partial = str_arg(name, args, "partial_name")?;
                let matches = self
                    .analytics
                    .find_customers(partial)
                    .map_err(|e| tool_err(name, e))?;
                json!(matches)
            }
            _ => {
                return Err(ChatError::Tool {
                    name: name.to_string(),
                    message: "unknown tool".to_string(),
                })
            }
        };
        Ok(json!({"result": result}))
    }
}
