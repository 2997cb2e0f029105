//! Advisor analytics crate - the read-only query layer behind the chat tools.
//!
//! Every operation translates one narrow analytic request (counts, lists,
//! monthly trends, grouped sums, stock balances, RFM scoring, fuzzy
//! customer lookup) into a single read-only SQL query and a normalized,
//! JSON-primitive result shape. No operation writes to the store.

pub mod entity;
pub mod error;
pub mod queries;
pub mod result;
pub mod rfm;

pub use entity::EntityType;
pub use error::AnalyticsError;
pub use queries::{AnalyticsService, StockBalance};
pub use result::LabelValue;
pub use rfm::{RfmReport, RfmScores};
