//! Daily insight: yesterday's metrics, a model-written summary, and SMTP
//! fan-out to enabled users, with an in-process scheduler loop.

pub mod error;
pub mod job;
pub mod mailer;
pub mod metrics;

pub use error::InsightError;
pub use job::DailyInsightJob;
pub use mailer::{Mailer, SmtpMailer};
