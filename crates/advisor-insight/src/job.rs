//! The daily insight job and its scheduler loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use advisor_chat::ChatDispatcher;
use advisor_core::config::InsightConfig;
use advisor_store::Database;

use crate::error::InsightError;
use crate::mailer::Mailer;
use crate::metrics;

const SUBJECT: &str = "Daily AI Business Insight";

/// Generates one model-written business insight per day and emails it to
/// every enabled user.
pub struct DailyInsightJob {
    db: Arc<Database>,
    dispatcher: Arc<ChatDispatcher>,
    mailer: Arc<dyn Mailer>,
    config: InsightConfig,
    shutdown: Arc<Notify>,
}

impl DailyInsightJob {
    pub fn new(
        db: Arc<Database>,
        dispatcher: Arc<ChatDispatcher>,
        mailer: Arc<dyn Mailer>,
        config: InsightConfig,
    ) -> Self {
        Self {
            db,
            dispatcher,
            mailer,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the job once. Returns the number of emails delivered.
    ///
    /// A no-op when disabled. Delivery failures are logged per recipient
    /// and do not abort the remaining sends.
    pub async fn run(&self) -> Result<usize, InsightError> {
        if !self.config.enabled {
            debug!("daily insight disabled, skipping");
            return Ok(0);
        }

        let sales_total = metrics::yesterday_sales_total(&self.db)?;
        let new_leads = metrics::yesterday_new_leads(&self.db)?;
        let prompt = metrics::build_prompt(sales_total, new_leads);

        let insight = self
            .dispatcher
            .respond(&prompt, None)
            .await
            .map_err(|e| InsightError::Chat(e.to_string()))?;

        let recipients = metrics::recipients(&self.db)?;
        let mut sent = 0;
        for to in &recipients {
            match self.mailer.send(to, SUBJECT, &insight).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(recipient = %to, error = %e, "failed to send insight email"),
            }
        }

        info!(sent, recipients = recipients.len(), "daily insight run complete");
        Ok(sent)
    }

    /// Scheduler loop: sleep until the configured UTC hour, run, repeat.
    /// Returns on shutdown signal.
    pub async fn run_scheduled(&self) {
        loop {
            let wait = seconds_until_hour(Utc::now(), self.config.send_hour_utc);
            debug!(wait_secs = wait, "insight scheduler sleeping");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(wait)) => {
                    if let Err(e) = self.run().await {
                        error!(error = %e, "daily insight job failed");
                    }
                }
                _ = self.shutdown.notified() => return,
            }
        }
    }

    /// Signal the scheduler loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Seconds from `now` until the next occurrence of `hour:00:00` UTC.
/// Always at least 1 so back-to-back runs cannot busy-loop.
pub fn seconds_until_hour(now: DateTime<Utc>, hour: u8) -> u64 {
    let hour = u32::from(hour.min(23));
    let today_target = now
        .with_hour(hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let target = if today_target > now {
        today_target
    } else {
        today_target + chrono::Duration::days(1)
    };
    (target - now).num_seconds().max(1) as u64
}
