use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use flightdesk_core::import::FlightImporter;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Fire times of the import job in a fixed time zone.
#[derive(Debug, Clone)]
pub struct ImportSchedule {
    schedule: Schedule,
    timezone: Tz,
}

impl ImportSchedule {
    /// Accepts the `cron` crate's six/seven-field form or a five-field Unix expression.
    pub fn parse(expression: &str, timezone: &str) -> Result<Self, ScheduleError> {
        let expression = match expression.split_whitespace().count() {
            5 => format!("0 {} *", expression),
            _ => expression.to_string(),
        };
        let schedule =
            Schedule::from_str(&expression).map_err(|e| ScheduleError::InvalidCronExpression(e.to_string()))?;
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| ScheduleError::InvalidTimezone(timezone.to_string()))?;

        Ok(Self { schedule, timezone })
    }

    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
            .map(|next| next.with_timezone(&Utc))
    }
}

/// Sleeps until each fire time and runs one import. Never returns unless the
/// schedule has no future occurrence.
pub async fn start_import_worker(schedule: ImportSchedule, importer: Arc<FlightImporter>) {
    info!("Flight import worker started ({})", schedule.timezone);

    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_after(now) else {
            error!("Import schedule has no upcoming run, stopping worker");
            return;
        };
        info!("Next flight import at {}", next.with_timezone(&schedule.timezone));

        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        match importer.run_once().await {
            Ok(report) => info!("Scheduled import done: {} imported, {} failed", report.imported, report.failed),
            Err(e) => error!("Scheduled import failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_twice_daily_in_istanbul() {
        let schedule = ImportSchedule::parse("0 0 3,15 * * *", "Europe/Istanbul").unwrap();
        // 10:00 Istanbul (UTC+3) is 07:00 UTC; next run is 15:00 local = 12:00 UTC
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap();
        let next = schedule.next_after(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());

        let following = schedule.next_after(next).unwrap();
        assert_eq!(following.with_timezone(&schedule.timezone).hour(), 3);
    }

    #[test]
    fn test_five_field_expression_is_accepted() {
        let schedule = ImportSchedule::parse("30 4 * * *", "UTC").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 5, 0, 0).unwrap();
        assert_eq!(
            schedule.next_after(after).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 2, 4, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            ImportSchedule::parse("not a cron", "UTC"),
            Err(ScheduleError::InvalidCronExpression(_))
        ));
        assert!(matches!(
            ImportSchedule::parse("0 0 3 * * *", "Mars/Olympus"),
            Err(ScheduleError::InvalidTimezone(_))
        ));
    }
}
