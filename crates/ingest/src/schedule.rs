//! Cron expressions for the refresh schedule.

use {
    chrono::{DateTime, Utc},
    cron::Schedule,
};

use crate::{Error, Result};

/// Parse a cron expression.
///
/// The `cron` crate wants 6 or 7 fields (with seconds, optional year). A
/// classic 5-field expression is accepted too and runs at second 0.
pub fn parse_schedule(expr: &str) -> Result<Schedule> {
    let expr = expr.trim();
    expr.parse::<Schedule>()
        .or_else(|_| format!("0 {expr} *").parse::<Schedule>())
        .map_err(|source| Error::InvalidSchedule {
            expr: expr.to_string(),
            source,
        })
}

/// First run strictly after `now`, or `None` if the schedule has ended.
pub fn next_run(schedule: &Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&now).next()
}
